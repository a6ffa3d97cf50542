//! # immo-ads
//!
//! Polls a classified-listings search endpoint, works out which listings are
//! new since the previous run, keeps a bounded history of recently seen
//! listings per saved search, and sends the new ones as an HTML report.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │   Fetcher    │──▶│ Diff engine  │──▶│ History file │
//! │ (HTTP GET)   │   │ (core crate) │   │ 30 newest    │
//! └──────────────┘   └──────┬───────┘   └──────────────┘
//!                           │ new listings
//!                           ▼
//!                    ┌──────────────┐
//!                    │  Notifiers   │
//!                    │ report/email │
//!                    └──────────────┘
//! ```
//!
//! Change detection, key derivation and the store trait live in
//! `immo-ads-core`; this crate adds the I/O around them.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML / environment / argument resolution |
//! | [`error`] | Run-level error taxonomy |
//! | [`fetch`] | HTTP listing fetcher |
//! | [`history_fs`] | File-backed history store |
//! | [`report`] | HTML rendering of new listings |
//! | [`notify`] | Report file and email delivery |
//! | [`watch`] | One run of a saved search |

pub mod config;
pub mod error;
pub mod fetch;
pub mod history_fs;
pub mod notify;
pub mod report;
pub mod watch;

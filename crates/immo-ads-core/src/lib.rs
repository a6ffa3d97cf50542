//! # immo-ads core
//!
//! Storage-agnostic logic for immo-ads: the listing model, the change
//! detection that decides which fetched listings are new, history key
//! derivation, and the history store abstraction.
//!
//! This crate performs no network or filesystem I/O. The outer `immo-ads`
//! crate supplies the HTTP fetcher, the file-backed store, and notifiers.

pub mod diff;
pub mod key;
pub mod models;
pub mod store;

pub use diff::compute_new;
pub use key::{derive_key, HistoryKey};
pub use models::Listing;
pub use store::{merge_history, HistoryError, HistoryStore, HISTORY_CAPACITY};

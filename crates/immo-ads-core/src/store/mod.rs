//! History store abstraction.
//!
//! The [`HistoryStore`] trait defines how the bounded, newest-first history
//! of a search is loaded and replaced, enabling pluggable backends (a JSON
//! file per search in the `immo-ads` crate, in-memory for tests).
//!
//! Replacement is always whole: [`HistoryStore::save`] merges the new
//! listings on top of the previous history, truncates the window to
//! [`HISTORY_CAPACITY`] entries and hands the result to
//! [`HistoryStore::replace`].

pub mod memory;

use crate::key::HistoryKey;
use crate::models::Listing;

/// Maximum number of listings kept in a search's history.
pub const HISTORY_CAPACITY: usize = 30;

/// Errors raised by history backends.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// Stored content exists and is non-empty but is not a listing array.
    #[error("history for '{key}' is malformed: {source}")]
    Malformed {
        key: HistoryKey,
        #[source]
        source: serde_json::Error,
    },

    /// The backend could not read or write the history.
    #[error("history for '{key}' could not be {action}: {source}")]
    Io {
        key: HistoryKey,
        action: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("history for '{key}' could not be encoded: {source}")]
    Encode {
        key: HistoryKey,
        #[source]
        source: serde_json::Error,
    },
}

/// Abstract history backend.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`load`](HistoryStore::load) | Read the history for a key (empty if none) |
/// | [`replace`](HistoryStore::replace) | Overwrite the history for a key |
/// | [`save`](HistoryStore::save) | Merge, bound, and replace |
pub trait HistoryStore {
    /// Returns the persisted history for `key`, newest-first.
    ///
    /// A key that was never written, or whose stored content is empty,
    /// yields an empty history. Content that is present but unreadable is a
    /// [`HistoryError::Malformed`] error and must never be treated as empty.
    fn load(&self, key: &HistoryKey) -> Result<Vec<Listing>, HistoryError>;

    /// Replaces the whole history for `key` with `listings`.
    fn replace(&self, key: &HistoryKey, listings: &[Listing]) -> Result<(), HistoryError>;

    /// Records `new_listings` on top of `previous` and persists the bounded
    /// result. Returns the history as written.
    fn save(
        &self,
        key: &HistoryKey,
        new_listings: &[Listing],
        previous: &[Listing],
    ) -> Result<Vec<Listing>, HistoryError> {
        let merged = merge_history(new_listings, previous);
        self.replace(key, &merged)?;
        Ok(merged)
    }
}

/// Returns `new_listings ++ previous`, cut to the newest
/// [`HISTORY_CAPACITY`] entries.
pub fn merge_history(new_listings: &[Listing], previous: &[Listing]) -> Vec<Listing> {
    new_listings
        .iter()
        .chain(previous.iter())
        .take(HISTORY_CAPACITY)
        .cloned()
        .collect()
}

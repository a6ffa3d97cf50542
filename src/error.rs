//! Run-level error taxonomy.
//!
//! Every variant is fatal: a run either completes (possibly with zero new
//! listings) or aborts with one of these. Nothing is retried.

use immo_ads_core::HistoryError;

/// Usage line printed for a wrong positional argument count.
pub const USAGE: &str = "Usage: immo-ads SEARCH_NAME EMAIL_RECIPIENTS SEARCH_PARAMETERS";

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// Wrong argument count or missing required configuration.
    #[error("{0}")]
    Usage(String),

    /// The search request failed, timed out, returned a non-success status,
    /// or returned a body that is not a listing page.
    #[error("search request failed: {0}")]
    Transport(String),

    /// Stored history is present and non-empty but cannot be decoded.
    #[error(transparent)]
    MalformedHistory(HistoryError),

    /// Reading or writing history failed at the I/O level.
    #[error(transparent)]
    Storage(HistoryError),

    /// Rendering or delivering the notification failed. History has
    /// already been updated when this is raised.
    #[error("notification failed: {0}")]
    Notification(String),
}

impl WatchError {
    pub fn missing(variable: &str) -> Self {
        WatchError::Usage(format!("missing required setting {}", variable))
    }
}

impl From<HistoryError> for WatchError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::Malformed { .. } => WatchError::MalformedHistory(err),
            other => WatchError::Storage(other),
        }
    }
}

impl From<reqwest::Error> for WatchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            WatchError::Transport(format!("timed out: {}", err))
        } else {
            WatchError::Transport(err.to_string())
        }
    }
}

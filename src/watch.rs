//! One run of a saved search.
//!
//! ```text
//! fetch ──▶ load history ──▶ compute_new ──┬─ nothing new ──▶ done
//!                                          └─ new ──▶ save history ──▶ notify
//! ```
//!
//! The new-listing count is printed as soon as it is known, so it appears
//! even when a later step fails. A failed fetch aborts before history is
//! touched. History is written
//! before notifiers run, so a failed notification is not retried on the
//! next run: delivery is at most once.

use immo_ads_core::{compute_new, derive_key, HistoryStore, Listing};

use crate::error::WatchError;
use crate::fetch::ListingSource;
use crate::notify::{Notification, Notifier};

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Newly discovered listings, newest-first.
    pub new_listings: Vec<Listing>,
    /// History length after the run.
    pub history_len: usize,
}

impl RunReport {
    pub fn new_count(&self) -> usize {
        self.new_listings.len()
    }
}

pub fn run_search(
    search_name: &str,
    source: &dyn ListingSource,
    store: &dyn HistoryStore,
    notifiers: &[Box<dyn Notifier>],
) -> Result<RunReport, WatchError> {
    let key = derive_key(search_name);
    let span = tracing::info_span!("search", name = %search_name, key = %key);
    let _guard = span.enter();

    let latest = source.fetch()?;
    let previous = store.load(&key)?;
    let new_listings = compute_new(&latest, &previous);

    tracing::info!(
        fetched = latest.len(),
        known = previous.len(),
        new = new_listings.len(),
        "compared with history"
    );
    println!("{} new listings were found.", new_listings.len());

    if new_listings.is_empty() {
        return Ok(RunReport {
            new_listings,
            history_len: previous.len(),
        });
    }

    let history = store.save(&key, &new_listings, &previous)?;

    let notification = Notification::new(search_name, &key, &new_listings);
    for notifier in notifiers {
        tracing::debug!(notifier = notifier.name(), "dispatching");
        notifier.notify(&notification)?;
    }

    Ok(RunReport {
        history_len: history.len(),
        new_listings,
    })
}

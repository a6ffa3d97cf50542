//! Change detection between a fresh fetch and the persisted history.
//!
//! Both sequences are newest-first. The scan walks the fetched listings from
//! the top and stops at the first one already present in history: everything
//! below a known listing is assumed to have been seen by an earlier run.
//!
//! A previously seen listing that re-enters the results above genuinely new
//! ones (a re-listing or a bump) hides everything after it. That is the
//! observable contract of this engine and is kept as-is.

use crate::models::Listing;

/// Returns the listings from `latest` that are new relative to `previous`.
///
/// With an empty `previous` (first run), every fetched listing is new.
/// Otherwise the result is the prefix of `latest` up to, not including, the
/// first listing whose `id` appears in `previous`.
pub fn compute_new(latest: &[Listing], previous: &[Listing]) -> Vec<Listing> {
    if previous.is_empty() {
        return latest.to_vec();
    }

    latest
        .iter()
        .take_while(|candidate| !is_known(candidate, previous))
        .cloned()
        .collect()
}

fn is_known(candidate: &Listing, previous: &[Listing]) -> bool {
    previous.iter().any(|seen| seen.same_id(candidate))
}

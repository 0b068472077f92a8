//! Listing catalog store and fetch state machine.
//!
//! [`Catalog`] owns the committed fetch payload and the `idle → loading →
//! (success | error)` status machine around it, re-entering `loading` on every
//! new criteria commit. It also owns the sequence-token discipline that makes
//! "last request wins" hold: every dispatched fetch takes a token from
//! [`Catalog::begin_fetch`], and only the response carrying the highest token
//! issued so far may touch the committed payload. Responses that lost the race
//! are dropped silently — a trace line, never a user-visible state change.
//!
//! Availability beats freshness on failure: an error records its diagnostic
//! but leaves the previous payload in place.

use crate::domain::listing::{Listing, ListingId};

/// Status of the most recent catalog fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStatus {
    /// No fetch has been dispatched yet.
    #[default]
    Idle,
    /// A fetch is in flight. The previous payload, if any, stays visible.
    Loading,
    /// The latest fetch committed its payload.
    Success,
    /// The latest fetch failed. The previous payload is retained.
    Error,
}

/// Outcome of offering a fetch response to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The response carried the newest token and was committed.
    Committed,
    /// The response was superseded by a newer request and was discarded.
    Stale,
}

impl CommitOutcome {
    /// Returns true when the response actually changed state.
    #[must_use]
    pub const fn is_committed(self) -> bool {
        matches!(self, Self::Committed)
    }
}

/// The catalog of fetched listings plus fetch bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Current fetch status.
    pub status: FetchStatus,

    /// Committed payload, in server-provided order. Replaced wholesale on a
    /// successful commit, retained across failures.
    pub listings: Vec<Listing>,

    /// Diagnostic for the latest failure, if any. Cleared on the next
    /// successful commit or when the user dismisses the banner.
    pub error: Option<String>,

    /// Highest sequence token issued so far.
    latest_seq: u64,
}

impl Catalog {
    /// Creates an empty, idle catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new fetch: bumps the sequence token and enters `Loading`.
    ///
    /// The returned token must travel with the request and come back with the
    /// response; [`offer`](Self::offer) and [`offer_failure`](Self::offer_failure)
    /// use it to recognize stale responses.
    pub fn begin_fetch(&mut self) -> u64 {
        self.latest_seq += 1;
        self.status = FetchStatus::Loading;
        tracing::debug!(seq = self.latest_seq, "fetch dispatched");
        self.latest_seq
    }

    /// Returns the highest token issued so far.
    #[must_use]
    pub const fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    /// Offers a successful response to the catalog.
    ///
    /// Commits the payload wholesale when `seq` is the newest token;
    /// otherwise discards it without touching any state.
    pub fn offer(&mut self, seq: u64, listings: Vec<Listing>) -> CommitOutcome {
        if seq != self.latest_seq {
            tracing::debug!(
                seq,
                latest = self.latest_seq,
                "stale fetch response discarded"
            );
            return CommitOutcome::Stale;
        }
        tracing::debug!(seq, count = listings.len(), "fetch payload committed");
        self.listings = listings;
        self.status = FetchStatus::Success;
        self.error = None;
        CommitOutcome::Committed
    }

    /// Offers a failed response to the catalog.
    ///
    /// Stale failures are discarded just like stale successes. A current
    /// failure records the diagnostic and flips to `Error`, but the previous
    /// payload stays visible.
    pub fn offer_failure(&mut self, seq: u64, detail: String) -> CommitOutcome {
        if seq != self.latest_seq {
            tracing::debug!(seq, latest = self.latest_seq, "stale fetch error discarded");
            return CommitOutcome::Stale;
        }
        tracing::debug!(seq, error = %detail, "fetch failed");
        self.status = FetchStatus::Error;
        self.error = Some(detail);
        CommitOutcome::Committed
    }

    /// Surfaces an error that did not come from a catalog fetch.
    ///
    /// Update/delete failures share the banner with fetch failures but have
    /// no sequence token and leave the fetch status alone.
    pub fn surface_error(&mut self, detail: String) {
        tracing::debug!(error = %detail, "operation failed");
        self.error = Some(detail);
    }

    /// Clears a surfaced error without touching the payload.
    ///
    /// Used when the user dismisses the error banner. Status falls back to
    /// `Success` when a payload is present, `Idle` otherwise.
    pub fn dismiss_error(&mut self) {
        if self.error.take().is_some() && self.status == FetchStatus::Error {
            self.status = if self.listings.is_empty() {
                FetchStatus::Idle
            } else {
                FetchStatus::Success
            };
        }
    }

    /// Returns true when a listing with this id is in the committed payload.
    #[must_use]
    pub fn contains(&self, id: ListingId) -> bool {
        self.listings.iter().any(|l| l.id == id)
    }

    /// Returns the committed listing with this id, if present.
    #[must_use]
    pub fn get(&self, id: ListingId) -> Option<&Listing> {
        self.listings.iter().find(|l| l.id == id)
    }

    /// Replaces a listing in place after a successful update.
    ///
    /// No-op when the listing is not part of the committed payload (it may
    /// have been superseded by a newer fetch in the meantime).
    pub fn replace(&mut self, updated: Listing) {
        if let Some(slot) = self.listings.iter_mut().find(|l| l.id == updated.id) {
            *slot = updated;
        }
    }

    /// Removes a listing after a successful deletion.
    pub fn remove(&mut self, id: ListingId) {
        self.listings.retain(|l| l.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::Seller;

    fn listing(id: ListingId, name: &str) -> Listing {
        Listing {
            id,
            name: name.to_string(),
            description: String::new(),
            price: 10.0,
            image_url: None,
            category: "other".to_string(),
            condition: "good".to_string(),
            seller: Seller {
                id: 1,
                name: "Robin".to_string(),
            },
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_status_walks_idle_loading_success() {
        let mut catalog = Catalog::new();
        assert_eq!(catalog.status, FetchStatus::Idle);

        let seq = catalog.begin_fetch();
        assert_eq!(catalog.status, FetchStatus::Loading);

        assert!(catalog.offer(seq, vec![listing(1, "Chair")]).is_committed());
        assert_eq!(catalog.status, FetchStatus::Success);
        assert_eq!(catalog.listings.len(), 1);
    }

    #[test]
    fn test_last_request_wins() {
        let mut catalog = Catalog::new();
        let seq_a = catalog.begin_fetch();
        let seq_b = catalog.begin_fetch();

        // B's response arrives first and commits.
        assert!(catalog.offer(seq_b, vec![listing(2, "Lamp")]).is_committed());
        // A's response arrives late and is discarded.
        assert_eq!(
            catalog.offer(seq_a, vec![listing(1, "Chair")]),
            CommitOutcome::Stale
        );

        assert_eq!(catalog.listings.len(), 1);
        assert_eq!(catalog.listings[0].id, 2);
        assert_eq!(catalog.status, FetchStatus::Success);
    }

    #[test]
    fn test_stale_error_does_not_clobber_fresh_payload() {
        let mut catalog = Catalog::new();
        let seq_a = catalog.begin_fetch();
        let seq_b = catalog.begin_fetch();

        assert!(catalog.offer(seq_b, vec![listing(2, "Lamp")]).is_committed());
        assert_eq!(
            catalog.offer_failure(seq_a, "timeout".to_string()),
            CommitOutcome::Stale
        );
        assert_eq!(catalog.status, FetchStatus::Success);
        assert!(catalog.error.is_none());
    }

    #[test]
    fn test_failure_retains_previous_payload() {
        let mut catalog = Catalog::new();
        let seq = catalog.begin_fetch();
        catalog.offer(seq, vec![listing(1, "Chair")]);

        let seq = catalog.begin_fetch();
        assert!(catalog
            .offer_failure(seq, "connection refused".to_string())
            .is_committed());
        assert_eq!(catalog.status, FetchStatus::Error);
        assert_eq!(catalog.listings.len(), 1);
        assert_eq!(catalog.error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_dismiss_error_restores_success_with_payload() {
        let mut catalog = Catalog::new();
        let seq = catalog.begin_fetch();
        catalog.offer(seq, vec![listing(1, "Chair")]);
        let seq = catalog.begin_fetch();
        catalog.offer_failure(seq, "oops".to_string());

        catalog.dismiss_error();
        assert_eq!(catalog.status, FetchStatus::Success);
        assert!(catalog.error.is_none());

        // Dismissing with no payload falls back to idle.
        let mut empty = Catalog::new();
        let seq = empty.begin_fetch();
        empty.offer_failure(seq, "oops".to_string());
        empty.dismiss_error();
        assert_eq!(empty.status, FetchStatus::Idle);
    }

    #[test]
    fn test_replace_and_remove() {
        let mut catalog = Catalog::new();
        let seq = catalog.begin_fetch();
        catalog.offer(seq, vec![listing(1, "Chair"), listing(2, "Lamp")]);

        let mut updated = listing(2, "Floor Lamp");
        updated.price = 35.0;
        catalog.replace(updated);
        assert_eq!(catalog.get(2).map(|l| l.name.as_str()), Some("Floor Lamp"));

        catalog.remove(1);
        assert!(!catalog.contains(1));
        assert_eq!(catalog.listings.len(), 1);
    }
}

//! Fetch worker: executes remote operations off the engine's event path.
//!
//! [`MarketWorker`] drains a request channel and performs each operation
//! against the [`ListingApi`] transport, sending results back as
//! [`WorkerResponse`]s. The engine's event loop stays responsive while
//! requests are in flight — the only suspension points in the system are the
//! network round trips that happen here.
//!
//! # Ordering and cancellation
//!
//! Catalog fetches are spawned as abortable tasks. When a newer
//! `FetchListings` arrives, the superseded in-flight task is aborted outright:
//! its eventual completion is not awaited and then discarded late, it simply
//! never happens. Each fetch task also sleeps the configured debounce window
//! before touching the network, so a burst of filter edits costs exactly one
//! request. The sequence-token check at the catalog commit point remains the
//! final authority either way.
//!
//! Mutations (create/update/delete) are processed inline, strictly in
//! dispatch order, and are never cancelled.

use crate::remote::api::ListingApi;
use crate::worker::messages::{WorkerMessage, WorkerResponse};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Bookkeeping for the one cancellable in-flight catalog fetch.
struct FetchTask {
    seq: u64,
    handle: tokio::task::JoinHandle<()>,
}

/// Background worker executing remote operations.
pub struct MarketWorker {
    /// Shared transport; each fetch task gets its own handle.
    api: Arc<dyn ListingApi>,

    /// Delay applied before each catalog fetch touches the network.
    debounce: Duration,

    /// Channel carrying responses back to the engine.
    responses: mpsc::UnboundedSender<WorkerResponse>,

    /// The current in-flight catalog fetch, if any.
    in_flight_fetch: Option<FetchTask>,
}

impl MarketWorker {
    /// Creates a worker that reports results on `responses`.
    #[must_use]
    pub fn new(
        api: Arc<dyn ListingApi>,
        debounce: Duration,
        responses: mpsc::UnboundedSender<WorkerResponse>,
    ) -> Self {
        Self {
            api,
            debounce,
            responses,
            in_flight_fetch: None,
        }
    }

    /// Spawns a worker onto the current runtime and returns its channels.
    ///
    /// The worker runs until the request sender is dropped; any in-flight
    /// fetch is aborted on shutdown.
    #[must_use]
    pub fn spawn(
        api: Arc<dyn ListingApi>,
        debounce: Duration,
    ) -> (
        mpsc::UnboundedSender<WorkerMessage>,
        mpsc::UnboundedReceiver<WorkerResponse>,
    ) {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (response_tx, response_rx) = mpsc::unbounded_channel();
        let worker = Self::new(api, debounce, response_tx);
        tokio::spawn(worker.run(request_rx));
        (request_tx, response_rx)
    }

    /// Drains the request channel until it closes.
    pub async fn run(mut self, mut requests: mpsc::UnboundedReceiver<WorkerMessage>) {
        while let Some(message) = requests.recv().await {
            self.handle_message(message).await;
        }
        if let Some(task) = self.in_flight_fetch.take() {
            tracing::debug!(seq = task.seq, "worker shutting down, aborting fetch");
            task.handle.abort();
        }
    }

    /// Processes one request.
    pub async fn handle_message(&mut self, message: WorkerMessage) {
        tracing::debug!(message_type = message_name(&message), "worker handling message");

        match message {
            WorkerMessage::FetchListings { seq, params } => self.start_fetch(seq, params),
            WorkerMessage::FetchListing { id } => {
                let response = match self.api.fetch_listing(id).await {
                    Ok(listing) => WorkerResponse::ListingLoaded { listing },
                    Err(e) => WorkerResponse::Error {
                        message: e.to_string(),
                    },
                };
                self.reply(response);
            }
            WorkerMessage::CreateListing { submission } => {
                let response = match self.api.create_listing(&submission).await {
                    Ok(listing) => {
                        tracing::debug!(listing_id = listing.id, "listing created");
                        WorkerResponse::ListingCreated { listing }
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "listing creation failed");
                        WorkerResponse::CreateFailed {
                            error: e.to_string(),
                        }
                    }
                };
                self.reply(response);
            }
            WorkerMessage::UpdateListing { id, patch } => {
                let response = match self.api.update_listing(id, &patch).await {
                    Ok(listing) => WorkerResponse::ListingUpdated { listing },
                    Err(e) => WorkerResponse::Error {
                        message: e.to_string(),
                    },
                };
                self.reply(response);
            }
            WorkerMessage::DeleteListing { id } => {
                let response = match self.api.delete_listing(id).await {
                    Ok(()) => WorkerResponse::ListingDeleted { id },
                    Err(e) => WorkerResponse::Error {
                        message: e.to_string(),
                    },
                };
                self.reply(response);
            }
        }
    }

    /// Starts a catalog fetch, superseding any fetch still in flight.
    fn start_fetch(&mut self, seq: u64, params: Vec<(String, String)>) {
        if let Some(task) = self.in_flight_fetch.take() {
            tracing::debug!(
                superseded = task.seq,
                by = seq,
                "cancelling superseded fetch"
            );
            task.handle.abort();
        }

        let api = Arc::clone(&self.api);
        let responses = self.responses.clone();
        let debounce = self.debounce;
        let handle = tokio::spawn(async move {
            if !debounce.is_zero() {
                tokio::time::sleep(debounce).await;
            }
            let response = match api.fetch_listings(&params).await {
                Ok(listings) => WorkerResponse::ListingsFetched { seq, listings },
                Err(e) => WorkerResponse::FetchFailed {
                    seq,
                    error: e.to_string(),
                },
            };
            let _ = responses.send(response);
        });

        self.in_flight_fetch = Some(FetchTask { seq, handle });
    }

    fn reply(&self, response: WorkerResponse) {
        if self.responses.send(response).is_err() {
            tracing::debug!("engine dropped the response channel");
        }
    }
}

fn message_name(message: &WorkerMessage) -> &'static str {
    match message {
        WorkerMessage::FetchListings { .. } => "FetchListings",
        WorkerMessage::FetchListing { .. } => "FetchListing",
        WorkerMessage::CreateListing { .. } => "CreateListing",
        WorkerMessage::UpdateListing { .. } => "UpdateListing",
        WorkerMessage::DeleteListing { .. } => "DeleteListing",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::draft::{ListingPatch, ListingSubmission};
    use crate::domain::error::{MarketError, Result};
    use crate::domain::listing::{Category, Condition, Listing, ListingId, Seller};
    use async_trait::async_trait;

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

    fn submission() -> ListingSubmission {
        ListingSubmission {
            name: "Bike".to_string(),
            description: "Road bike".to_string(),
            price: 120.0,
            image_url: None,
            category: Category::Sports,
            condition: Condition::Good,
            seller_id: 1,
        }
    }

    /// Transport stub: answers fetches after a configurable delay, echoing
    /// the `search` parameter into the listing name so tests can tell
    /// responses apart.
    struct StubApi {
        fetch_delay: Duration,
        fail_with: Option<u16>,
    }

    impl StubApi {
        fn instant() -> Self {
            Self {
                fetch_delay: Duration::ZERO,
                fail_with: None,
            }
        }

        fn slow(delay: Duration) -> Self {
            Self {
                fetch_delay: delay,
                fail_with: None,
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                fetch_delay: Duration::ZERO,
                fail_with: Some(status),
            }
        }

        fn fail(&self) -> Option<MarketError> {
            self.fail_with.map(|status| MarketError::Server {
                status,
                detail: "Internal Server Error".to_string(),
            })
        }
    }

    #[async_trait]
    impl ListingApi for StubApi {
        async fn fetch_listings(&self, params: &[(String, String)]) -> Result<Vec<Listing>> {
            if !self.fetch_delay.is_zero() {
                tokio::time::sleep(self.fetch_delay).await;
            }
            if let Some(err) = self.fail() {
                return Err(err);
            }
            let name = params
                .iter()
                .find(|(k, _)| k == "search")
                .map_or("unfiltered", |(_, v)| v.as_str());
            Ok(vec![listing(1, name)])
        }

        async fn fetch_listing(&self, id: ListingId) -> Result<Listing> {
            self.fail().map_or(Ok(listing(id, "One")), Err)
        }

        async fn create_listing(&self, submission: &ListingSubmission) -> Result<Listing> {
            if let Some(err) = self.fail() {
                return Err(err);
            }
            Ok(listing(99, &submission.name))
        }

        async fn update_listing(&self, id: ListingId, patch: &ListingPatch) -> Result<Listing> {
            if let Some(err) = self.fail() {
                return Err(err);
            }
            let mut updated = listing(id, "Updated");
            if let Some(price) = patch.price {
                updated.price = price;
            }
            Ok(updated)
        }

        async fn delete_listing(&self, _id: ListingId) -> Result<()> {
            self.fail().map_or(Ok(()), Err)
        }
    }

    fn fetch(seq: u64, search: &str) -> WorkerMessage {
        WorkerMessage::FetchListings {
            seq,
            params: vec![("search".to_string(), search.to_string())],
        }
    }

    #[tokio::test]
    async fn test_fetch_echoes_sequence_token() {
        let (requests, mut responses) =
            MarketWorker::spawn(Arc::new(StubApi::instant()), Duration::ZERO);
        requests.send(fetch(7, "lamp")).unwrap();

        match responses.recv().await.unwrap() {
            WorkerResponse::ListingsFetched { seq, listings } => {
                assert_eq!(seq, 7);
                assert_eq!(listings[0].name, "lamp");
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_superseded_fetch_is_cancelled() {
        let (requests, mut responses) = MarketWorker::spawn(
            Arc::new(StubApi::slow(Duration::from_millis(80))),
            Duration::ZERO,
        );

        requests.send(fetch(1, "old")).unwrap();
        // Give the worker a moment to spawn the first fetch before
        // superseding it.
        tokio::time::sleep(Duration::from_millis(10)).await;
        requests.send(fetch(2, "new")).unwrap();

        match responses.recv().await.unwrap() {
            WorkerResponse::ListingsFetched { seq, listings } => {
                assert_eq!(seq, 2);
                assert_eq!(listings[0].name, "new");
            }
            other => panic!("expected seq 2 first, got {other:?}"),
        }

        // The aborted fetch must never produce a response.
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(responses.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_debounce_coalesces_rapid_fetches() {
        let (requests, mut responses) = MarketWorker::spawn(
            Arc::new(StubApi::instant()),
            Duration::from_millis(60),
        );

        requests.send(fetch(1, "l")).unwrap();
        requests.send(fetch(2, "la")).unwrap();
        requests.send(fetch(3, "lamp")).unwrap();

        match responses.recv().await.unwrap() {
            WorkerResponse::ListingsFetched { seq, .. } => assert_eq!(seq, 3),
            other => panic!("unexpected response: {other:?}"),
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(responses.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_fetch_failure_carries_token_and_detail() {
        let (requests, mut responses) =
            MarketWorker::spawn(Arc::new(StubApi::failing(503)), Duration::ZERO);
        requests.send(fetch(4, "lamp")).unwrap();

        match responses.recv().await.unwrap() {
            WorkerResponse::FetchFailed { seq, error } => {
                assert_eq!(seq, 4);
                assert!(error.contains("503"));
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_success_and_failure() {
        let (requests, mut responses) =
            MarketWorker::spawn(Arc::new(StubApi::instant()), Duration::ZERO);
        requests
            .send(WorkerMessage::CreateListing {
                submission: submission(),
            })
            .unwrap();
        match responses.recv().await.unwrap() {
            WorkerResponse::ListingCreated { listing } => assert_eq!(listing.name, "Bike"),
            other => panic!("unexpected response: {other:?}"),
        }

        let (requests, mut responses) =
            MarketWorker::spawn(Arc::new(StubApi::failing(500)), Duration::ZERO);
        requests
            .send(WorkerMessage::CreateListing {
                submission: submission(),
            })
            .unwrap();
        match responses.recv().await.unwrap() {
            WorkerResponse::CreateFailed { error } => assert!(error.contains("500")),
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (requests, mut responses) =
            MarketWorker::spawn(Arc::new(StubApi::instant()), Duration::ZERO);

        requests
            .send(WorkerMessage::UpdateListing {
                id: 5,
                patch: ListingPatch {
                    price: Some(42.0),
                    ..Default::default()
                },
            })
            .unwrap();
        match responses.recv().await.unwrap() {
            WorkerResponse::ListingUpdated { listing } => {
                assert_eq!(listing.id, 5);
                assert_eq!(listing.price, 42.0);
            }
            other => panic!("unexpected response: {other:?}"),
        }

        requests.send(WorkerMessage::DeleteListing { id: 5 }).unwrap();
        assert_eq!(
            responses.recv().await.unwrap(),
            WorkerResponse::ListingDeleted { id: 5 }
        );
    }
}

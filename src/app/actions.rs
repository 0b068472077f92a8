//! Actions representing side effects to be executed by the embedding shim.
//!
//! The event handler returns a `Vec<Action>` after processing each event,
//! allowing multiple side effects to be queued atomically. Actions are the
//! boundary between pure state transformations and effectful operations:
//! posting work to the fetch worker and signalling navigation-level outcomes
//! to the host UI (via [`UiHooks`](crate::app::hooks::UiHooks)).

use crate::domain::listing::Listing;
use crate::worker::WorkerMessage;

/// Commands produced by the event handler for the embedding shim to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Posts a message to the fetch worker.
    ///
    /// The only way any network traffic happens: fetches, creations, updates
    /// and deletions all flow through here.
    PostToWorker(WorkerMessage),

    /// Announces a successfully created listing to the host UI.
    ///
    /// Emitted before [`Action::NavigateHome`] so hosts can toast or log the
    /// new listing before leaving the composer.
    AnnounceCreated(Listing),

    /// Asks the host UI to leave the composer and return to browsing.
    ///
    /// Emitted after a successful creation. Hosts without navigation simply
    /// ignore it.
    NavigateHome,
}

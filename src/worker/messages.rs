//! Worker protocol: requests to, and responses from, the fetch worker.
//!
//! The engine never performs I/O itself. Every network operation is expressed
//! as a [`WorkerMessage`] posted through an [`Action`](crate::app::Action) and
//! comes back as a [`WorkerResponse`] event. Catalog fetches carry the
//! sequence token issued at dispatch time; the token travels to the worker and
//! back so the commit point can recognize and silently drop responses that
//! lost the last-request-wins race.

use crate::domain::draft::{ListingPatch, ListingSubmission};
use crate::domain::listing::{Listing, ListingId};
use serde::{Deserialize, Serialize};

/// Messages sent from the engine to the fetch worker.
///
/// Each variant corresponds to one remote operation. `FetchListings` is the
/// only cancellable one: a newer fetch supersedes an older in-flight fetch
/// outright. Mutations are processed strictly in dispatch order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Fetch the catalog with the given query parameters.
    FetchListings {
        /// Sequence token issued by the catalog at dispatch time.
        seq: u64,

        /// Serialized filter criteria, per the query serializer's contract.
        params: Vec<(String, String)>,
    },

    /// Fetch a single listing by id.
    FetchListing {
        /// Server-assigned listing id.
        id: ListingId,
    },

    /// Create a listing from a validated submission.
    CreateListing {
        /// The outbound payload, price already coerced and seller attached.
        submission: ListingSubmission,
    },

    /// Apply a partial update to a listing.
    UpdateListing {
        /// Server-assigned listing id.
        id: ListingId,

        /// Fields to change; absent fields are left untouched.
        patch: ListingPatch,
    },

    /// Delete a listing.
    DeleteListing {
        /// Server-assigned listing id.
        id: ListingId,
    },
}

/// Responses sent from the fetch worker back to the engine.
///
/// Fetch responses echo the request's sequence token so the catalog can
/// discard the ones a newer request superseded. Creation failures are kept
/// distinct from other failures because the composer must retain the draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// A catalog fetch completed.
    ListingsFetched {
        /// Token of the request this payload answers.
        seq: u64,

        /// The fetched listings, in server-provided order.
        listings: Vec<Listing>,
    },

    /// A catalog fetch failed.
    FetchFailed {
        /// Token of the failed request.
        seq: u64,

        /// Human-readable diagnostic.
        error: String,
    },

    /// A single-listing fetch completed.
    ListingLoaded {
        /// The fetched listing.
        listing: Listing,
    },

    /// A listing was created.
    ListingCreated {
        /// The created listing, with its server-assigned id.
        listing: Listing,
    },

    /// Creating a listing failed. The composer keeps the draft intact.
    CreateFailed {
        /// Human-readable, retryable diagnostic.
        error: String,
    },

    /// A listing was updated.
    ListingUpdated {
        /// The updated listing.
        listing: Listing,
    },

    /// A listing was deleted.
    ListingDeleted {
        /// Id of the deleted listing.
        id: ListingId,
    },

    /// A non-fetch, non-create operation failed.
    Error {
        /// Human-readable diagnostic.
        message: String,
    },
}

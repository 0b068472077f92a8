//! Listing API abstraction.
//!
//! This module defines the [`ListingApi`] trait that abstracts over the remote
//! listings service. The worker only ever talks to this trait, which keeps the
//! fetch orchestration testable against an in-memory stub and leaves the HTTP
//! details to [`HttpListingApi`](crate::remote::http::HttpListingApi).
//!
//! # Design Philosophy
//!
//! The trait is minimal and mirrors the remote contract one method per
//! endpoint, not a generic repository. Each method maps directly to a worker
//! message.

use crate::domain::draft::{ListingPatch, ListingSubmission};
use crate::domain::error::Result;
use crate::domain::listing::{Listing, ListingId};
use async_trait::async_trait;

/// Abstraction over the remote listings service.
///
/// Implementations must be shareable across tasks (`Send + Sync`): the worker
/// hands a clone of the `Arc` to each in-flight fetch task.
///
/// # Implementations
///
/// - [`HttpListingApi`](crate::remote::http::HttpListingApi): JSON over HTTP
///   against the configured base URL (default)
#[async_trait]
pub trait ListingApi: Send + Sync {
    /// Fetches listings matching the given query parameters.
    ///
    /// Parameters follow the serializer's contract: absent keys mean
    /// unconstrained. Results come back in server-provided order.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Network`](crate::domain::MarketError::Network)
    /// on transport failure and
    /// [`MarketError::Server`](crate::domain::MarketError::Server) on any
    /// non-2xx status.
    async fn fetch_listings(&self, params: &[(String, String)]) -> Result<Vec<Listing>>;

    /// Fetches a single listing by id.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`fetch_listings`](Self::fetch_listings).
    async fn fetch_listing(&self, id: ListingId) -> Result<Listing>;

    /// Creates a listing from a validated submission, returning the created
    /// listing with its server-assigned id.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`fetch_listings`](Self::fetch_listings). Validation
    /// failures never reach this method.
    async fn create_listing(&self, submission: &ListingSubmission) -> Result<Listing>;

    /// Applies a partial update to a listing, returning the updated listing.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`fetch_listings`](Self::fetch_listings).
    async fn update_listing(&self, id: ListingId, patch: &ListingPatch) -> Result<Listing>;

    /// Deletes a listing. The server's confirmation payload is consumed but
    /// carries no information the engine uses.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`fetch_listings`](Self::fetch_listings).
    async fn delete_listing(&self, id: ListingId) -> Result<()>;
}

//! Core domain types: listings, facet vocabularies, drafts, sessions, errors.
//!
//! This module contains the data model shared by every other layer. Nothing in
//! here performs I/O; the types are plain values with validation and parsing
//! helpers.

pub mod draft;
pub mod error;
pub mod listing;
pub mod session;

pub use draft::{DraftField, DraftInput, DraftIssue, ListingDraft, ListingPatch, ListingSubmission};
pub use error::{MarketError, Result};
pub use listing::{Category, Condition, Listing, ListingId, Seller};
pub use session::UserSession;

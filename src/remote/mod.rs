//! Remote listings service access.
//!
//! - `query`: criteria → query-parameter serialization
//! - `api`: the [`ListingApi`] transport seam
//! - `http`: the JSON-over-HTTP implementation

pub mod api;
pub mod http;
pub mod query;

pub use api::ListingApi;
pub use http::HttpListingApi;

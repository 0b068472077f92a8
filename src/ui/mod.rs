//! Renderable view models computed from engine state.

pub mod viewmodel;

pub use viewmodel::{
    CatalogViewModel, ComposerViewModel, EmptyState, ErrorBanner, GridCell, ListingCard,
    ListingDetail, PLACEHOLDER_CELLS,
};

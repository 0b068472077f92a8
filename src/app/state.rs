//! Application state container and view model computation.
//!
//! This module defines [`AppState`], the central state container for a
//! browsing session, along with the defensive re-filtering of fetched
//! listings and the view model computation. It is the single source of truth
//! for all transient UI state.
//!
//! # Architecture
//!
//! `AppState` separates committed data (the catalog payload, in server order)
//! from derived state (the `visible` list) to keep transitions simple:
//! mutations land on the criteria/catalog/selection/composer sub-states, and
//! [`apply_filters`](AppState::apply_filters) recomputes the derived list.
//! View models are computed on demand from state snapshots.
//!
//! # State Components
//!
//! - **Criteria**: active filter constraints, one atomic mutation per event
//! - **Catalog**: fetch status, committed payload, sequence-token bookkeeping
//! - **Visible**: catalog payload re-filtered through the local predicate
//! - **Selection**: exclusive detail-overlay state
//! - **Composer**: listing draft, validation issues, submission status
//! - **Session**: explicit authentication context, absent while signed out

use crate::app::catalog::{Catalog, FetchStatus};
use crate::app::composer::{Composer, SubmitStatus};
use crate::app::criteria::FilterCriteria;
use crate::app::predicate;
use crate::app::selection::Selection;
use crate::domain::listing::Listing;
use crate::domain::session::UserSession;
use crate::ui::viewmodel::{
    CatalogViewModel, ComposerViewModel, EmptyState, ErrorBanner, GridCell, ListingCard,
    ListingDetail, PLACEHOLDER_CELLS,
};

/// Central state container for one browsing session.
///
/// Mutated only by the event handler in response to user input and worker
/// responses; the embedding event loop serializes all writes. View models are
/// computed on demand and never stored.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Active filter constraints.
    pub criteria: FilterCriteria,

    /// Fetch state machine and committed payload.
    pub catalog: Catalog,

    /// Catalog payload re-filtered through the local predicate.
    ///
    /// Recomputed by `apply_filters()` after every commit or criteria change.
    /// This is what the grid renders: the server already filtered the
    /// payload, but the local pass keeps the grid honest while a refresh for
    /// newer criteria is still in flight.
    pub visible: Vec<Listing>,

    /// Exclusive detail-overlay selection.
    pub selection: Selection,

    /// Listing creation draft and submission state.
    pub composer: Composer,

    /// Active user session, `None` while signed out.
    pub session: Option<UserSession>,
}

impl AppState {
    /// Creates a fresh browsing session with unconstrained criteria.
    ///
    /// `price_ceiling` comes from engine configuration and bounds the price
    /// range filter for the lifetime of the session.
    #[must_use]
    pub fn new(price_ceiling: f64) -> Self {
        Self {
            criteria: FilterCriteria::new(price_ceiling),
            catalog: Catalog::new(),
            visible: Vec::new(),
            selection: Selection::None,
            composer: Composer::new(),
            session: None,
        }
    }

    /// Recomputes the `visible` list from the committed payload.
    ///
    /// Applies the pure predicate to every committed listing, preserving
    /// server order. A selection pointing at a listing that fell out of the
    /// committed payload entirely is dropped; one that is merely filtered out
    /// of view survives (the overlay outlives a narrowing search).
    pub fn apply_filters(&mut self) {
        let _span = tracing::debug_span!(
            "apply_filters",
            total = self.catalog.listings.len(),
            search_len = self.criteria.search_text.len(),
        )
        .entered();

        self.visible = self
            .catalog
            .listings
            .iter()
            .filter(|listing| predicate::matches(listing, &self.criteria))
            .cloned()
            .collect();

        if let Some(id) = self.selection.selected_id() {
            if !self.catalog.contains(id) {
                tracing::debug!(listing_id = id, "selected listing left the catalog");
                self.selection.dismiss();
            }
        }

        tracing::debug!(visible = self.visible.len(), "filters applied");
    }

    /// Returns the listing currently open in the detail overlay, if any.
    #[must_use]
    pub fn selected_listing(&self) -> Option<&Listing> {
        self.selection
            .selected_id()
            .and_then(|id| self.catalog.get(id))
    }

    /// Computes the renderable view model for the browsing view.
    ///
    /// Encodes the grid rendering contract: placeholder cells only before the
    /// first payload exists, stale-while-revalidate afterwards, error banner
    /// over retained data, detail overlay from the selection.
    #[must_use]
    pub fn compute_viewmodel(&self) -> CatalogViewModel {
        let loading = self.catalog.status == FetchStatus::Loading;

        let cells: Vec<GridCell> = if loading && self.catalog.listings.is_empty() {
            (0..PLACEHOLDER_CELLS).map(|_| GridCell::Placeholder).collect()
        } else {
            self.visible.iter().map(|l| GridCell::Card(ListingCard::from_listing(l))).collect()
        };

        let empty_state = (!loading && cells.is_empty()).then(|| EmptyState {
            message: "No items found".to_string(),
        });

        let banner = self.catalog.error.as_ref().map(|message| ErrorBanner {
            message: message.clone(),
        });

        let overlay = self.selected_listing().map(ListingDetail::from_listing);

        CatalogViewModel {
            cells,
            refreshing: loading && !self.catalog.listings.is_empty(),
            empty_state,
            banner,
            overlay,
        }
    }

    /// Computes the renderable view model for the composer.
    #[must_use]
    pub fn compute_composer_viewmodel(&self) -> ComposerViewModel {
        ComposerViewModel {
            issues: self.composer.issues.clone(),
            submitting: self.composer.is_submitting(),
            error: match &self.composer.status {
                SubmitStatus::Failed(error) => Some(error.clone()),
                _ => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::{ListingId, Seller};

    fn listing(id: ListingId, name: &str, price: f64) -> Listing {
        Listing {
            id,
            name: name.to_string(),
            description: String::new(),
            price,
            image_url: None,
            category: "furniture".to_string(),
            condition: "good".to_string(),
            seller: Seller {
                id: 1,
                name: "Robin".to_string(),
            },
            created_at: chrono::Utc::now(),
        }
    }

    fn committed_state(listings: Vec<Listing>) -> AppState {
        let mut state = AppState::new(500.0);
        let seq = state.catalog.begin_fetch();
        state.catalog.offer(seq, listings);
        state.apply_filters();
        state
    }

    #[test]
    fn test_first_load_shows_placeholder_grid() {
        let mut state = AppState::new(500.0);
        state.catalog.begin_fetch();

        let vm = state.compute_viewmodel();
        assert_eq!(vm.cells.len(), PLACEHOLDER_CELLS);
        assert!(vm
            .cells
            .iter()
            .all(|c| matches!(c, GridCell::Placeholder)));
        assert!(!vm.refreshing);
        assert!(vm.empty_state.is_none());
    }

    #[test]
    fn test_refresh_keeps_previous_payload_visible() {
        let mut state = committed_state(vec![listing(1, "Chair", 70.0)]);
        state.catalog.begin_fetch();

        let vm = state.compute_viewmodel();
        assert!(vm.refreshing);
        assert_eq!(vm.cells.len(), 1);
        assert!(matches!(&vm.cells[0], GridCell::Card(card) if card.title == "Chair"));
    }

    #[test]
    fn test_empty_result_shows_empty_state() {
        let state = committed_state(vec![]);
        let vm = state.compute_viewmodel();
        assert!(vm.cells.is_empty());
        assert_eq!(vm.empty_state.unwrap().message, "No items found");
    }

    #[test]
    fn test_error_banner_over_retained_data() {
        let mut state = committed_state(vec![listing(1, "Chair", 70.0)]);
        let seq = state.catalog.begin_fetch();
        state.catalog.offer_failure(seq, "connection refused".to_string());

        let vm = state.compute_viewmodel();
        assert_eq!(vm.banner.unwrap().message, "connection refused");
        assert_eq!(vm.cells.len(), 1);
    }

    #[test]
    fn test_local_refilter_narrows_visible_list() {
        let mut state = committed_state(vec![
            listing(1, "Desk Lamp", 20.0),
            listing(2, "Chair", 70.0),
        ]);
        state.criteria.set_search_text("lamp");
        state.apply_filters();

        assert_eq!(state.visible.len(), 1);
        assert_eq!(state.visible[0].id, 1);
        // The committed payload itself is untouched.
        assert_eq!(state.catalog.listings.len(), 2);
    }

    #[test]
    fn test_selection_survives_filtering_but_not_removal() {
        let mut state = committed_state(vec![
            listing(1, "Desk Lamp", 20.0),
            listing(2, "Chair", 70.0),
        ]);
        state.selection.select(2);

        // Filtered out of view: overlay stays.
        state.criteria.set_search_text("lamp");
        state.apply_filters();
        assert_eq!(state.selection.selected_id(), Some(2));
        assert!(state.compute_viewmodel().overlay.is_some());

        // Gone from the committed payload: overlay drops.
        state.catalog.remove(2);
        state.apply_filters();
        assert_eq!(state.selection, Selection::None);
    }
}

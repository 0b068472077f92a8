//! Event handling and state transition logic.
//!
//! This module implements the core event handler that processes user input
//! and worker responses, translating them into state changes and action
//! sequences. It is the primary control flow coordinator for the engine and
//! the place where the last-request-wins ordering rule is enforced.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Events arrive from the embedding shim or the fetch worker
//! 2. [`handle_event`] pattern-matches the event type
//! 3. State mutations occur via the sub-state methods on `AppState`
//! 4. Actions are collected and returned for execution
//!
//! Every committed criteria mutation takes a fresh sequence token from the
//! catalog and schedules a fetch; only the response carrying the newest token
//! is ever committed, so an older, slower response can never clobber fresher
//! data that already arrived.
//!
//! # Event Types
//!
//! - **Criteria**: `SetSearchText`, `SetPriceRange`, `ToggleCategory`,
//!   `ToggleCondition`, `ClearFilters`, `Refresh`
//! - **Selection**: `SelectListing`, `DismissSelection`
//! - **Composer**: `DraftEdited`, `SubmitDraft`
//! - **Listing maintenance**: `LoadListing`, `UpdateListing`, `DeleteListing`
//! - **Session**: `SessionStarted`, `SessionEnded`
//! - **Worker**: `WorkerResponse` with typed response variants

use crate::app::actions::Action;
use crate::app::state::AppState;
use crate::domain::draft::{DraftInput, ListingPatch};
use crate::domain::error::Result;
use crate::domain::listing::{Category, Condition, ListingId};
use crate::domain::session::UserSession;
use crate::remote::query;
use crate::worker::{WorkerMessage, WorkerResponse};

/// Events triggered by user input or worker responses.
///
/// Each event is one atomic occurrence; the handler processes them
/// sequentially on the embedding event loop, so state transitions are
/// deterministic and observers react exactly once per user action.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Replaces the search text and schedules a fetch.
    SetSearchText(String),
    /// Sets the price range (clamped, swapped if inverted) and schedules a fetch.
    SetPriceRange {
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
    /// Toggles a category selection and schedules a fetch.
    ToggleCategory(Category),
    /// Toggles a condition selection and schedules a fetch.
    ToggleCondition(Condition),
    /// Resets all criteria to defaults and schedules a fetch.
    ClearFilters,
    /// Re-runs the fetch for the current criteria (user-initiated recovery).
    Refresh,

    /// Opens the detail overlay for a catalog listing.
    SelectListing(ListingId),
    /// Closes the detail overlay.
    DismissSelection,
    /// Dismisses the error banner.
    DismissError,

    /// Applies one edit to the listing draft.
    DraftEdited(DraftInput),
    /// Validates the draft and, when valid, submits it.
    SubmitDraft,

    /// Fetches a single listing by id (detail refresh).
    LoadListing(ListingId),
    /// Applies a partial update to a listing.
    UpdateListing {
        /// Server-assigned listing id.
        id: ListingId,
        /// Fields to change.
        patch: ListingPatch,
    },
    /// Deletes a listing.
    DeleteListing(ListingId),

    /// A user signed in; submissions may now carry their seller id.
    SessionStarted(UserSession),
    /// The user signed out.
    SessionEnded,

    /// Wraps a response from the fetch worker.
    WorkerResponse(WorkerResponse),
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// Returns a `(render, actions)` pair: `render` tells the embedding shim
/// whether visible state changed, `actions` are side effects to execute in
/// order. Stale fetch responses produce `(false, [])` — silently discarded,
/// exactly once, with only a trace line left behind.
///
/// # Errors
///
/// Reserved for state-machine violations; the current transitions are total
/// and always return `Ok`.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event_name(event)).entered();

    match event {
        Event::SetSearchText(text) => {
            state.criteria.set_search_text(text.clone());
            state.apply_filters();
            Ok((true, vec![dispatch_fetch(state)]))
        }
        Event::SetPriceRange { min, max } => {
            state.criteria.set_price_range(*min, *max);
            state.apply_filters();
            Ok((true, vec![dispatch_fetch(state)]))
        }
        Event::ToggleCategory(category) => {
            state.criteria.toggle_category(*category);
            state.apply_filters();
            Ok((true, vec![dispatch_fetch(state)]))
        }
        Event::ToggleCondition(condition) => {
            state.criteria.toggle_condition(*condition);
            state.apply_filters();
            Ok((true, vec![dispatch_fetch(state)]))
        }
        Event::ClearFilters => {
            state.criteria.clear();
            state.apply_filters();
            Ok((true, vec![dispatch_fetch(state)]))
        }
        Event::Refresh => Ok((true, vec![dispatch_fetch(state)])),

        Event::SelectListing(id) => {
            if state.catalog.contains(*id) {
                state.selection.select(*id);
                Ok((true, vec![]))
            } else {
                tracing::debug!(listing_id = id, "ignoring selection of unknown listing");
                Ok((false, vec![]))
            }
        }
        Event::DismissSelection => {
            if state.selection.selected_id().is_none() {
                return Ok((false, vec![]));
            }
            state.selection.dismiss();
            Ok((true, vec![]))
        }
        Event::DismissError => {
            if state.catalog.error.is_none() {
                return Ok((false, vec![]));
            }
            state.catalog.dismiss_error();
            Ok((true, vec![]))
        }

        Event::DraftEdited(input) => {
            state.composer.edit(input.clone());
            Ok((true, vec![]))
        }
        Event::SubmitDraft => {
            match state.composer.begin_submit(state.session.as_ref()) {
                Some(submission) => Ok((
                    true,
                    vec![Action::PostToWorker(WorkerMessage::CreateListing {
                        submission,
                    })],
                )),
                // Validation failed (issues now visible) or a submission is
                // already in flight. Either way, nothing reaches the network.
                None => Ok((true, vec![])),
            }
        }

        Event::LoadListing(id) => Ok((
            false,
            vec![Action::PostToWorker(WorkerMessage::FetchListing { id: *id })],
        )),
        Event::UpdateListing { id, patch } => {
            if patch.is_empty() {
                tracing::debug!(listing_id = id, "empty patch, nothing to update");
                return Ok((false, vec![]));
            }
            Ok((
                false,
                vec![Action::PostToWorker(WorkerMessage::UpdateListing {
                    id: *id,
                    patch: patch.clone(),
                })],
            ))
        }
        Event::DeleteListing(id) => Ok((
            false,
            vec![Action::PostToWorker(WorkerMessage::DeleteListing { id: *id })],
        )),

        Event::SessionStarted(session) => {
            tracing::debug!(seller_id = session.seller_id, "session started");
            state.session = Some(session.clone());
            Ok((true, vec![]))
        }
        Event::SessionEnded => {
            tracing::debug!("session ended");
            state.session = None;
            Ok((true, vec![]))
        }

        Event::WorkerResponse(response) => handle_worker_response(state, response),
    }
}

/// Processes a worker response, enforcing the sequence-token discipline.
fn handle_worker_response(
    state: &mut AppState,
    response: &WorkerResponse,
) -> Result<(bool, Vec<Action>)> {
    match response {
        WorkerResponse::ListingsFetched { seq, listings } => {
            if state.catalog.offer(*seq, listings.clone()).is_committed() {
                state.apply_filters();
                Ok((true, vec![]))
            } else {
                Ok((false, vec![]))
            }
        }
        WorkerResponse::FetchFailed { seq, error } => {
            if state.catalog.offer_failure(*seq, error.clone()).is_committed() {
                Ok((true, vec![]))
            } else {
                Ok((false, vec![]))
            }
        }
        WorkerResponse::ListingLoaded { listing } => {
            // Detail refresh: only meaningful for listings still in the
            // committed payload.
            if state.catalog.contains(listing.id) {
                state.catalog.replace(listing.clone());
                state.apply_filters();
                Ok((true, vec![]))
            } else {
                Ok((false, vec![]))
            }
        }
        WorkerResponse::ListingCreated { listing } => {
            state.composer.submit_succeeded();
            let refresh = dispatch_fetch(state);
            Ok((
                true,
                vec![
                    Action::AnnounceCreated(listing.clone()),
                    Action::NavigateHome,
                    refresh,
                ],
            ))
        }
        WorkerResponse::CreateFailed { error } => {
            state.composer.submit_failed(error.clone());
            Ok((true, vec![]))
        }
        WorkerResponse::ListingUpdated { listing } => {
            state.catalog.replace(listing.clone());
            state.apply_filters();
            Ok((true, vec![]))
        }
        WorkerResponse::ListingDeleted { id } => {
            state.catalog.remove(*id);
            state.apply_filters();
            Ok((true, vec![]))
        }
        WorkerResponse::Error { message } => {
            state.catalog.surface_error(message.clone());
            Ok((true, vec![]))
        }
    }
}

/// Takes a fresh sequence token and builds the fetch action for the current
/// criteria.
fn dispatch_fetch(state: &mut AppState) -> Action {
    let seq = state.catalog.begin_fetch();
    let params = query::serialize(&state.criteria)
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();
    Action::PostToWorker(WorkerMessage::FetchListings { seq, params })
}

fn event_name(event: &Event) -> &'static str {
    match event {
        Event::SetSearchText(_) => "SetSearchText",
        Event::SetPriceRange { .. } => "SetPriceRange",
        Event::ToggleCategory(_) => "ToggleCategory",
        Event::ToggleCondition(_) => "ToggleCondition",
        Event::ClearFilters => "ClearFilters",
        Event::Refresh => "Refresh",
        Event::SelectListing(_) => "SelectListing",
        Event::DismissSelection => "DismissSelection",
        Event::DismissError => "DismissError",
        Event::DraftEdited(_) => "DraftEdited",
        Event::SubmitDraft => "SubmitDraft",
        Event::LoadListing(_) => "LoadListing",
        Event::UpdateListing { .. } => "UpdateListing",
        Event::DeleteListing(_) => "DeleteListing",
        Event::SessionStarted(_) => "SessionStarted",
        Event::SessionEnded => "SessionEnded",
        Event::WorkerResponse(_) => "WorkerResponse",
    }
}

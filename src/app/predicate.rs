//! Pure listing predicate used for local filtering.
//!
//! [`matches`] is the ground truth for whether a listing satisfies the active
//! [`FilterCriteria`]. The fetch path asks the server to filter, but committed
//! payloads are re-filtered through this predicate as a defensive second pass,
//! and it alone decides what the grid shows while a refresh is in flight.

use crate::app::criteria::FilterCriteria;
use crate::domain::listing::Listing;

/// Returns true when `listing` satisfies every group of `criteria`.
///
/// Groups combine with AND; within the search group the fields combine with
/// OR:
/// - **search**: empty matches all; otherwise a case-insensitive substring
///   match against any of name, description, or the raw category text
/// - **price**: `price_min <= price <= price_max`, inclusive on both ends
/// - **category / condition**: an empty selection is unconstrained; otherwise
///   the listing's parsed facet must be a member. Listings whose raw facet
///   value falls outside the closed vocabulary never match a non-empty
///   selection, though they remain displayable when the selection is empty.
#[must_use]
pub fn matches(listing: &Listing, criteria: &FilterCriteria) -> bool {
    let matches_search = criteria.search_text.is_empty() || {
        let needle = criteria.search_text.to_lowercase();
        listing.name.to_lowercase().contains(&needle)
            || listing.description.to_lowercase().contains(&needle)
            || listing.category.to_lowercase().contains(&needle)
    };

    let matches_price =
        listing.price >= criteria.price_min && listing.price <= criteria.price_max;

    let matches_category = criteria.categories.is_empty()
        || listing
            .category_facet()
            .is_some_and(|facet| criteria.categories.contains(&facet));

    let matches_condition = criteria.conditions.is_empty()
        || listing
            .condition_facet()
            .is_some_and(|facet| criteria.conditions.contains(&facet));

    matches_search && matches_price && matches_category && matches_condition
}

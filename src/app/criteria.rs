//! Filter criteria state and its mutation operations.
//!
//! [`FilterCriteria`] is the single mutable source of truth for the active
//! filter constraints: free-text search, inclusive price range, and the
//! selected category/condition facets. It is created with defaults when a
//! browsing session starts and mutated only by user-initiated events, one
//! atomic transition per event, so observers react exactly once per action.
//!
//! Facet selections are insertion-ordered vectors rather than hash sets: the
//! remote contract only accepts a single value per facet, so the query
//! serializer needs a well-defined "first selected" value.

use crate::domain::listing::{Category, Condition};

/// The currently active set of filter constraints.
///
/// Defaults are the unconstrained state: empty search, the full
/// `[0, ceiling]` price range, and empty facet selections (empty = match
/// everything). The price ceiling is fixed at construction from engine
/// configuration and survives [`clear`](Self::clear).
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    /// Case-insensitive search text. Empty matches all listings.
    pub search_text: String,

    /// Inclusive lower price bound. Never below zero.
    pub price_min: f64,

    /// Inclusive upper price bound. Never above the configured ceiling.
    pub price_max: f64,

    /// Selected categories, in selection order. Empty = unconstrained.
    pub categories: Vec<Category>,

    /// Selected conditions, in selection order. Empty = unconstrained.
    pub conditions: Vec<Condition>,

    /// Upper bound of the price slider, from configuration.
    ceiling: f64,
}

impl FilterCriteria {
    /// Creates criteria at their unconstrained defaults for the given ceiling.
    #[must_use]
    pub fn new(ceiling: f64) -> Self {
        Self {
            search_text: String::new(),
            price_min: 0.0,
            price_max: ceiling,
            categories: Vec::new(),
            conditions: Vec::new(),
            ceiling,
        }
    }

    /// Returns the configured price ceiling.
    #[must_use]
    pub const fn ceiling(&self) -> f64 {
        self.ceiling
    }

    /// Replaces the search text.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    /// Sets the price range, clamping both ends to `[0, ceiling]`.
    ///
    /// If the caller supplies `min > max` the bounds are swapped rather than
    /// rejected, so a half-edited range from the UI still lands in a valid
    /// state.
    pub fn set_price_range(&mut self, min: f64, max: f64) {
        let clamp = |v: f64| v.clamp(0.0, self.ceiling);
        let (min, max) = (clamp(min), clamp(max));
        if min > max {
            self.price_min = max;
            self.price_max = min;
        } else {
            self.price_min = min;
            self.price_max = max;
        }
    }

    /// Toggles a category selection.
    ///
    /// Self-inverse: toggling the same id twice restores the prior selection,
    /// including its order.
    pub fn toggle_category(&mut self, category: Category) {
        if let Some(pos) = self.categories.iter().position(|c| *c == category) {
            self.categories.remove(pos);
        } else {
            self.categories.push(category);
        }
    }

    /// Toggles a condition selection. Self-inverse, like
    /// [`toggle_category`](Self::toggle_category).
    pub fn toggle_condition(&mut self, condition: Condition) {
        if let Some(pos) = self.conditions.iter().position(|c| *c == condition) {
            self.conditions.remove(pos);
        } else {
            self.conditions.push(condition);
        }
    }

    /// Resets every constraint to its default in one step.
    ///
    /// Idempotent: clearing an already-cleared criteria set is a no-op.
    pub fn clear(&mut self) {
        *self = Self::new(self.ceiling);
    }

    /// Returns true when every constraint is at its default.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.search_text.is_empty()
            && self.price_min == 0.0
            && self.price_max == self.ceiling
            && self.categories.is_empty()
            && self.conditions.is_empty()
    }
}

//! Exclusive detail-overlay selection state.
//!
//! At most one listing can be open in the detail overlay at a time. Clicking a
//! card overwrites any prior selection without confirmation; dismissing the
//! overlay returns to no selection. The state is view-local and ephemeral: it
//! is never persisted and does not survive leaving the browsing view.

use crate::domain::listing::ListingId;

/// Which listing, if any, is open in the detail overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    /// No listing selected; no overlay shown.
    #[default]
    None,

    /// The listing with this id is open in the overlay.
    Selected(ListingId),
}

impl Selection {
    /// Selects a listing, replacing any prior selection.
    pub fn select(&mut self, id: ListingId) {
        *self = Self::Selected(id);
    }

    /// Dismisses the overlay.
    pub fn dismiss(&mut self) {
        *self = Self::None;
    }

    /// Returns the selected id, if any.
    #[must_use]
    pub const fn selected_id(&self) -> Option<ListingId> {
        match self {
            Self::None => None,
            Self::Selected(id) => Some(*id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_overwrites_prior_selection() {
        let mut selection = Selection::default();
        assert_eq!(selection.selected_id(), None);

        selection.select(3);
        assert_eq!(selection.selected_id(), Some(3));

        selection.select(9);
        assert_eq!(selection.selected_id(), Some(9));
    }

    #[test]
    fn test_dismiss_returns_to_none() {
        let mut selection = Selection::Selected(3);
        selection.dismiss();
        assert_eq!(selection, Selection::None);

        // Dismissing twice stays at none.
        selection.dismiss();
        assert_eq!(selection, Selection::None);
    }
}

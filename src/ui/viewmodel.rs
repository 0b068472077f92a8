//! View model types representing renderable catalog state.
//!
//! View models are immutable snapshots computed from
//! [`AppState`](crate::app::AppState) and consumed by whatever front end
//! embeds the engine. They contain no business logic, only display-ready
//! data, and they encode the rendering contract for the catalog grid:
//!
//! - while the first fetch is in flight (loading with an empty committed
//!   payload) the grid shows a fixed count of placeholder cells
//! - once a payload exists it keeps being shown while newer fetches run in
//!   the background (`refreshing`), never flashing back to empty
//! - fetch errors appear as a dismissible banner above whatever data was
//!   already on screen

use crate::domain::draft::DraftIssue;
use crate::domain::listing::Listing;

/// Number of placeholder cells shown while the first fetch is in flight.
pub const PLACEHOLDER_CELLS: usize = 8;

/// Image shown for listings without a usable `imageUrl`.
pub const FALLBACK_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1579546929518-9e396f3cc809?w=400&q=80";

/// Complete view model for the browsing view.
#[derive(Debug, Clone)]
pub struct CatalogViewModel {
    /// Grid cells, either placeholders or listing cards.
    pub cells: Vec<GridCell>,

    /// True when a fetch is in flight behind an already-visible payload.
    pub refreshing: bool,

    /// Shown when no listing matches and nothing is loading.
    pub empty_state: Option<EmptyState>,

    /// Dismissible fetch/mutation error, prior data retained underneath.
    pub banner: Option<ErrorBanner>,

    /// Detail overlay for the selected listing, if any.
    pub overlay: Option<ListingDetail>,
}

/// One cell of the catalog grid.
#[derive(Debug, Clone)]
pub enum GridCell {
    /// Loading placeholder (pulsing card in the original UI).
    Placeholder,

    /// A listing card.
    Card(ListingCard),
}

/// Display information for a single listing card.
#[derive(Debug, Clone)]
pub struct ListingCard {
    pub id: i64,
    pub title: String,
    /// Price formatted for display, e.g. `$20` or `$19.99`.
    pub price_label: String,
    /// Listing image, falling back to [`FALLBACK_IMAGE_URL`].
    pub image_url: String,
    /// Raw category text (unrecognized server values stay displayable).
    pub category: String,
    /// Raw condition text.
    pub condition: String,
    pub seller_name: String,
    /// Humanized age, e.g. "5m ago".
    pub posted: String,
}

/// Detail overlay content for the selected listing.
#[derive(Debug, Clone)]
pub struct ListingDetail {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price_label: String,
    pub image_url: String,
    pub category: String,
    pub condition: String,
    pub seller_name: String,
    pub posted: String,
}

/// Empty state message (no matching listings).
#[derive(Debug, Clone)]
pub struct EmptyState {
    pub message: String,
}

/// Dismissible error banner.
#[derive(Debug, Clone)]
pub struct ErrorBanner {
    pub message: String,
}

/// Display state of the listing composer.
#[derive(Debug, Clone)]
pub struct ComposerViewModel {
    /// Field-level validation issues for inline display.
    pub issues: Vec<DraftIssue>,

    /// True while the creation request is in flight; disables the control.
    pub submitting: bool,

    /// Retryable submission error, draft retained.
    pub error: Option<String>,
}

/// Formats a price for display, dropping the cents when they are zero.
#[must_use]
pub fn price_label(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("${}", price as i64)
    } else {
        format!("${price:.2}")
    }
}

impl ListingCard {
    /// Builds a card from a listing, applying the image fallback.
    #[must_use]
    pub fn from_listing(listing: &Listing) -> Self {
        Self {
            id: listing.id,
            title: listing.name.clone(),
            price_label: price_label(listing.price),
            image_url: image_or_fallback(listing),
            category: listing.category.clone(),
            condition: listing.condition.clone(),
            seller_name: listing.seller.name.clone(),
            posted: listing.time_ago(),
        }
    }
}

impl ListingDetail {
    /// Builds the overlay content from a listing.
    #[must_use]
    pub fn from_listing(listing: &Listing) -> Self {
        Self {
            id: listing.id,
            title: listing.name.clone(),
            description: listing.description.clone(),
            price_label: price_label(listing.price),
            image_url: image_or_fallback(listing),
            category: listing.category.clone(),
            condition: listing.condition.clone(),
            seller_name: listing.seller.name.clone(),
            posted: listing.time_ago(),
        }
    }
}

fn image_or_fallback(listing: &Listing) -> String {
    listing
        .image_url
        .as_deref()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or(FALLBACK_IMAGE_URL)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::Seller;

    fn listing(image_url: Option<&str>) -> Listing {
        Listing {
            id: 1,
            name: "Desk Lamp".to_string(),
            description: "Warm light".to_string(),
            price: 20.0,
            image_url: image_url.map(str::to_string),
            category: "furniture".to_string(),
            condition: "good".to_string(),
            seller: Seller {
                id: 3,
                name: "Sam".to_string(),
            },
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_price_label_drops_zero_cents() {
        assert_eq!(price_label(20.0), "$20");
        assert_eq!(price_label(19.99), "$19.99");
        assert_eq!(price_label(0.0), "$0");
    }

    #[test]
    fn test_card_falls_back_to_placeholder_image() {
        let card = ListingCard::from_listing(&listing(None));
        assert_eq!(card.image_url, FALLBACK_IMAGE_URL);

        let blank = ListingCard::from_listing(&listing(Some("  ")));
        assert_eq!(blank.image_url, FALLBACK_IMAGE_URL);

        let custom = ListingCard::from_listing(&listing(Some("https://img.example/x.jpg")));
        assert_eq!(custom.image_url, "https://img.example/x.jpg");
    }
}

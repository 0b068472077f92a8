//! Listing domain model and facet vocabularies.
//!
//! This module defines the core `Listing` type representing a single item offered
//! in the marketplace catalog, together with the closed [`Category`] and
//! [`Condition`] facet vocabularies used for filtering. Listings carry their facet
//! values as raw strings so that unrecognized server values remain displayable;
//! facet matching only ever applies to values that parse into the closed sets.

use crate::domain::error::{MarketError, Result};
use serde::{Deserialize, Serialize};

/// Number of seconds in one minute.
const SECONDS_PER_MINUTE: i64 = 60;

/// Number of seconds in one hour.
const SECONDS_PER_HOUR: i64 = 3600;

/// Number of seconds in one day.
const SECONDS_PER_DAY: i64 = 86400;

/// Server-assigned listing identifier.
///
/// Unique and immutable for the lifetime of a listing.
pub type ListingId = i64;

/// Closed set of listing categories.
///
/// Each variant maps to a stable wire identifier (`id()`) used in query
/// parameters and creation payloads, and a human-readable `label()` used for
/// display. Values received from the server that do not parse into this set are
/// kept as raw strings on [`Listing`] and are excluded from facet matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Electronics,
    Textbooks,
    Furniture,
    Clothing,
    Kitchen,
    Sports,
    Services,
    Other,
}

impl Category {
    /// All categories, in the order they are presented to the user.
    pub const ALL: [Self; 8] = [
        Self::Electronics,
        Self::Textbooks,
        Self::Furniture,
        Self::Clothing,
        Self::Kitchen,
        Self::Sports,
        Self::Services,
        Self::Other,
    ];

    /// Returns the stable wire identifier for this category.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Electronics => "electronics",
            Self::Textbooks => "textbooks",
            Self::Furniture => "furniture",
            Self::Clothing => "clothing",
            Self::Kitchen => "kitchen",
            Self::Sports => "sports",
            Self::Services => "services",
            Self::Other => "other",
        }
    }

    /// Returns the human-readable label for this category.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Electronics => "Electronics",
            Self::Textbooks => "Textbooks",
            Self::Furniture => "Furniture",
            Self::Clothing => "Clothing",
            Self::Kitchen => "Kitchen",
            Self::Sports => "Sports & Outdoors",
            Self::Services => "Services",
            Self::Other => "Other",
        }
    }

    /// Parses a raw facet string into a category.
    ///
    /// Matching is case-insensitive against the wire identifier. Returns `None`
    /// for values outside the closed set; such values stay displayable on a
    /// listing but never satisfy a category constraint.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.id().eq_ignore_ascii_case(raw.trim()))
    }

    /// Parses a user-supplied value, failing with a validation error.
    ///
    /// Used by the draft flow and the CLI, where an unknown category is a
    /// user mistake rather than tolerated server data.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Validation`] when the value is outside the set.
    pub fn parse_strict(raw: &str) -> Result<Self> {
        Self::parse(raw)
            .ok_or_else(|| MarketError::Validation(format!("unknown category: {raw}")))
    }
}

/// Closed set of listing conditions.
///
/// Same contract as [`Category`]: stable wire identifiers, display labels,
/// lenient parsing for server data and strict parsing for user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    New,
    LikeNew,
    Good,
    Fair,
    Poor,
}

impl Condition {
    /// All conditions, best first.
    pub const ALL: [Self; 5] = [Self::New, Self::LikeNew, Self::Good, Self::Fair, Self::Poor];

    /// Returns the stable wire identifier for this condition.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::LikeNew => "like-new",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }

    /// Returns the human-readable label for this condition.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::LikeNew => "Like New",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }

    /// Parses a raw facet string into a condition (case-insensitive, lenient).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.id().eq_ignore_ascii_case(raw.trim()))
    }

    /// Parses a user-supplied value, failing with a validation error.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Validation`] when the value is outside the set.
    pub fn parse_strict(raw: &str) -> Result<Self> {
        Self::parse(raw)
            .ok_or_else(|| MarketError::Validation(format!("unknown condition: {raw}")))
    }
}

/// The user offering a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seller {
    pub id: i64,
    pub name: String,
}

/// A single item offered in the catalog.
///
/// Mirrors the server's JSON representation (camelCase on the wire). The facet
/// fields `category` and `condition` are raw strings: unrecognized values are
/// accepted for display but excluded from facet matching, per the catalog
/// invariants. Prices are non-negative decimals; the server enforces the
/// invariant and the draft validator enforces it on the way out.
///
/// # Fields
///
/// - `id`: server-assigned, unique, immutable
/// - `image_url`: optional; the viewmodel substitutes a placeholder when absent
/// - `created_at`: immutable ISO-8601 timestamp, parsed into UTC
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    pub category: String,
    pub condition: String,
    pub seller: Seller,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Listing {
    /// Returns the parsed category, if the raw value is in the closed set.
    #[must_use]
    pub fn category_facet(&self) -> Option<Category> {
        Category::parse(&self.category)
    }

    /// Returns the parsed condition, if the raw value is in the closed set.
    #[must_use]
    pub fn condition_facet(&self) -> Option<Condition> {
        Condition::parse(&self.condition)
    }

    /// Returns a human-readable string describing how long ago the listing was posted.
    ///
    /// The format varies based on the time elapsed:
    /// - Less than 1 minute: "just now"
    /// - Less than 1 hour: "Xm ago" (e.g., "5m ago")
    /// - Less than 1 day: "Xh ago" (e.g., "3h ago")
    /// - 1 day or more: "Xd ago" (e.g., "7d ago")
    #[must_use]
    pub fn time_ago(&self) -> String {
        let now = chrono::Utc::now().timestamp();
        let diff = now - self.created_at.timestamp();

        if diff < SECONDS_PER_MINUTE {
            "just now".to_string()
        } else if diff < SECONDS_PER_HOUR {
            let mins = diff / SECONDS_PER_MINUTE;
            format!("{mins}m ago")
        } else if diff < SECONDS_PER_DAY {
            let hours = diff / SECONDS_PER_HOUR;
            format!("{hours}h ago")
        } else {
            let days = diff / SECONDS_PER_DAY;
            format!("{days}d ago")
        }
    }
}

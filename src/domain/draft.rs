//! Listing draft model, validation and outbound payload shapes.
//!
//! A [`ListingDraft`] holds the raw user input for a new listing, price
//! included, exactly as typed. Validation happens entirely client-side and
//! must succeed before any network call: [`ListingDraft::validate`] either
//! produces a [`ListingSubmission`] (price coerced to a number, seller id
//! attached) or a list of field-level [`DraftIssue`]s for inline display.
//!
//! An unparsable or negative price is a rejection, never a pass-through: the
//! observed upstream behavior of submitting `parseFloat` garbage as a
//! non-numeric value is explicitly not reproduced.

use crate::domain::listing::{Category, Condition};
use crate::domain::session::UserSession;
use serde::{Deserialize, Serialize};

/// Identifies the draft field an issue belongs to, for inline display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Description,
    Price,
    ImageUrl,
    Category,
    Condition,
    /// Issues that concern the submission as a whole (e.g. no active session).
    Submission,
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftIssue {
    /// Field the issue is anchored to.
    pub field: DraftField,
    /// Human-readable message shown next to the field.
    pub message: String,
}

impl DraftIssue {
    fn new(field: DraftField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// One user edit to a draft field.
///
/// Carried by the `DraftEdited` event so that every edit is a single atomic
/// state transition on the composer.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftInput {
    Name(String),
    Description(String),
    /// Raw price text exactly as typed; parsed only at validation time.
    Price(String),
    ImageUrl(String),
    Category(Option<Category>),
    Condition(Option<Condition>),
}

/// Raw user input for a new listing.
///
/// All text fields hold exactly what the user typed; `price` stays a string
/// until validation. `category` and `condition` are `None` until chosen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingDraft {
    pub name: String,
    pub description: String,
    pub price: String,
    pub image_url: String,
    pub category: Option<Category>,
    pub condition: Option<Condition>,
}

impl ListingDraft {
    /// Applies one edit to the draft.
    pub fn apply(&mut self, input: DraftInput) {
        match input {
            DraftInput::Name(v) => self.name = v,
            DraftInput::Description(v) => self.description = v,
            DraftInput::Price(v) => self.price = v,
            DraftInput::ImageUrl(v) => self.image_url = v,
            DraftInput::Category(v) => self.category = v,
            DraftInput::Condition(v) => self.condition = v,
        }
    }

    /// Validates the draft and builds the outbound creation payload.
    ///
    /// Rules, all checked client-side before any network traffic:
    /// - name, description and price must be non-empty after trimming
    /// - price must parse to a finite number and be `>= 0`
    /// - category and condition must be chosen
    /// - an active [`UserSession`] must be present to supply the seller id
    ///
    /// All failing rules are reported at once so the UI can annotate every
    /// offending field in a single pass.
    ///
    /// # Errors
    ///
    /// Returns the full list of [`DraftIssue`]s when any rule fails.
    pub fn validate(
        &self,
        session: Option<&UserSession>,
    ) -> std::result::Result<ListingSubmission, Vec<DraftIssue>> {
        let mut issues = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            issues.push(DraftIssue::new(DraftField::Name, "title is required"));
        }

        let description = self.description.trim();
        if description.is_empty() {
            issues.push(DraftIssue::new(
                DraftField::Description,
                "description is required",
            ));
        }

        let price_text = self.price.trim();
        let price = if price_text.is_empty() {
            issues.push(DraftIssue::new(DraftField::Price, "price is required"));
            None
        } else {
            match price_text.parse::<f64>() {
                Ok(value) if value.is_finite() && value >= 0.0 => Some(value),
                Ok(value) if value.is_finite() => {
                    issues.push(DraftIssue::new(
                        DraftField::Price,
                        "price cannot be negative",
                    ));
                    None
                }
                _ => {
                    issues.push(DraftIssue::new(
                        DraftField::Price,
                        format!("'{price_text}' is not a valid price"),
                    ));
                    None
                }
            }
        };

        if self.category.is_none() {
            issues.push(DraftIssue::new(DraftField::Category, "choose a category"));
        }
        if self.condition.is_none() {
            issues.push(DraftIssue::new(DraftField::Condition, "choose a condition"));
        }

        let seller_id = match session {
            Some(session) => Some(session.seller_id),
            None => {
                issues.push(DraftIssue::new(
                    DraftField::Submission,
                    "sign in to post a listing",
                ));
                None
            }
        };

        if !issues.is_empty() {
            return Err(issues);
        }

        let image_url = self.image_url.trim();
        Ok(ListingSubmission {
            name: name.to_string(),
            description: description.to_string(),
            // Checked above together with category/condition/seller.
            price: price.unwrap_or_default(),
            image_url: (!image_url.is_empty()).then(|| image_url.to_string()),
            category: self.category.unwrap_or(Category::Other),
            condition: self.condition.unwrap_or(Condition::Good),
            seller_id: seller_id.unwrap_or_default(),
        })
    }
}

/// Validated creation payload for `POST /listings`.
///
/// Prices are numbers by this point and the seller id from the active session
/// is attached. Serializes to the server's camelCase wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSubmission {
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub category: Category,
    pub condition: Condition,
    pub seller_id: i64,
}

/// Partial update payload for `PUT /listings/{id}`.
///
/// Every field is optional; absent fields are omitted from the body entirely
/// so the server leaves them untouched. `status` is a free-form listing state
/// string carried by the remote contract (e.g. "active", "sold").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl ListingPatch {
    /// Returns true when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> ListingDraft {
        ListingDraft {
            name: "Bike".to_string(),
            description: "Road bike, recently tuned".to_string(),
            price: "120".to_string(),
            image_url: String::new(),
            category: Some(Category::Sports),
            condition: Some(Condition::Good),
        }
    }

    fn session() -> UserSession {
        UserSession::new(1, "Robin")
    }

    #[test]
    fn test_valid_draft_builds_submission() {
        let submission = valid_draft().validate(Some(&session())).unwrap();
        assert_eq!(submission.name, "Bike");
        assert_eq!(submission.price, 120.0);
        assert_eq!(submission.seller_id, 1);
        assert!(submission.image_url.is_none());
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let mut draft = valid_draft();
        draft.name = "   ".to_string();
        let issues = draft.validate(Some(&session())).unwrap_err();
        assert!(issues.iter().any(|i| i.field == DraftField::Name));
    }

    #[test]
    fn test_unparsable_price_is_rejected_not_submitted() {
        let mut draft = valid_draft();
        draft.price = "abc".to_string();
        let issues = draft.validate(Some(&session())).unwrap_err();
        assert!(issues.iter().any(|i| i.field == DraftField::Price));
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let mut draft = valid_draft();
        draft.price = "-5".to_string();
        let issues = draft.validate(Some(&session())).unwrap_err();
        assert!(issues.iter().any(|i| i.field == DraftField::Price));
    }

    #[test]
    fn test_non_finite_price_is_rejected() {
        let mut draft = valid_draft();
        draft.price = "inf".to_string();
        assert!(draft.validate(Some(&session())).is_err());

        draft.price = "NaN".to_string();
        assert!(draft.validate(Some(&session())).is_err());
    }

    #[test]
    fn test_missing_session_is_rejected() {
        let issues = valid_draft().validate(None).unwrap_err();
        assert!(issues.iter().any(|i| i.field == DraftField::Submission));
    }

    #[test]
    fn test_all_issues_reported_at_once() {
        let draft = ListingDraft::default();
        let issues = draft.validate(None).unwrap_err();
        // name, description, price, category, condition, session
        assert_eq!(issues.len(), 6);
    }

    #[test]
    fn test_submission_serializes_camel_case() {
        let submission = valid_draft().validate(Some(&session())).unwrap();
        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["sellerId"], 1);
        assert_eq!(json["category"], "sports");
        assert_eq!(json["condition"], "good");
        assert!(json.get("imageUrl").is_none());
    }

    #[test]
    fn test_patch_omits_unset_fields() {
        let patch = ListingPatch {
            price: Some(30.0),
            status: Some("sold".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json["price"], 30.0);
        assert_eq!(json["status"], "sold");
        assert!(json.get("name").is_none());
        assert!(json.get("imageUrl").is_none());
    }
}

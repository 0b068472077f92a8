//! Listing composer: draft editing and submission state.
//!
//! [`Composer`] holds the in-progress [`ListingDraft`], the field-level issues
//! from the last validation attempt, and the submission status. Submission is
//! a small state machine: validation gates the network call entirely (a draft
//! with issues never leaves the client), a successful submit clears the draft,
//! and a failed submit keeps every field intact so the user can retry without
//! retyping.

use crate::domain::draft::{DraftInput, DraftIssue, ListingDraft, ListingSubmission};
use crate::domain::session::UserSession;

/// Submission status of the composer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    /// Draft is editable; the submit control is enabled.
    #[default]
    Idle,

    /// A creation request is in flight; the submit control is disabled.
    Submitting,

    /// The last submission failed with this retryable error. The draft is
    /// untouched.
    Failed(String),
}

/// Draft editing and submission state for the creation flow.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    /// The in-progress draft, holding raw user input.
    pub draft: ListingDraft,

    /// Field-level issues from the most recent validation attempt. Cleared on
    /// the next edit of any field.
    pub issues: Vec<DraftIssue>,

    /// Current submission status.
    pub status: SubmitStatus,
}

impl Composer {
    /// Creates an empty composer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one field edit.
    ///
    /// Ignored while a submission is in flight (the control is disabled).
    /// Editing clears stale validation issues and any failure message, since
    /// the user is presumably addressing them.
    pub fn edit(&mut self, input: DraftInput) {
        if self.status == SubmitStatus::Submitting {
            tracing::debug!("draft edit ignored while submitting");
            return;
        }
        self.draft.apply(input);
        self.issues.clear();
        if matches!(self.status, SubmitStatus::Failed(_)) {
            self.status = SubmitStatus::Idle;
        }
    }

    /// Validates the draft and, on success, enters the submitting state.
    ///
    /// Returns the outbound payload when validation passes. When it fails the
    /// issues are retained for inline display, the status stays `Idle`, and no
    /// payload is produced — the caller must not touch the network.
    pub fn begin_submit(&mut self, session: Option<&UserSession>) -> Option<ListingSubmission> {
        if self.status == SubmitStatus::Submitting {
            tracing::debug!("submit ignored, already in flight");
            return None;
        }
        match self.draft.validate(session) {
            Ok(submission) => {
                self.issues.clear();
                self.status = SubmitStatus::Submitting;
                Some(submission)
            }
            Err(issues) => {
                tracing::debug!(issue_count = issues.len(), "draft failed validation");
                self.issues = issues;
                self.status = SubmitStatus::Idle;
                None
            }
        }
    }

    /// Records a successful creation: the draft is cleared for the next
    /// listing and the composer returns to idle.
    pub fn submit_succeeded(&mut self) {
        self.draft = ListingDraft::default();
        self.issues.clear();
        self.status = SubmitStatus::Idle;
    }

    /// Records a failed creation. The draft and its fields are kept intact;
    /// only the status changes, carrying the retryable error.
    pub fn submit_failed(&mut self, error: String) {
        self.status = SubmitStatus::Failed(error);
    }

    /// Returns true while a creation request is in flight.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.status == SubmitStatus::Submitting
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::{Category, Condition};

    fn filled_composer() -> Composer {
        let mut composer = Composer::new();
        composer.edit(DraftInput::Name("Bike".to_string()));
        composer.edit(DraftInput::Description("Road bike".to_string()));
        composer.edit(DraftInput::Price("120".to_string()));
        composer.edit(DraftInput::Category(Some(Category::Sports)));
        composer.edit(DraftInput::Condition(Some(Condition::Good)));
        composer
    }

    fn session() -> UserSession {
        UserSession::new(1, "Robin")
    }

    #[test]
    fn test_invalid_draft_never_produces_payload() {
        let mut composer = Composer::new();
        composer.edit(DraftInput::Price("10".to_string()));

        let payload = composer.begin_submit(Some(&session()));
        assert!(payload.is_none());
        assert!(!composer.issues.is_empty());
        assert_eq!(composer.status, SubmitStatus::Idle);
    }

    #[test]
    fn test_valid_draft_enters_submitting() {
        let mut composer = filled_composer();
        let payload = composer.begin_submit(Some(&session()));
        assert!(payload.is_some());
        assert!(composer.is_submitting());
    }

    #[test]
    fn test_double_submit_is_ignored_while_in_flight() {
        let mut composer = filled_composer();
        assert!(composer.begin_submit(Some(&session())).is_some());
        assert!(composer.begin_submit(Some(&session())).is_none());
    }

    #[test]
    fn test_failure_keeps_draft_intact() {
        let mut composer = filled_composer();
        composer.begin_submit(Some(&session()));
        composer.submit_failed("server error (500): Internal Server Error".to_string());

        assert_eq!(composer.draft.name, "Bike");
        assert_eq!(composer.draft.price, "120");
        assert!(matches!(composer.status, SubmitStatus::Failed(_)));

        // Resubmission works without retyping anything.
        assert!(composer.begin_submit(Some(&session())).is_some());
    }

    #[test]
    fn test_success_clears_draft() {
        let mut composer = filled_composer();
        composer.begin_submit(Some(&session()));
        composer.submit_succeeded();

        assert_eq!(composer.draft, ListingDraft::default());
        assert_eq!(composer.status, SubmitStatus::Idle);
    }

    #[test]
    fn test_edit_clears_issues_and_failure() {
        let mut composer = Composer::new();
        composer.begin_submit(None);
        assert!(!composer.issues.is_empty());

        composer.edit(DraftInput::Name("Bike".to_string()));
        assert!(composer.issues.is_empty());

        let mut failed = filled_composer();
        failed.begin_submit(Some(&session()));
        failed.submit_failed("boom".to_string());
        failed.edit(DraftInput::Price("125".to_string()));
        assert_eq!(failed.status, SubmitStatus::Idle);
    }
}

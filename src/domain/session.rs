//! Explicit user session object.
//!
//! Authentication state is passed into the components that need it as an
//! explicit [`UserSession`] value rather than read from an ambient flag: the
//! embedding shim constructs one at sign-in (`Event::SessionStarted`) and tears
//! it down at logout (`Event::SessionEnded`). Components that never post
//! listings never see it. Browsing requires no session; submitting a draft
//! does, because the creation payload carries the seller id.

use serde::{Deserialize, Serialize};

/// An authenticated user's session, for the lifetime of a sign-in.
///
/// Created at startup/sign-in and dropped at logout. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    /// Seller id attached to listings created during this session.
    pub seller_id: i64,

    /// Display name of the signed-in user.
    pub display_name: String,
}

impl UserSession {
    /// Creates a session for the given seller.
    #[must_use]
    pub fn new(seller_id: i64, display_name: impl Into<String>) -> Self {
        Self {
            seller_id,
            display_name: display_name.into(),
        }
    }
}

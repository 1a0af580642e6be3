//! User domain types.
//!
//! These types represent validated domain objects separate from
//! database row types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use trailhead_core::{Email, UserId};

/// A registered storefront user (domain type).
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// The logged-in identity stored in the session.
///
/// This is the only identity-bearing state the storefront keeps per
/// request; it is used as the ownership key for cart persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: String,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.as_str().to_string(),
        }
    }
}

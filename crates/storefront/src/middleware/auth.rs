//! Identity resolution for cart ownership.
//!
//! The [`OwnerIdentity`] extractor is the authentication gate: it
//! resolves the current request to either a registered user or the
//! anonymous guest context. It never fails a request - any session
//! read problem degrades to guest, which for cart operations means the
//! session-local backend is used.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use trailhead_core::UserId;

use crate::models::{CurrentUser, session_keys};

/// The resolved owner of cart state for the current request.
#[derive(Debug, Clone)]
pub enum Owner {
    /// A registered, logged-in user.
    User(CurrentUser),
    /// An anonymous browser context.
    Guest,
}

impl Owner {
    /// The user ID if this owner is a registered user.
    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        match self {
            Self::User(user) => Some(user.id),
            Self::Guest => None,
        }
    }
}

/// Extractor that resolves the current owner from the session.
///
/// Infallible by design: an expired or missing session, or a session
/// store error, resolves to [`Owner::Guest`] rather than failing the
/// request.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(OwnerIdentity(owner): OwnerIdentity) -> impl IntoResponse {
///     match owner {
///         Owner::User(user) => format!("Hello, {}!", user.email),
///         Owner::Guest => "Hello, guest!".to_string(),
///     }
/// }
/// ```
pub struct OwnerIdentity(pub Owner);

impl<S> FromRequestParts<S> for OwnerIdentity
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>() else {
            return Ok(Self(Owner::Guest));
        };

        let owner = match session.get::<CurrentUser>(session_keys::CURRENT_USER).await {
            Ok(Some(user)) => Owner::User(user),
            Ok(None) => Owner::Guest,
            Err(e) => {
                tracing::warn!(error = %e, "Session read failed, treating request as guest");
                Owner::Guest
            }
        };

        Ok(Self(owner))
    }
}

/// Store the logged-in user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

//! Authentication error types.

use trailhead_core::EmailError;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The email/password combination is wrong.
    ///
    /// Deliberately indistinguishable from an unknown email in
    /// user-facing responses to prevent account enumeration.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The email is already registered.
    #[error("user already exists")]
    UserAlreadyExists,

    /// The password does not meet requirements.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// The email address is invalid.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Password hashing failed.
    #[error("password hashing failed")]
    PasswordHash,

    /// Underlying repository error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

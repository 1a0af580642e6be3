//! Authentication route handlers.
//!
//! Email + password registration and login. Both log the user in by
//! writing [`CurrentUser`] to the session; login also folds any guest
//! cart lines accumulated before authentication into the user's
//! persistent cart.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use crate::cart::CartStore;
use crate::error::{AppError, Result};
use crate::middleware::{Owner, OwnerIdentity, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Register a new account and log it in.
#[instrument(skip(state, session, request))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<Value>> {
    let user = AuthService::new(state.pool())
        .register_with_password(&request.email, &request.password)
        .await?;

    let current = CurrentUser::from(&user);
    establish_session(&state, &session, &current).await?;

    tracing::info!(user_id = %user.id, "User registered");
    Ok(Json(json!({ "user": current })))
}

/// Log in with email and password.
#[instrument(skip(state, session, request))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>> {
    let user = AuthService::new(state.pool())
        .login_with_password(&request.email, &request.password)
        .await?;

    let current = CurrentUser::from(&user);
    establish_session(&state, &session, &current).await?;

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(Json(json!({ "user": current })))
}

/// Report the current session's user, or `null` for guests.
#[instrument(skip(owner))]
pub async fn current_session(OwnerIdentity(owner): OwnerIdentity) -> Json<Value> {
    match owner {
        Owner::User(user) => Json(json!({ "user": user })),
        Owner::Guest => Json(json!({ "user": Value::Null })),
    }
}

/// Sign out: destroy the session, guest cart included.
#[instrument(skip(session))]
pub async fn signout(session: Session) -> Result<Json<Value>> {
    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("session flush failed: {e}")))?;

    Ok(Json(json!({ "success": true })))
}

/// Rotate the session ID, store the user, and merge any guest cart.
///
/// The cycle guards against session fixation; the merge runs under the
/// freshly authenticated identity and is non-fatal on failure.
async fn establish_session(
    state: &AppState,
    session: &Session,
    current: &CurrentUser,
) -> Result<()> {
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(format!("session cycle failed: {e}")))?;

    set_current_user(session, current)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;

    let owner = Owner::User(current.clone());
    CartStore::new(state, session, &owner).merge_guest_cart().await;

    Ok(())
}

//! Request middleware: sessions and identity resolution.

pub mod auth;
pub mod session;

pub use auth::{Owner, OwnerIdentity, set_current_user};
pub use session::create_session_layer;

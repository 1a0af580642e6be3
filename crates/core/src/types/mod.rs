//! Shared newtype wrappers.
//!
//! These types make entity references and user input type-safe at the
//! crate boundaries: a `ProductId` cannot be passed where a `UserId`
//! is expected, and an `Email` is always structurally valid.

mod email;
mod id;

pub use email::{Email, EmailError};
pub use id::{CartLineId, ProductId, UserId};

//! Application services.

pub mod auth;
pub mod catalog;

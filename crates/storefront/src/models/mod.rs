//! Domain models for storefront.

pub mod cart;
pub mod product;
pub mod user;

pub use cart::{CartItem, GuestLine, LineKey, MAX_LINE_QUANTITY};
pub use product::Product;
pub use user::{CurrentUser, User};

/// Session storage keys.
///
/// All session state lives under these fixed keys. `GUEST_CART` holds
/// the full serialized guest line list; `CURRENT_USER` holds the
/// logged-in identity.
pub mod session_keys {
    /// Key for the logged-in user identity.
    pub const CURRENT_USER: &str = "current_user";
    /// Key for the anonymous cart line list.
    pub const GUEST_CART: &str = "guest_cart";
}

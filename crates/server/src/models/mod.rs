//! Domain types for the Comptoir backend.
//!
//! These types represent validated domain objects separate from database
//! row types; the repositories in [`crate::db`] convert between the two.

pub mod cart;
pub mod company;
pub mod product;
pub mod user;

pub use cart::{Cart, CartItem, CartLineView, CartView};
pub use company::Company;
pub use product::{NewProduct, Product};
pub use user::{CurrentUser, User, UserDraft};

/// Session key constants.
pub mod session_keys {
    /// The authenticated user snapshot.
    pub const CURRENT_USER: &str = "current_user";
}

//! Domain services sitting between the HTTP routes and the repositories.

pub mod auth;
pub mod cart;
pub mod glpi;
pub mod tariff;

pub use auth::{AuthError, AuthService};
pub use cart::CartService;
pub use glpi::{GlpiClient, GlpiError, OrderTicket};
pub use tariff::resolve_price;

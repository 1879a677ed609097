//! Core types for Comptoir.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod email;
pub mod id;
pub mod role;
pub mod tier;

pub use category::{Category, ProductSpecs, SpecsError};
pub use email::{Email, EmailError};
pub use id::*;
pub use role::UserRole;
pub use tier::Tier;

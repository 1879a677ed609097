//! Comptoir Core - Shared types library.
//!
//! This crate provides common types used across all Comptoir components:
//! - `server` - B2B catalogue and ordering backend
//! - `cli` - Command-line tools for migrations and catalogue imports
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no
//! HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, the catalogue category enumeration with its
//!   per-category spec shapes, tariff tiers, user roles, and emails

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

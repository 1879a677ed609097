//! Integration tests for Comptoir.
//!
//! # Running Tests
//!
//! Most tests exercise the server crate's library surface and run with a
//! plain `cargo test`. The `live_api` tests are marked `#[ignore]` and
//! need a running server:
//!
//! ```bash
//! # Terminal 1: migrate and start the server
//! cargo run -p comptoir-cli -- migrate
//! cargo run -p comptoir-server
//!
//! # Terminal 2: run the live tests against it
//! COMPTOIR_TEST_BASE_URL=http://127.0.0.1:5000 \
//!     cargo test -p comptoir-integration-tests -- --ignored
//! ```

use chrono::Utc;

use comptoir_core::{Category, ProductId, ProductSpecs};
use comptoir_server::models::Product;

/// Base URL of the server under test for `live_api` tests.
#[must_use]
pub fn test_base_url() -> String {
    std::env::var("COMPTOIR_TEST_BASE_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:5000".to_owned())
}

/// A reqwest client with a cookie store, required for session auth.
///
/// # Panics
///
/// Panics if the client cannot be built (test-only code).
#[must_use]
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("reqwest client")
}

/// A fully-populated computer product for tests that need one.
#[must_use]
pub fn sample_product(sku: &str, pricet1: f64, pricet2: f64, pricet3: f64) -> Product {
    Product {
        id: ProductId::new(1),
        sku: sku.to_owned(),
        gn: false,
        name: "Poste fixe reconditionné".to_owned(),
        brand: "HP".to_owned(),
        kind: "tour".to_owned(),
        model: "ProDesk 600 G5".to_owned(),
        description: "i5, 16 Go".to_owned(),
        description2: String::new(),
        price: Some(310.0),
        pricet1: Some(pricet1),
        pricet2: Some(pricet2),
        pricet3: Some(pricet3),
        category: Category::Computers,
        image: format!("https://catalogue.example.com/uploads/{}.jpg", sku.to_lowercase()),
        guarantee: "1 an".to_owned(),
        specs: ProductSpecs::empty(Category::Computers),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

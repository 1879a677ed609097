//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (database ping)
//! GET  /uploads/*                  - Static product images
//!
//! # Auth
//! POST /api/register               - Self-service account creation
//! POST /api/login                  - Password login (session cookie)
//! POST /api/logout                 - Logout (resets company selection for user role)
//! POST /api/change-password        - Change own password
//! GET  /api/me                     - Current account with companies populated
//!
//! # Catalogue
//! GET  /api/products               - Full catalogue
//! GET  /api/products/search?q=     - Free-text search (limit 10)
//! GET  /api/products/category/{c}  - Products of one category
//! GET  /api/products/{id}          - Product detail
//! POST /api/products               - Create product (admin)
//! PUT  /api/products/{id}          - Update product (admin)
//! POST /api/import                 - Run the workbook import (admin)
//!
//! # Companies
//! GET  /api/companies              - Company list
//! GET  /api/companies/{id}         - Company detail
//! POST /api/companies              - Create company (admin)
//! PUT  /api/companies/{id}         - Update company (admin)
//! DELETE /api/companies/{id}       - Delete company (admin)
//! POST /api/select-company         - Select acting company
//! POST /api/reset-company          - Clear acting company
//!
//! # Users (admin)
//! GET  /api/users                  - User list
//! GET  /api/users/{id}             - User detail
//! POST /api/users                  - Create user
//! PUT  /api/users/{id}             - Update user
//! DELETE /api/users/{id}           - Delete user
//!
//! # Cart (scoped to the caller's selected company)
//! GET  /api/cart                   - Current cart, products resolved
//! POST /api/cart                   - Add item (price snapshot supplied)
//! PATCH /api/cart                  - Update line quantity
//! DELETE /api/cart/{product_id}    - Remove line
//! DELETE /api/cart                 - Empty cart
//!
//! # Misc
//! POST /api/upload                 - Image upload (admin, multipart)
//! POST /api/glpi/ticket            - Place an order as a GLPI ticket
//! GET  /api/ping                   - Connectivity check
//! ```

pub mod auth;
pub mod cart;
pub mod companies;
pub mod glpi;
pub mod import;
pub mod products;
pub mod upload;
pub mod users;

use axum::{
    Json, Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the `/api` router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/change-password", post(auth::change_password))
        .route("/me", get(auth::me))
        // Catalogue
        .route("/products", get(products::list).post(products::create))
        .route("/products/search", get(products::search))
        .route("/products/category/{category}", get(products::list_by_category))
        .route("/products/{id}", get(products::detail).put(products::update))
        .route("/import", post(import::run))
        // Companies
        .route("/companies", get(companies::list).post(companies::create))
        .route(
            "/companies/{id}",
            get(companies::detail)
                .put(companies::update)
                .delete(companies::delete),
        )
        .route("/select-company", post(companies::select))
        .route("/reset-company", post(companies::reset))
        // Users
        .route("/users", get(users::list).post(users::create))
        .route(
            "/users/{id}",
            get(users::detail).put(users::update).delete(users::delete),
        )
        // Cart
        .route(
            "/cart",
            get(cart::get_cart)
                .post(cart::add_item)
                .patch(cart::update_quantity)
                .delete(cart::clear),
        )
        .route("/cart/{product_id}", delete(cart::remove_item))
        // Misc
        .route("/upload", post(upload::upload_image))
        .route("/glpi/ticket", post(glpi::create_ticket))
        .route("/ping", get(ping))
}

/// Connectivity check.
async fn ping() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "pong" }))
}

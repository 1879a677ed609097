//! Catalogue route handlers.
//!
//! Reads are open to any caller; create/update are admin operations (the
//! importer is the other writer). Category is carried on the wire under
//! its historical `role` key.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use comptoir_core::{Category, ProductId, ProductSpecs};

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{NewProduct, Product};
use crate::state::AppState;

/// GET /api/products — the whole catalogue.
#[instrument(skip_all)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(Json(products))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// GET /api/products/search?q= — free-text search over name,
/// description, brand, model and type. At most 10 hits.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Product>>> {
    let query = params
        .q
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::Validation("query parameter is required".to_owned()))?;

    let products = ProductRepository::new(state.pool()).search(&query).await?;
    Ok(Json(products))
}

/// GET /api/products/category/{category} — products of one category,
/// addressed by its wire label (e.g. `ordinateurs`).
#[instrument(skip(state))]
pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Product>>> {
    let category = Category::from_label(&category)
        .ok_or_else(|| AppError::Validation(format!("unknown category: {category}")))?;

    let products = ProductRepository::new(state.pool())
        .list_by_category(category)
        .await?;
    Ok(Json(products))
}

/// GET /api/products/{id} — product detail.
#[instrument(skip(state))]
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("product not found".to_owned()))?;

    Ok(Json(product))
}

#[derive(Debug, Deserialize)]
pub struct ProductBody {
    pub sku: String,
    #[serde(default)]
    pub gn: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub description2: String,
    pub price: Option<f64>,
    pub pricet1: Option<f64>,
    pub pricet2: Option<f64>,
    pub pricet3: Option<f64>,
    /// Category wire label.
    pub role: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub guarantee: String,
    /// Category-specific attribute bag; keys outside the category's
    /// whitelist are dropped.
    #[serde(default)]
    pub specs: serde_json::Value,
}

impl ProductBody {
    fn into_new_product(self) -> Result<NewProduct> {
        let category = Category::from_label(&self.role)
            .ok_or_else(|| AppError::Validation(format!("invalid role: {}", self.role)))?;

        let specs = ProductSpecs::from_value(category, self.specs)
            .map_err(|e| AppError::Validation(format!("invalid specs: {e}")))?;

        if self.sku.trim().is_empty() {
            return Err(AppError::Validation("sku is required".to_owned()));
        }

        Ok(NewProduct {
            sku: self.sku,
            gn: self.gn,
            name: self.name,
            brand: self.brand,
            kind: self.kind,
            model: self.model,
            description: self.description,
            description2: self.description2,
            price: self.price,
            pricet1: self.pricet1,
            pricet2: self.pricet2,
            pricet3: self.pricet3,
            category,
            image: self.image,
            guarantee: self.guarantee,
            specs,
        })
    }
}

/// POST /api/products — create a product (admin).
#[instrument(skip_all, fields(sku = %body.sku))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<ProductBody>,
) -> Result<(StatusCode, Json<Product>)> {
    let new = body.into_new_product()?;
    let product = ProductRepository::new(state.pool()).create(&new).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/products/{id} — full overwrite of a product (admin).
#[instrument(skip_all, fields(product_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
    Json(body): Json<ProductBody>,
) -> Result<Json<Product>> {
    let new = body.into_new_product()?;
    let product = ProductRepository::new(state.pool()).update(id, &new).await?;
    Ok(Json(product))
}

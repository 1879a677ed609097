//! Cart route handlers.
//!
//! Every operation is scoped to the caller's selected company; without a
//! selection there is no cart to talk about. Reads degrade to an empty
//! cart, mutations reject.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use tracing::instrument;

use comptoir_core::{CompanyId, ProductId};

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{CartView, CurrentUser};
use crate::services::CartService;
use crate::state::AppState;

fn selected_company(user: &CurrentUser) -> Result<CompanyId> {
    user.selected_company.ok_or_else(|| {
        AppError::Validation("select a company before using the cart".to_owned())
    })
}

/// GET /api/cart — the caller's cart for the selected company, with
/// products resolved. No selection or no cart both read as empty.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn get_cart(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<CartView>> {
    let Some(company) = user.selected_company else {
        return Ok(Json(CartView::empty()));
    };

    let view = CartService::new(state.pool()).view(user.id, company).await?;
    Ok(Json(view))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemBody {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Unit price already resolved against the company's tier by the
    /// caller; snapshotted into the line item.
    pub price: Option<f64>,
}

const fn default_quantity() -> u32 {
    1
}

/// POST /api/cart — add an item to the selected company's cart.
#[instrument(skip(state, user), fields(user_id = %user.id, product_id = %body.product_id))]
pub async fn add_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<AddItemBody>,
) -> Result<Json<CartView>> {
    let company = selected_company(&user)?;
    let price = body
        .price
        .ok_or_else(|| AppError::Validation("product price is required".to_owned()))?;

    let view = CartService::new(state.pool())
        .add_item(user.id, company, body.product_id, body.quantity, price)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("product not found".to_owned())
            }
            other => other.into(),
        })?;

    Ok(Json(view))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityBody {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// PATCH /api/cart — overwrite a line's quantity. A product that is not
/// in the cart leaves the cart unchanged but still answers 200.
#[instrument(skip(state, user), fields(user_id = %user.id, product_id = %body.product_id))]
pub async fn update_quantity(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<UpdateQuantityBody>,
) -> Result<Json<CartView>> {
    let company = selected_company(&user)?;

    let view = CartService::new(state.pool())
        .update_quantity(user.id, company, body.product_id, body.quantity)
        .await
        .map_err(cart_not_found)?;

    Ok(Json(view))
}

/// DELETE /api/cart/{product_id} — drop a line. Idempotent per product.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn remove_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<ProductId>,
) -> Result<Json<CartView>> {
    let company = selected_company(&user)?;

    let view = CartService::new(state.pool())
        .remove_item(user.id, company, product_id)
        .await
        .map_err(cart_not_found)?;

    Ok(Json(view))
}

/// DELETE /api/cart — empty the cart (the row stays).
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn clear(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<serde_json::Value>> {
    let company = selected_company(&user)?;

    let view = CartService::new(state.pool())
        .clear(user.id, company)
        .await
        .map_err(cart_not_found)?;

    Ok(Json(serde_json::json!({
        "message": "cart emptied",
        "cart": view,
    })))
}

fn cart_not_found(e: crate::db::RepositoryError) -> AppError {
    match e {
        crate::db::RepositoryError::NotFound => AppError::NotFound("cart not found".to_owned()),
        other => other.into(),
    }
}

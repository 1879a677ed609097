//! Company route handlers, including company selection.
//!
//! Selecting a company is what scopes the catalogue prices and the cart
//! for everything the caller does next.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use comptoir_core::{CompanyId, Tier};

use crate::db::{CompanyRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::Company;
use crate::routes::auth::UserView;
use crate::state::AppState;

/// GET /api/companies — all companies (any authenticated caller).
#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Vec<Company>>> {
    let companies = CompanyRepository::new(state.pool()).list().await?;
    Ok(Json(companies))
}

/// GET /api/companies/{id} — company detail.
#[instrument(skip(state))]
pub async fn detail(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<CompanyId>,
) -> Result<Json<Company>> {
    let company = CompanyRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("company not found".to_owned()))?;

    Ok(Json(company))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyBody {
    pub glpi_id: String,
    pub name: String,
    /// Tariff tier wire label (`taux1`..`taux3`); defaults to tier 1.
    #[serde(rename = "taux", default)]
    pub tier: Tier,
}

/// POST /api/companies — create a company (admin).
#[instrument(skip_all, fields(glpi_id = %body.glpi_id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<CompanyBody>,
) -> Result<(StatusCode, Json<Company>)> {
    let company = CompanyRepository::new(state.pool())
        .create(&body.glpi_id, &body.name, body.tier)
        .await?;
    Ok((StatusCode::CREATED, Json(company)))
}

/// PUT /api/companies/{id} — update a company (admin).
#[instrument(skip_all, fields(company_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<CompanyId>,
    Json(body): Json<CompanyBody>,
) -> Result<Json<Company>> {
    let company = CompanyRepository::new(state.pool())
        .update(id, &body.glpi_id, &body.name, body.tier)
        .await?;
    Ok(Json(company))
}

/// DELETE /api/companies/{id} — delete a company and pull it out of
/// every user's company set (admin).
#[instrument(skip_all, fields(company_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<CompanyId>,
) -> Result<Json<serde_json::Value>> {
    CompanyRepository::new(state.pool()).delete(id).await?;
    Ok(Json(serde_json::json!({ "message": "company deleted" })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectCompanyBody {
    pub company_id: CompanyId,
}

/// POST /api/select-company — pick the acting company for subsequent
/// pricing and cart operations. The company must exist and be in the
/// caller's set.
#[instrument(skip(state, user), fields(user_id = %user.id, company_id = %body.company_id))]
pub async fn select(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<SelectCompanyBody>,
) -> Result<Json<serde_json::Value>> {
    let users = UserRepository::new(state.pool());
    let full = users
        .get_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_owned()))?;

    CompanyRepository::new(state.pool())
        .get_by_id(body.company_id)
        .await?
        .ok_or_else(|| AppError::NotFound("company not found".to_owned()))?;

    if !full.companies.contains(&body.company_id) {
        return Err(AppError::Forbidden(
            "you do not have access to this company".to_owned(),
        ));
    }

    users
        .set_selected_company(user.id, Some(body.company_id))
        .await?;

    let updated = users
        .get_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_owned()))?;
    let view = UserView::load(state.pool(), updated).await?;

    Ok(Json(serde_json::json!({ "user": view })))
}

/// POST /api/reset-company — clear the acting company.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn reset(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<serde_json::Value>> {
    UserRepository::new(state.pool())
        .set_selected_company(user.id, None)
        .await?;

    Ok(Json(serde_json::json!({ "message": "company selection reset" })))
}

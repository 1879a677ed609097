//! Order placement via the GLPI helpdesk bridge.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use crate::db::CompanyRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::services::glpi::OrderTicket;
use crate::state::AppState;

/// POST /api/glpi/ticket — turn the caller's order into a GLPI ticket on
/// their selected company's entity.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create_ticket(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(order): Json<OrderTicket>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let glpi = state
        .glpi()
        .ok_or_else(|| AppError::Internal("GLPI bridge is not configured".to_owned()))?;

    if user.glpi_id.is_empty() {
        return Err(AppError::Validation(
            "your account has no GLPI user id".to_owned(),
        ));
    }

    let company_id = user.selected_company.ok_or_else(|| {
        AppError::Validation("select a company before placing an order".to_owned())
    })?;

    let company = CompanyRepository::new(state.pool())
        .get_by_id(company_id)
        .await?
        .ok_or_else(|| AppError::Validation("selected company no longer exists".to_owned()))?;

    if order.items.is_empty() {
        return Err(AppError::Validation("order has no items".to_owned()));
    }

    let entity_id: i64 = company.glpi_id.trim().parse().map_err(|_| {
        AppError::Validation(format!(
            "company GLPI id is not numeric: {}",
            company.glpi_id
        ))
    })?;

    let ticket_id = glpi
        .create_order_ticket(&order, entity_id, &user.glpi_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "ticket created",
            "ticketId": ticket_id,
        })),
    ))
}

//! User administration route handlers (admin only).
//!
//! Responses never carry the password hash; the domain `User` type does
//! not even hold it.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use comptoir_core::{CompanyId, Email, UserId, UserRole};

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{User, UserDraft};
use crate::services::auth::{hash_password, validate_password};
use crate::state::AppState;

/// GET /api/users — all accounts.
#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<User>>> {
    let users = UserRepository::new(state.pool()).list().await?;
    Ok(Json(users))
}

/// GET /api/users/{id} — account detail.
#[instrument(skip_all, fields(user_id = %id))]
pub async fn detail(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<UserId>,
) -> Result<Json<User>> {
    let user = UserRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_owned()))?;

    Ok(Json(user))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    pub email: String,
    /// Required on create; on update, re-hashes the credential when
    /// present and leaves it alone when absent.
    pub password: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub glpi_id: String,
    #[serde(default)]
    pub role: UserRole,
    /// Role-keyed attribute bag; absent on update means "keep".
    pub specs: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub companies: Vec<CompanyId>,
    pub selected_company: Option<CompanyId>,
}

impl UserBody {
    fn into_draft(
        self,
        existing_specs: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> Result<(UserDraft, Option<String>)> {
        let email = Email::parse(&self.email)
            .map_err(|e| AppError::Validation(format!("invalid email: {e}")))?;

        let password = self.password.filter(|p| !p.is_empty());
        if let Some(password) = &password {
            validate_password(password).map_err(|e| AppError::Validation(e.to_string()))?;
        }

        let draft = UserDraft {
            email,
            name: self.name,
            glpi_id: self.glpi_id,
            role: self.role,
            specs: self
                .specs
                .or(existing_specs)
                .unwrap_or_default(),
            companies: self.companies,
            selected_company: self.selected_company,
        };

        Ok((draft, password))
    }
}

/// POST /api/users — create an account.
#[instrument(skip_all, fields(email = %body.email))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<UserBody>,
) -> Result<(StatusCode, Json<User>)> {
    let users = UserRepository::new(state.pool());
    let (draft, password) = body.into_draft(None)?;

    let password =
        password.ok_or_else(|| AppError::Validation("password is required".to_owned()))?;

    if users.email_in_use(&draft.email, None).await? {
        return Err(AppError::Conflict("email already in use".to_owned()));
    }
    if users.glpi_id_in_use(&draft.glpi_id, None).await? {
        return Err(AppError::Conflict("GLPI ID already in use".to_owned()));
    }

    let hash = hash_password(&password).map_err(|e| AppError::Internal(e.to_string()))?;
    let user = users.create(draft, &hash).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /api/users/{id} — update an account; password only changes when
/// supplied.
#[instrument(skip_all, fields(user_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<UserId>,
    Json(body): Json<UserBody>,
) -> Result<Json<User>> {
    let users = UserRepository::new(state.pool());
    let existing = users
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_owned()))?;

    let (draft, password) = body.into_draft(Some(existing.specs))?;

    if users.email_in_use(&draft.email, Some(id)).await? {
        return Err(AppError::Conflict("email already in use".to_owned()));
    }
    if users.glpi_id_in_use(&draft.glpi_id, Some(id)).await? {
        return Err(AppError::Conflict("GLPI ID already in use".to_owned()));
    }

    let hash = match password {
        Some(p) => Some(hash_password(&p).map_err(|e| AppError::Internal(e.to_string()))?),
        None => None,
    };

    let user = users.update(id, draft, hash.as_deref()).await?;
    Ok(Json(user))
}

/// DELETE /api/users/{id} — delete an account.
#[instrument(skip_all, fields(user_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<UserId>,
) -> Result<Json<serde_json::Value>> {
    UserRepository::new(state.pool()).delete(id).await?;
    Ok(Json(serde_json::json!({ "message": "user deleted" })))
}

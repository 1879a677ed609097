//! Authentication route handlers.
//!
//! Login issues a server-side session (cookie), not a token the client
//! can inspect. Logout clears the session and, for plain `user`-role
//! accounts, resets the selected company.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tower_sessions::Session;
use tracing::instrument;

use comptoir_core::{Email, UserId, UserRole};

use crate::db::{CompanyRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::models::{Company, CurrentUser, User, UserDraft};
use crate::services::auth::{AuthError, AuthService, hash_password, validate_password};
use crate::state::AppState;

/// A user response with company references resolved, as returned by
/// login, `/me` and company selection.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    pub glpi_id: String,
    pub role: UserRole,
    pub specs: serde_json::Map<String, serde_json::Value>,
    pub companies: Vec<Company>,
    pub selected_company: Option<Company>,
}

impl UserView {
    /// Resolve a user's company references.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the lookup fails.
    pub async fn load(pool: &PgPool, user: User) -> Result<Self> {
        let companies = CompanyRepository::new(pool)
            .list_by_ids(&user.companies)
            .await?;
        let selected_company = user
            .selected_company
            .and_then(|id| companies.iter().find(|c| c.id == id).cloned());

        Ok(Self {
            id: user.id,
            email: user.email,
            name: user.name,
            glpi_id: user.glpi_id,
            role: user.role,
            specs: user.specs,
            companies,
            selected_company,
        })
    }
}

fn current_user_snapshot(user: &User) -> CurrentUser {
    CurrentUser {
        id: user.id,
        email: user.email.clone(),
        role: user.role,
        glpi_id: user.glpi_id.clone(),
        selected_company: user.selected_company,
    }
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// POST /api/register — self-service account creation with the default
/// role.
#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<Credentials>,
) -> Result<(axum::http::StatusCode, Json<serde_json::Value>)> {
    let email = Email::parse(&body.email)
        .map_err(|e| AppError::Validation(format!("invalid email: {e}")))?;
    validate_password(&body.password)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let users = UserRepository::new(state.pool());
    if users.email_in_use(&email, None).await? {
        return Err(AppError::Conflict("email already in use".to_owned()));
    }

    let password_hash =
        hash_password(&body.password).map_err(|e| AppError::Internal(e.to_string()))?;

    let draft = UserDraft {
        email,
        name: String::new(),
        glpi_id: String::new(),
        role: UserRole::default(),
        specs: serde_json::Map::new(),
        companies: Vec::new(),
        selected_company: None,
    };
    let user = users.create(draft, &password_hash).await?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "account created",
            "user": { "email": user.email },
        })),
    ))
}

/// POST /api/login — verify credentials and open a session.
#[instrument(skip(state, session, body), fields(email = %body.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<Credentials>,
) -> Result<Json<serde_json::Value>> {
    let user = AuthService::new(state.pool())
        .login_with_password(&body.email, &body.password)
        .await
        .map_err(|e| match e {
            AuthError::InvalidCredentials | AuthError::InvalidEmail(_) => {
                AppError::Unauthorized("invalid email or password".to_owned())
            }
            AuthError::Repository(err) => err.into(),
            other => AppError::Internal(other.to_string()),
        })?;

    set_current_user(&session, &current_user_snapshot(&user))
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;

    let view = UserView::load(state.pool(), user).await?;
    Ok(Json(serde_json::json!({
        "message": "logged in",
        "user": view,
    })))
}

/// POST /api/logout — close the session. Plain `user`-role accounts also
/// get their selected company reset so the next login starts neutral.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
) -> Result<Json<serde_json::Value>> {
    AuthService::new(state.pool())
        .clear_selection_on_logout(user.id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;

    Ok(Json(serde_json::json!({ "message": "logged out" })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordBody {
    pub current_password: String,
    pub new_password: String,
}

/// POST /api/change-password — change the caller's own password.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn change_password(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<ChangePasswordBody>,
) -> Result<Json<serde_json::Value>> {
    AuthService::new(state.pool())
        .change_password(user.id, &body.current_password, &body.new_password)
        .await
        .map_err(|e| match e {
            AuthError::InvalidCredentials => {
                AppError::Unauthorized("current password is incorrect".to_owned())
            }
            AuthError::WeakPassword(msg) => AppError::Validation(msg),
            AuthError::Repository(err) => err.into(),
            other => AppError::Internal(other.to_string()),
        })?;

    Ok(Json(serde_json::json!({ "message": "password changed" })))
}

/// GET /api/me — the caller's account with companies resolved.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<serde_json::Value>> {
    let full = UserRepository::new(state.pool())
        .get_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_owned()))?;

    let view = UserView::load(state.pool(), full).await?;
    Ok(Json(serde_json::json!({ "user": view })))
}

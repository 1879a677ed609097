//! Admin account management.
//!
//! Creates an account with the `admin` role directly in the database, for
//! bootstrapping a fresh deployment before any admin can log in.

use comptoir_core::types::{Email, UserRole};
use comptoir_server::db::UserRepository;
use comptoir_server::models::UserDraft;
use comptoir_server::services::auth;

use super::{CommandError, connect};

/// Create an admin account.
///
/// The password comes from the `--password` flag, falling back to the
/// `COMPTOIR_ADMIN_PASSWORD` environment variable so it can be kept out of
/// shell history.
pub async fn create_user(
    email: &str,
    name: &str,
    password: Option<&str>,
) -> Result<(), CommandError> {
    dotenvy::dotenv().ok();

    let email = Email::parse(email).map_err(|e| CommandError::InvalidInput(e.to_string()))?;

    let password = match password {
        Some(p) => p.to_owned(),
        None => std::env::var("COMPTOIR_ADMIN_PASSWORD")
            .map_err(|_| CommandError::MissingEnvVar("COMPTOIR_ADMIN_PASSWORD"))?,
    };
    auth::validate_password(&password).map_err(|e| CommandError::InvalidInput(e.to_string()))?;
    let password_hash =
        auth::hash_password(&password).map_err(|e| CommandError::InvalidInput(e.to_string()))?;

    let pool = connect().await?;
    let repo = UserRepository::new(&pool);

    let draft = UserDraft {
        email,
        name: name.to_owned(),
        glpi_id: String::new(),
        role: UserRole::Admin,
        specs: serde_json::Map::new(),
        companies: Vec::new(),
        selected_company: None,
    };

    let user = repo.create(draft, &password_hash).await?;
    tracing::info!(id = user.id.as_i32(), email = %user.email, "Admin account created");

    Ok(())
}

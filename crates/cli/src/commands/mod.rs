//! CLI subcommand implementations.

pub mod admin;
pub mod import;
pub mod migrate;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

/// Errors shared by the CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(#[from] comptoir_server::config::ConfigError),

    #[error("Repository error: {0}")]
    Repository(#[from] comptoir_server::db::RepositoryError),
}

/// Connect to the database named by `COMPTOIR_DATABASE_URL`.
pub async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("COMPTOIR_DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("COMPTOIR_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    Ok(comptoir_server::db::create_pool(&database_url).await?)
}

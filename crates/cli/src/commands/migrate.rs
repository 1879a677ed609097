//! Database migration command.
//!
//! Runs the migrations embedded in `crates/server/migrations/` against the
//! database named by `COMPTOIR_DATABASE_URL`.

use super::{CommandError, connect};

/// Run the database migrations.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    comptoir_server::db::run_migrations(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}

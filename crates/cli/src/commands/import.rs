//! Catalogue workbook import command.
//!
//! Reads the workbook at `COMPTOIR_WORKBOOK_PATH` and upserts products by
//! SKU, mirroring what `POST /api/import` does on the server.

use comptoir_server::config::ServerConfig;
use comptoir_server::import::SheetImporter;

use super::{CommandError, connect};

/// Import one sheet, or all known sheets when `sheet` is `None`.
pub async fn run(sheet: Option<&str>) -> Result<(), CommandError> {
    dotenvy::dotenv().ok();
    let config = ServerConfig::from_env()?;
    let pool = connect().await?;

    let importer = SheetImporter::new(&pool, &config);

    if let Some(sheet) = sheet {
        let report = importer
            .import_sheet(sheet)
            .await
            .map_err(|e| CommandError::InvalidInput(e.to_string()))?;
        tracing::info!(
            sheet = %report.sheet,
            imported = report.imported,
            skipped = report.skipped,
            "Sheet imported"
        );
        return Ok(());
    }

    let summary = importer.import_all().await;
    for report in &summary.reports {
        tracing::info!(
            sheet = %report.sheet,
            imported = report.imported,
            skipped = report.skipped,
            "Sheet imported"
        );
    }
    for sheet in &summary.failed_sheets {
        tracing::warn!(sheet = %sheet, "Sheet failed to import");
    }
    tracing::info!(
        imported = summary.imported(),
        skipped = summary.skipped(),
        "Import complete"
    );

    Ok(())
}

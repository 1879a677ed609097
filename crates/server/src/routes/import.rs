//! Workbook import trigger (admin).

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::import::SheetImporter;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ImportBody {
    /// Restrict the run to one workbook sheet.
    pub sheet: Option<String>,
}

/// POST /api/import — reconcile the catalogue from the workbook. With a
/// `sheet` in the body only that sheet runs; otherwise the full fixed
/// list does, tolerating per-sheet failures.
#[instrument(skip_all)]
pub async fn run(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    body: Option<Json<ImportBody>>,
) -> Result<Json<serde_json::Value>> {
    let importer = SheetImporter::new(state.pool(), state.config());
    let sheet = body.and_then(|Json(b)| b.sheet);

    match sheet {
        Some(sheet) => {
            let report = importer
                .import_sheet(&sheet)
                .await
                .map_err(|e| AppError::Internal(format!("import failed: {e}")))?;
            Ok(Json(serde_json::json!({
                "message": "sheet imported",
                "sheet": report.sheet,
                "imported": report.imported,
                "skipped": report.skipped,
            })))
        }
        None => {
            let summary = importer.import_all().await;
            Ok(Json(serde_json::json!({
                "message": "import finished",
                "imported": summary.imported(),
                "skipped": summary.skipped(),
                "failedSheets": summary.failed_sheets,
            })))
        }
    }
}

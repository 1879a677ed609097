//! Image upload route handler (admin).
//!
//! Files land in the uploads directory and are served back through the
//! `/uploads` static route. The stored name is the client's file name,
//! sanitized down to its final path component.

use axum::{
    Json,
    extract::{Multipart, State},
};
use tokio::io::AsyncWriteExt;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// POST /api/upload — store one image and answer with its public URL.
#[instrument(skip_all)]
pub async fn upload_image(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(sanitize_file_name)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AppError::Validation("missing file name".to_owned()))?;

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;

        let dir = &state.config().uploads_dir;
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| AppError::Internal(format!("uploads dir unavailable: {e}")))?;

        let path = dir.join(&file_name);
        let mut file = tokio::fs::File::create(&path)
            .await
            .map_err(|e| AppError::Internal(format!("failed to create file: {e}")))?;
        file.write_all(&data)
            .await
            .map_err(|e| AppError::Internal(format!("failed to write file: {e}")))?;

        let image_url = state.config().upload_url(&file_name);
        return Ok(Json(serde_json::json!({ "imageUrl": image_url })));
    }

    Err(AppError::Validation("no image supplied".to_owned()))
}

/// Keep only the final path component of a client-supplied file name.
fn sanitize_file_name(name: &str) -> String {
    std::path::Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name_strips_directories() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("photo.jpg"), "photo.jpg");
        assert_eq!(sanitize_file_name("dir/photo.jpg"), "photo.jpg");
    }
}

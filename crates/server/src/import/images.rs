//! Image URL resolution for imported products.
//!
//! Product images live in the uploads directory named after their SKU.
//! Resolution is a directory listing plus a case-insensitive stem match;
//! nothing is written.

use std::path::Path;

/// Resolve the public image URL for a SKU.
///
/// Looks for a file in `uploads_dir` whose stem equals the SKU
/// (case-insensitive, any extension) and builds the URL with that file's
/// actual extension. When the directory is unreadable or nothing
/// matches, falls back to `<upload_base>/<lowercased-sku>.jpg`.
#[must_use]
pub fn resolve_image_url(uploads_dir: &Path, upload_base: &str, sku: &str) -> String {
    let sku_lower = sku.to_lowercase();

    let fallback = format!("{upload_base}/{sku_lower}.jpg");

    let Ok(entries) = std::fs::read_dir(uploads_dir) else {
        return fallback;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let stem_matches = path
            .file_stem()
            .and_then(|s| s.to_str())
            .is_some_and(|stem| stem.to_lowercase() == sku_lower);

        if stem_matches {
            let extension = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| format!(".{e}"))
                .unwrap_or_default();
            return format!("{upload_base}/{sku_lower}{extension}");
        }
    }

    fallback
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_stem_case_insensitively() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("PC001.png"), b"").expect("write");

        let url = resolve_image_url(dir.path(), "https://cdn.example/uploads", "pc001");
        assert_eq!(url, "https://cdn.example/uploads/pc001.png");
    }

    #[test]
    fn test_uses_matched_file_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("ecr042.webp"), b"").expect("write");

        let url = resolve_image_url(dir.path(), "https://cdn.example/uploads", "ECR042");
        assert_eq!(url, "https://cdn.example/uploads/ecr042.webp");
    }

    #[test]
    fn test_falls_back_to_jpg_when_no_match() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("other.png"), b"").expect("write");

        let url = resolve_image_url(dir.path(), "https://cdn.example/uploads", "PC001");
        assert_eq!(url, "https://cdn.example/uploads/pc001.jpg");
    }

    #[test]
    fn test_falls_back_when_directory_missing() {
        let url = resolve_image_url(
            Path::new("/nonexistent/uploads"),
            "https://cdn.example/uploads",
            "PC001",
        );
        assert_eq!(url, "https://cdn.example/uploads/pc001.jpg");
    }
}

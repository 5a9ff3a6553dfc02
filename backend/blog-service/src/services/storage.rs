use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::error::{AppError, Result};

/// Local-disk store for uploaded images. Files are written under the
/// configured directory with a timestamped name and referenced from post
/// records by their `/uploads/<name>` relative path.
#[derive(Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create uploads dir: {}", e)))
    }

    /// Persist uploaded bytes; returns the relative path stored on the post.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String> {
        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin");
        let filename = format!("{}.{}", Utc::now().timestamp_millis(), ext);

        tokio::fs::write(self.dir.join(&filename), bytes)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to store upload: {}", e)))?;

        Ok(format!("/uploads/{}", filename))
    }

    /// Read a stored file back for serving. Only bare filenames are accepted;
    /// anything path-like is treated as absent.
    pub async fn open(&self, filename: &str) -> Result<Vec<u8>> {
        if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
            return Err(AppError::NotFound("File not found".to_string()));
        }

        tokio::fs::read(self.dir.join(filename))
            .await
            .map_err(|_| AppError::NotFound("File not found".to_string()))
    }

    /// Content type for a stored filename, from its extension.
    pub fn content_type(filename: &str) -> mime::Mime {
        match Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("jpg") | Some("jpeg") => mime::IMAGE_JPEG,
            Some("png") => mime::IMAGE_PNG,
            Some("gif") => mime::IMAGE_GIF,
            Some("webp") => "image/webp"
                .parse()
                .unwrap_or(mime::APPLICATION_OCTET_STREAM),
            _ => mime::APPLICATION_OCTET_STREAM,
        }
    }
}

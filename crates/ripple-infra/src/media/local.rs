//! Disk-backed media store. Files land under one directory and are
//! referenced as `<prefix>/<millis>-<name>`.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;

use ripple_core::ports::{MediaError, MediaStore, MediaUpload};

pub struct LocalMediaStore {
    root: PathBuf,
    public_prefix: String,
    max_bytes: usize,
}

impl LocalMediaStore {
    /// Store files in `root`; returned references start with the directory's
    /// final path component (e.g. `uploads/...`).
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        let root = root.into();
        let public_prefix = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "uploads".to_string());
        Self {
            root,
            public_prefix,
            max_bytes,
        }
    }
}

/// Keep the client's file name readable but confined to one path segment.
fn sanitize(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn store(&self, upload: MediaUpload) -> Result<String, MediaError> {
        let size = upload.bytes.len();
        if size > self.max_bytes {
            return Err(MediaError::TooLarge {
                size,
                limit: self.max_bytes,
            });
        }

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| MediaError::Storage(e.to_string()))?;

        let name = format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            sanitize(&upload.file_name)
        );
        tokio::fs::write(self.root.join(&name), &upload.bytes)
            .await
            .map_err(|e| MediaError::Storage(e.to_string()))?;

        tracing::debug!(file = %name, size, content_type = %upload.content_type, "Stored upload");
        Ok(format!("{}/{}", self.public_prefix, name))
    }
}

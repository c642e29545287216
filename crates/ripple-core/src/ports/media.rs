//! Media storage port.

use async_trait::async_trait;

/// An uploaded file as received at the boundary.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl MediaUpload {
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    pub fn is_video(&self) -> bool {
        self.content_type.starts_with("video/")
    }
}

/// Stores uploaded files and hands back an addressable reference.
/// Records only ever keep the reference, never the bytes.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn store(&self, upload: MediaUpload) -> Result<String, MediaError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Unsupported media type: {0}")]
    UnsupportedType(String),

    #[error("File too large: {size} bytes (limit {limit})")]
    TooLarge { size: usize, limit: usize },

    #[error("Storage failed: {0}")]
    Storage(String),
}

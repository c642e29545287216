//! Multipart form reading for the upload routes.

use std::collections::HashMap;

use actix_multipart::{Field, Multipart};
use futures_util::StreamExt;

use ripple_core::ports::MediaUpload;

use crate::middleware::error::{AppError, AppResult};

/// Text fields longer than this are rejected.
const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

/// A fully read multipart form: text fields plus at most one file per name.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    files: HashMap<String, MediaUpload>,
}

impl UploadForm {
    /// Drain `payload`, rejecting any file larger than `max_file_bytes`.
    pub async fn read(mut payload: Multipart, max_file_bytes: usize) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = payload.next().await {
            let mut field = field?;
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let file_name = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .map(str::to_string);

            match file_name {
                Some(file_name) => {
                    let content_type = field
                        .content_type()
                        .map(|m| m.essence_str().to_string())
                        .unwrap_or_else(|| "application/octet-stream".to_string());
                    let bytes = drain(&mut field, max_file_bytes, &name).await?;
                    if bytes.is_empty() && file_name.is_empty() {
                        continue;
                    }
                    form.files.insert(name, MediaUpload {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
                None => {
                    let bytes = drain(&mut field, MAX_TEXT_FIELD_BYTES, &name).await?;
                    let value = String::from_utf8(bytes)
                        .map_err(|_| AppError::BadRequest(format!("{name} must be UTF-8 text")))?;
                    form.fields.insert(name, value);
                }
            }
        }

        tracing::debug!(
            fields = form.fields.len(),
            files = form.files.len(),
            "Multipart form read"
        );
        Ok(form)
    }

    /// A text field, trimmed, or `None` when absent or blank.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// A text field exactly as sent.
    pub fn raw(&self, name: &str) -> Option<String> {
        self.fields.get(name).filter(|v| !v.is_empty()).cloned()
    }

    pub fn take_file(&mut self, name: &str) -> Option<MediaUpload> {
        self.files.remove(name)
    }
}

async fn drain(field: &mut Field, limit: usize, name: &str) -> AppResult<Vec<u8>> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk?;
        if buf.len() + chunk.len() > limit {
            return Err(AppError::BadRequest(format!(
                "{name} exceeds the {limit} byte limit"
            )));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

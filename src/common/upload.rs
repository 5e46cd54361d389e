use std::path::Path;

use bytes::Bytes;
use mime::Mime;
use tracing::info;

/// A user-selected file held in memory until it is submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Mime,
    pub data: Bytes,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, content_type: Mime, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            data: data.into(),
        }
    }

    /// Content type is guessed from the file name, falling back to
    /// `application/octet-stream`.
    pub fn guessed(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        let content_type = mime_guess::from_path(&file_name).first_or_octet_stream();
        Self::new(file_name, content_type, data)
    }

    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        info!("Loaded {} ({} bytes)", file_name, data.len());
        Ok(Self::guessed(file_name, data))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

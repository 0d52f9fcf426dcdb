use crate::{
    errors::AppResult,
    repositories::BlobStore,
    services::identifiers::unique_file_name,
};

pub const QUIZ_FILES_BUCKET: &str = "quiz-files";
pub const SUMMARY_FILES_BUCKET: &str = "summary-files";

/// A file received in a multipart request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadedFile {
    pub original_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(original_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            original_name: original_name.into(),
            bytes,
        }
    }

    /// File contents decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Uploads `file` under a fresh unique name and returns its blob path.
pub async fn store_upload(
    blobs: &dyn BlobStore,
    bucket: &str,
    file: Option<&UploadedFile>,
) -> AppResult<Option<String>> {
    let Some(file) = file else {
        return Ok(None);
    };
    let name = unique_file_name(&file.original_name);
    let path = blobs.upload(bucket, &name, file.bytes.clone()).await?;
    Ok(Some(path))
}

/// Best-effort removal of a blob whose rows were never committed.
pub async fn discard_upload(blobs: &dyn BlobStore, path: Option<&str>) {
    let Some(path) = path else {
        return;
    };
    match blobs.remove(path).await {
        Ok(()) => log::info!("Removed orphaned upload {}", path),
        Err(err) => log::warn!("Failed to remove orphaned upload {}: {}", path, err),
    }
}

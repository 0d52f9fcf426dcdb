use async_trait::async_trait;
use futures::io::AsyncWriteExt;
use mongodb::bson::Bson;

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    repositories::BlobStore,
};

/// Uploaded source files, one GridFS bucket per feature.
///
/// A blob's path is `{bucket}/{file_name}`; the path doubles as the GridFS
/// file id so it can be removed again without a lookup.
pub struct GridFsBlobStore {
    db: Database,
}

impl GridFsBlobStore {
    pub fn new(db: &Database) -> Self {
        Self { db: db.clone() }
    }
}

pub fn blob_path(bucket: &str, file_name: &str) -> String {
    format!("{}/{}", bucket, file_name)
}

fn split_path(path: &str) -> AppResult<(&str, &str)> {
    path.split_once('/')
        .filter(|(bucket, name)| !bucket.is_empty() && !name.is_empty())
        .ok_or_else(|| AppError::Storage(format!("invalid blob path '{}'", path)))
}

#[async_trait]
impl BlobStore for GridFsBlobStore {
    async fn upload(&self, bucket: &str, file_name: &str, bytes: Vec<u8>) -> AppResult<String> {
        let path = blob_path(bucket, file_name);
        let gridfs = self.db.gridfs_bucket(bucket);

        let mut stream = gridfs
            .open_upload_stream(file_name)
            .id(Bson::String(path.clone()))
            .await?;
        stream
            .write_all(&bytes)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to upload {}: {}", path, e)))?;
        stream
            .close()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to finish upload {}: {}", path, e)))?;

        log::info!("Uploaded {} ({} bytes)", path, bytes.len());
        Ok(path)
    }

    async fn remove(&self, path: &str) -> AppResult<()> {
        let (bucket, _) = split_path(path)?;
        self.db
            .gridfs_bucket(bucket)
            .delete(Bson::String(path.to_string()))
            .await?;
        Ok(())
    }
}

//! Storage module for report photos
//!
//! Photos live in a MinIO/S3-compatible bucket. Handlers depend on the
//! [`PhotoStorage`] trait so tests can swap in an in-memory store.

mod minio_client;

use async_trait::async_trait;

use crate::core::error::AppError;

pub use minio_client::MinIOClient;

#[async_trait]
pub trait PhotoStorage: Send + Sync {
    /// Store `data` under `key` and return the key
    async fn upload(&self, key: &str, data: Vec<u8>, content_type: &str)
        -> Result<String, AppError>;

    /// URL under which a stored object is publicly readable
    fn public_url(&self, key: &str) -> String;
}

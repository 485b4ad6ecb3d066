use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::photos::dtos::{photo_extension, PhotoResponseDto, MAX_PHOTO_SIZE};
use crate::modules::storage::PhotoStorage;

/// Validates and stores report photos
pub struct PhotoService {
    storage: Arc<dyn PhotoStorage>,
    prefix: String,
}

impl PhotoService {
    pub fn new(storage: Arc<dyn PhotoStorage>, prefix: impl Into<String>) -> Self {
        Self {
            storage,
            prefix: prefix.into().trim_matches('/').to_string(),
        }
    }

    /// Object key for a new photo: `{prefix}/{uuid}.{ext}`
    fn generate_key(&self, extension: &str) -> String {
        let name = format!("{}.{}", Uuid::new_v4(), extension);
        if self.prefix.is_empty() {
            name
        } else {
            format!("{}/{}", self.prefix, name)
        }
    }

    pub async fn upload(&self, data: Vec<u8>, content_type: &str) -> Result<PhotoResponseDto> {
        if data.is_empty() {
            return Err(AppError::BadRequest("Photo is empty".to_string()));
        }

        if data.len() > MAX_PHOTO_SIZE {
            return Err(AppError::BadRequest(format!(
                "Photo too large. Maximum size is {} bytes ({} MB)",
                MAX_PHOTO_SIZE,
                MAX_PHOTO_SIZE / 1024 / 1024
            )));
        }

        let extension = photo_extension(content_type).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Photo type '{}' is not allowed. Allowed types: image/jpeg, image/png, image/webp, image/heic",
                content_type
            ))
        })?;

        let size = data.len();
        let key = self.generate_key(extension);
        let key = self.storage.upload(&key, data, content_type).await?;
        let photo_url = self.storage.public_url(&key);

        tracing::info!("Uploaded photo {} ({} bytes)", key, size);

        Ok(PhotoResponseDto {
            key,
            photo_url,
            content_type: content_type.to_string(),
            size,
        })
    }
}

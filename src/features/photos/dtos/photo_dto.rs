use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Upload photo request DTO for OpenAPI documentation
/// Note: the handler reads the multipart body directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadPhotoDto {
    /// The photo to upload (JPEG, PNG, WebP or HEIC)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub photo: String,
}

/// Response DTO for an uploaded photo
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhotoResponseDto {
    /// Object key in the photo bucket
    pub key: String,
    /// Public URL, used as `photoUrl` when creating a report
    pub photo_url: String,
    pub content_type: String,
    pub size: usize,
}

/// Maximum photo size (10 MB)
pub const MAX_PHOTO_SIZE: usize = 10 * 1024 * 1024;

/// Accepted MIME types and the extension used for stored objects
pub const ALLOWED_PHOTO_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
    ("image/heic", "heic"),
];

/// File extension for an accepted MIME type, `None` if the type is not accepted
pub fn photo_extension(content_type: &str) -> Option<&'static str> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();

    ALLOWED_PHOTO_TYPES
        .iter()
        .find(|(allowed, _)| *allowed == mime)
        .map(|(_, ext)| *ext)
}

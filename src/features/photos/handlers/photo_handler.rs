use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::AppError;
use crate::features::photos::dtos::{PhotoResponseDto, UploadPhotoDto};
use crate::features::photos::services::PhotoService;
use crate::shared::types::ApiResponse;

/// Upload a report photo
///
/// Accepts multipart/form-data with a `photo` field. The returned `photoUrl`
/// is what clients send when creating a report.
#[utoipa::path(
    post,
    path = "/api/photos",
    tag = "photos",
    request_body(
        content = UploadPhotoDto,
        content_type = "multipart/form-data",
        description = "Photo upload form",
    ),
    responses(
        (status = 201, description = "Photo uploaded successfully", body = ApiResponse<PhotoResponseDto>),
        (status = 400, description = "Missing photo, unsupported type or too large"),
        (status = 413, description = "Request body too large")
    )
)]
pub async fn upload_photo(
    State(service): State<Arc<PhotoService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<PhotoResponseDto>>), AppError> {
    let mut photo: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name != "photo" {
            debug!("Ignoring unknown field: {}", field_name);
            continue;
        }

        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let data = field.bytes().await.map_err(|e| {
            debug!("Failed to read photo bytes: {}", e);
            AppError::BadRequest(format!("Failed to read photo data: {}", e))
        })?;

        photo = Some((data.to_vec(), content_type));
    }

    let (data, content_type) =
        photo.ok_or_else(|| AppError::BadRequest("Photo is required".to_string()))?;

    let response = service.upload(data, &content_type).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(response),
            Some("Photo uploaded successfully".to_string()),
            None,
        )),
    ))
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    use crate::shared::test_helpers::{body_json, StubFeatureSource, TestApp};

    const BOUNDARY: &str = "X-PHOTO-BOUNDARY";

    fn multipart_request(field: &str, content_type: &str, data: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"pothole.jpg\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/photos")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_upload_photo() {
        let app = TestApp::new(StubFeatureSource::default());

        let response = app
            .router
            .clone()
            .oneshot(multipart_request("photo", "image/jpeg", &[0xFF, 0xD8, 0xFF, 0xE0]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        let key = json["data"]["key"].as_str().unwrap();
        assert!(key.starts_with("photos/") && key.ends_with(".jpg"));
        assert_eq!(
            json["data"]["photoUrl"],
            format!("http://storage.test/report-photos/{}", key)
        );
        assert!(app.photos.contains(key));
    }

    #[tokio::test]
    async fn test_upload_rejects_unsupported_type() {
        let app = TestApp::new(StubFeatureSource::default());

        let response = app
            .router
            .clone()
            .oneshot(multipart_request("photo", "image/gif", b"GIF89a"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(app.photos.len(), 0);
    }

    #[tokio::test]
    async fn test_upload_requires_photo_field() {
        let app = TestApp::new(StubFeatureSource::default());

        let response = app
            .router
            .clone()
            .oneshot(multipart_request("file", "image/png", b"\x89PNG"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(app.photos.len(), 0);
    }
}

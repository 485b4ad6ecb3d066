use axum::{extract::DefaultBodyLimit, routing::post, Router};
use std::sync::Arc;

use crate::features::photos::dtos::MAX_PHOTO_SIZE;
use crate::features::photos::handlers::upload_photo;
use crate::features::photos::services::PhotoService;

/// Create routes for the photos feature
pub fn routes(photo_service: Arc<PhotoService>) -> Router {
    Router::new()
        .route(
            "/api/photos",
            // Allow MAX_PHOTO_SIZE plus room for multipart framing
            post(upload_photo).layer(DefaultBodyLimit::max(MAX_PHOTO_SIZE + 1024 * 1024)),
        )
        .with_state(photo_service)
}

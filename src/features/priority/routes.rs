use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::priority::handlers::{score_location, score_report};
use crate::features::priority::services::PriorityService;

/// Create routes for the priority feature
pub fn routes(priority_service: Arc<PriorityService>) -> Router {
    Router::new()
        .route("/api/priority-score", post(score_location))
        .route("/api/reports/{id}/priority-score", get(score_report))
        .with_state(priority_service)
}

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::priority::dtos::{PriorityScoreRequestDto, PriorityScoreResponseDto};
use crate::features::priority::services::PriorityService;
use crate::features::reports::ReportService;
use crate::shared::types::ApiResponse;

/// Compute the priority score of a location
#[utoipa::path(
    post,
    path = "/api/priority-score",
    request_body = PriorityScoreRequestDto,
    responses(
        (status = 200, description = "Priority score computed", body = ApiResponse<PriorityScoreResponseDto>),
        (status = 400, description = "Missing or invalid coordinates"),
        (status = 502, description = "Map data service unavailable")
    ),
    tag = "priority"
)]
pub async fn score_location(
    State(service): State<Arc<PriorityService>>,
    AppJson(dto): AppJson<PriorityScoreRequestDto>,
) -> Result<Json<ApiResponse<PriorityScoreResponseDto>>> {
    let origin = dto.into_coordinate()?;
    let score = service.score(origin).await?;
    Ok(Json(ApiResponse::success(Some(score.into()), None, None)))
}

/// Compute the priority score of a stored report's location
#[utoipa::path(
    get,
    path = "/api/reports/{id}/priority-score",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Priority score computed", body = ApiResponse<PriorityScoreResponseDto>),
        (status = 404, description = "Report not found"),
        (status = 502, description = "Map data service unavailable")
    ),
    tag = "priority"
)]
pub async fn score_report(
    State(service): State<Arc<PriorityService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<PriorityScoreResponseDto>>> {
    let id = ReportService::parse_id(&id)?;
    let score = service.score_report(id).await?;
    Ok(Json(ApiResponse::success(Some(score.into()), None, None)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use tower::ServiceExt;

    use crate::features::priority::clients::FeatureClass;
    use crate::features::priority::geo::Coordinate;
    use crate::shared::test_helpers::{
        body_json, empty_request, json_request, StubFeatureSource, TestApp,
    };

    fn origin() -> Coordinate {
        Coordinate::new(12.9716, 77.5946).unwrap()
    }

    #[tokio::test]
    async fn test_score_location() {
        let source = StubFeatureSource::default()
            .with_feature(FeatureClass::Hospital, origin(), "hospital")
            .with_feature(FeatureClass::School, origin(), "school");
        let app = TestApp::new(source);

        let response = app
            .router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/priority-score",
                json!({ "latitude": 12.9716, "longitude": 77.5946 }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["rawScore"], 9.0);
        assert_eq!(json["data"]["normalizedScore"], 0.18);
        assert_eq!(json["data"]["featureCount"], 2);
    }

    #[tokio::test]
    async fn test_score_location_requires_coordinates() {
        let app = TestApp::new(StubFeatureSource::default());

        let response = app
            .router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/priority-score",
                json!({ "latitude": 12.9716 }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_external_failure_is_bad_gateway() {
        let source = StubFeatureSource::default().failing_on(FeatureClass::School);
        let app = TestApp::new(source);

        let response = app
            .router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/priority-score",
                json!({ "latitude": 12.9716, "longitude": 77.5946 }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Failed to fetch data or calculate score");
    }

    #[tokio::test]
    async fn test_score_stored_report() {
        let source =
            StubFeatureSource::default().with_feature(FeatureClass::Road, origin(), "secondary");
        let app = TestApp::new(source);

        let response = app
            .router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/reports",
                json!({
                    "userId": "user-1",
                    "latitude": 12.9716,
                    "longitude": 77.5946,
                    "photoUrl": "photos/a.jpg"
                }),
            ))
            .await
            .unwrap();
        let id = body_json(response).await["data"]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let response = app
            .router
            .clone()
            .oneshot(empty_request(
                "GET",
                &format!("/api/reports/{}/priority-score", id),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["rawScore"], 3.0);

        let response = app
            .router
            .clone()
            .oneshot(empty_request(
                "GET",
                &format!("/api/reports/{}/priority-score", uuid::Uuid::new_v4()),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

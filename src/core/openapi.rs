use utoipa::{Modify, OpenApi};

use crate::features::photos::{dtos as photos_dtos, handlers as photos_handlers};
use crate::features::priority::{dtos as priority_dtos, handlers as priority_handlers};
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Reports
        reports_handlers::report_handler::create_report,
        reports_handlers::report_handler::list_reports,
        reports_handlers::report_handler::list_reports_by_status,
        reports_handlers::report_handler::get_report,
        reports_handlers::report_handler::update_report_status,
        // Priority
        priority_handlers::priority_handler::score_location,
        priority_handlers::priority_handler::score_report,
        // Photos
        photos_handlers::photo_handler::upload_photo,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Reports
            reports_models::ReportStatus,
            reports_dtos::CreateReportDto,
            reports_dtos::ReportResponseDto,
            reports_dtos::UpdateReportStatusDto,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            // Priority
            priority_dtos::PriorityScoreRequestDto,
            priority_dtos::PriorityScoreResponseDto,
            priority_dtos::FeatureCountsDto,
            ApiResponse<priority_dtos::PriorityScoreResponseDto>,
            // Photos
            photos_dtos::UploadPhotoDto,
            photos_dtos::PhotoResponseDto,
            ApiResponse<photos_dtos::PhotoResponseDto>,
        )
    ),
    tags(
        (name = "reports", description = "Citizen issue reports and status transitions"),
        (name = "priority", description = "Proximity-based priority scoring"),
        (name = "photos", description = "Report photo upload"),
    ),
    info(
        title = "Civic Priority API",
        version = "0.1.0",
        description = "Issue reporting with proximity-based priority scoring",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_all_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/api/reports",
            "/api/reports/status/{status}",
            "/api/reports/{id}",
            "/api/reports/{id}/status",
            "/api/reports/{id}/priority-score",
            "/api/priority-score",
            "/api/photos",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {expected}"
            );
        }
    }

    #[test]
    fn test_swagger_info_modifier() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Title".to_string(),
            version: "9.9.9".to_string(),
            description: "Desc".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Title");
        assert_eq!(doc.info.version, "9.9.9");
        assert_eq!(doc.info.description.as_deref(), Some("Desc"));
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::AppError;
use crate::features::reports::models::{CreateReport, Report, ReportStatus};
use crate::features::priority::geo::Coordinate;

/// Request DTO for submitting a report
///
/// Required fields are optional at the serde level so that a missing field
/// is reported through the same validation path as an invalid one.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportDto {
    /// Identifier of the submitting user
    #[validate(
        required(message = "userId is required"),
        length(min = 1, max = 255, message = "userId must be 1-255 characters")
    )]
    pub user_id: Option<String>,

    #[validate(required(message = "latitude is required"))]
    pub latitude: Option<f64>,

    #[validate(required(message = "longitude is required"))]
    pub longitude: Option<f64>,

    /// Reference to the uploaded photo (see `POST /api/photos`)
    #[validate(
        required(message = "photoUrl is required"),
        length(min = 1, max = 2048, message = "photoUrl must be 1-2048 characters")
    )]
    pub photo_url: Option<String>,

    #[validate(length(max = 2000, message = "comment must not exceed 2000 characters"))]
    pub comment: Option<String>,
}

impl CreateReportDto {
    /// Validate and convert into the store input
    pub fn into_create_report(self) -> Result<CreateReport, AppError> {
        self.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let user_id = non_blank(self.user_id)
            .ok_or_else(|| AppError::Validation("userId is required".to_string()))?;
        let photo_url = non_blank(self.photo_url)
            .ok_or_else(|| AppError::Validation("photoUrl is required".to_string()))?;
        let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) else {
            return Err(AppError::Validation(
                "latitude and longitude are required".to_string(),
            ));
        };
        Coordinate::new(latitude, longitude).map_err(AppError::Validation)?;

        Ok(CreateReport {
            user_id,
            latitude,
            longitude,
            photo_url,
            comment: non_blank(self.comment),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Response DTO for report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponseDto {
    pub id: Uuid,
    pub user_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub photo_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub status: ReportStatus,
    /// Creation time followed by every status change, oldest first
    pub timestamps: Vec<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            latitude: r.latitude,
            longitude: r.longitude,
            photo_url: r.photo_url,
            comment: r.comment,
            status: r.status,
            timestamps: r.status_timestamps,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Request DTO for updating report status
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateReportStatusDto {
    pub status: ReportStatus,
}

/// Query parameters for listing reports
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListReportsQuery {
    /// Only return reports submitted by this user
    pub user_id: Option<String>,
}

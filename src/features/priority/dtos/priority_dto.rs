use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::core::error::AppError;
use crate::features::priority::geo::Coordinate;
use crate::features::priority::services::PriorityScore;

/// Request DTO for scoring an arbitrary location
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriorityScoreRequestDto {
    #[validate(required(message = "latitude is required"))]
    pub latitude: Option<f64>,

    #[validate(required(message = "longitude is required"))]
    pub longitude: Option<f64>,
}

impl PriorityScoreRequestDto {
    pub fn into_coordinate(self) -> Result<Coordinate, AppError> {
        self.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) else {
            return Err(AppError::Validation(
                "latitude and longitude are required".to_string(),
            ));
        };
        Coordinate::new(latitude, longitude).map_err(AppError::Validation)
    }
}

/// Number of features found per class
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeatureCountsDto {
    pub hospital: usize,
    pub school: usize,
    pub road: usize,
}

/// Response DTO for a priority score
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriorityScoreResponseDto {
    pub latitude: f64,
    pub longitude: f64,
    /// Priority in [0, 1]
    pub normalized_score: f64,
    pub raw_score: f64,
    pub radius_meters: f64,
    pub feature_count: usize,
    pub features: FeatureCountsDto,
}

impl From<PriorityScore> for PriorityScoreResponseDto {
    fn from(s: PriorityScore) -> Self {
        Self {
            latitude: s.origin.latitude,
            longitude: s.origin.longitude,
            normalized_score: s.normalized_score,
            raw_score: s.raw_score,
            radius_meters: s.radius_meters,
            feature_count: s.feature_count(),
            features: FeatureCountsDto {
                hospital: s.hospital_count,
                school: s.school_count,
                road: s.road_count,
            },
        }
    }
}

use std::sync::Arc;

use uuid::Uuid;

use crate::core::config::ScoringConfig;
use crate::core::error::Result;
use crate::features::priority::clients::{FeatureClass, FeatureGeometry, FeatureSource};
use crate::features::priority::geo::Coordinate;
use crate::features::priority::scoring::{calculate_priority_score, normalize_score, GeoFeature};
use crate::features::reports::ReportService;

/// Result of scoring one coordinate
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityScore {
    pub origin: Coordinate,
    /// Raw score rescaled into [0, 1]
    pub normalized_score: f64,
    pub raw_score: f64,
    pub radius_meters: f64,
    pub hospital_count: usize,
    pub school_count: usize,
    pub road_count: usize,
}

impl PriorityScore {
    pub fn feature_count(&self) -> usize {
        self.hospital_count + self.school_count + self.road_count
    }
}

/// Scores coordinates by proximity to nearby infrastructure
pub struct PriorityService {
    source: Arc<dyn FeatureSource>,
    report_service: Arc<ReportService>,
    config: ScoringConfig,
}

impl PriorityService {
    pub fn new(
        source: Arc<dyn FeatureSource>,
        report_service: Arc<ReportService>,
        config: ScoringConfig,
    ) -> Self {
        Self {
            source,
            report_service,
            config,
        }
    }

    /// Fetch hospitals, schools and roads concurrently and score `origin`.
    ///
    /// The first failing fetch aborts the whole computation.
    pub async fn score(&self, origin: Coordinate) -> Result<PriorityScore> {
        let radius = self.config.max_radius_meters;

        let (hospitals, schools, roads) = tokio::try_join!(
            self.source.fetch(origin, radius, FeatureClass::Hospital),
            self.source.fetch(origin, radius, FeatureClass::School),
            self.source.fetch(origin, radius, FeatureClass::Road),
        )
        .map_err(|e| {
            tracing::error!(
                "Feature fetch failed for ({}, {}): {}",
                origin.latitude,
                origin.longitude,
                e
            );
            e
        })?;

        let (hospital_count, school_count, road_count) =
            (hospitals.len(), schools.len(), roads.len());

        let features: Vec<GeoFeature> = hospitals
            .into_iter()
            .chain(schools)
            .chain(roads)
            .map(|geometry| to_geo_feature(origin, geometry))
            .collect();

        let raw_score = calculate_priority_score(&features, &self.config.weights, radius);
        let normalized_score =
            normalize_score(raw_score, self.config.min_score, self.config.max_score);

        tracing::info!(
            "Priority score for ({}, {}): raw={:.3} normalized={:.3} hospitals={} schools={} roads={}",
            origin.latitude,
            origin.longitude,
            raw_score,
            normalized_score,
            hospital_count,
            school_count,
            road_count
        );

        Ok(PriorityScore {
            origin,
            normalized_score,
            raw_score,
            radius_meters: radius,
            hospital_count,
            school_count,
            road_count,
        })
    }

    /// Score the location of a stored report
    pub async fn score_report(&self, id: Uuid) -> Result<PriorityScore> {
        let report = self.report_service.get_by_id(id).await?;
        let origin = Coordinate {
            latitude: report.latitude,
            longitude: report.longitude,
        };
        self.score(origin).await
    }
}

fn to_geo_feature(origin: Coordinate, geometry: FeatureGeometry) -> GeoFeature {
    GeoFeature::new(geometry.kind, origin.distance_to(&geometry.position))
}

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::core::config::OverpassConfig;
use crate::core::error::{AppError, Result};
use crate::features::priority::geo::Coordinate;

use super::{FeatureClass, FeatureGeometry, FeatureSource};

/// Slack between the server-side `[timeout:N]` and the HTTP request timeout
const HTTP_TIMEOUT_MARGIN: Duration = Duration::from_secs(5);

/// Overpass API response structure
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    pub elements: Vec<OverpassElement>,
    /// Set by the server on query timeouts and memory exhaustion, still with HTTP 200
    pub remark: Option<String>,
}

impl OverpassResponse {
    /// Decode a response body; a missing element list or a runtime error remark is a failure
    pub fn decode(body: &str) -> Result<Vec<OverpassElement>> {
        let parsed: OverpassResponse = serde_json::from_str(body).map_err(|e| {
            tracing::error!("Failed to parse Overpass response: {:?}", e);
            AppError::ExternalServiceError(format!("Failed to parse Overpass response: {}", e))
        })?;

        if let Some(remark) = parsed.remark.as_deref() {
            if remark.contains("runtime error") {
                tracing::warn!("Overpass query failed: {}", remark);
                return Err(AppError::ExternalServiceError(format!(
                    "Overpass query failed: {}",
                    remark
                )));
            }
        }

        Ok(parsed.elements)
    }
}

/// A node, way or relation as returned with `out center;`
#[derive(Debug, Deserialize)]
pub struct OverpassElement {
    /// Present on nodes
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Present on ways and relations with `out center`
    pub center: Option<OverpassPoint>,
    /// Present with `out geom`
    pub geometry: Option<Vec<OverpassPoint>>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OverpassPoint {
    pub lat: f64,
    pub lon: f64,
}

impl OverpassElement {
    /// Center if available, then the node position, then the mean of the geometry
    pub fn position(&self) -> Option<Coordinate> {
        if let Some(center) = self.center {
            return Coordinate::new(center.lat, center.lon).ok();
        }
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            return Coordinate::new(lat, lon).ok();
        }

        let points = self.geometry.as_deref().filter(|g| !g.is_empty())?;
        let count = points.len() as f64;
        let lat = points.iter().map(|p| p.lat).sum::<f64>() / count;
        let lon = points.iter().map(|p| p.lon).sum::<f64>() / count;
        Coordinate::new(lat, lon).ok()
    }

    /// Scoring type for an element of `class`
    pub fn kind(&self, class: FeatureClass) -> Option<String> {
        match class {
            FeatureClass::Road => self.tags.get("highway").cloned(),
            FeatureClass::Hospital | FeatureClass::School => Some(class.as_str().to_string()),
        }
    }

    pub fn into_geometry(self, class: FeatureClass) -> Option<FeatureGeometry> {
        Some(FeatureGeometry {
            position: self.position()?,
            kind: self.kind(class)?,
        })
    }
}

/// Client for the OpenStreetMap Overpass API
pub struct OverpassClient {
    client: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

impl OverpassClient {
    pub fn new(config: &OverpassConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(http_timeout(config.timeout))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.url.clone(),
            timeout_secs: config.timeout.as_secs(),
        })
    }

    /// Overpass QL for one feature class around a point
    pub fn build_query(
        class: FeatureClass,
        origin: Coordinate,
        radius_meters: f64,
        timeout_secs: u64,
    ) -> String {
        let around = format!(
            "(around:{},{},{})",
            radius_meters, origin.latitude, origin.longitude
        );
        let header = format!("[out:json][timeout:{}];", timeout_secs);

        match class {
            FeatureClass::Hospital | FeatureClass::School => {
                let amenity = class.as_str();
                format!(
                    r#"{header}(node["amenity"="{amenity}"]{around};way["amenity"="{amenity}"]{around};relation["amenity"="{amenity}"]{around};);out center;"#
                )
            }
            FeatureClass::Road => format!(r#"{header}way["highway"]{around};out center;"#),
        }
    }

    /// Execute a query and decode the element list
    async fn execute_query(&self, query: &str) -> Result<Vec<OverpassElement>> {
        let url = format!("{}?data={}", self.base_url, urlencoding::encode(query));

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::error!("Overpass request failed: {:?}", e);
            AppError::ExternalServiceError(format!("Overpass request failed: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Overpass returned status {}: {}", status, body);
            return Err(AppError::ExternalServiceError(format!(
                "Overpass returned status {}",
                status
            )));
        }

        let body = response.text().await.map_err(|e| {
            tracing::error!("Failed to read Overpass response: {:?}", e);
            AppError::ExternalServiceError(format!("Failed to read Overpass response: {}", e))
        })?;

        OverpassResponse::decode(&body)
    }
}

/// HTTP timeout for a query whose server-side limit is `query_timeout`
fn http_timeout(query_timeout: Duration) -> Duration {
    query_timeout + HTTP_TIMEOUT_MARGIN
}

/// Keep elements usable for scoring, logging how many were dropped
pub fn elements_to_geometries(
    elements: Vec<OverpassElement>,
    class: FeatureClass,
) -> Vec<FeatureGeometry> {
    let total = elements.len();
    let geometries: Vec<FeatureGeometry> = elements
        .into_iter()
        .filter_map(|e| e.into_geometry(class))
        .collect();

    if geometries.len() < total {
        tracing::debug!(
            "Skipped {} of {} {} elements without position or type",
            total - geometries.len(),
            total,
            class
        );
    }

    geometries
}

#[async_trait]
impl FeatureSource for OverpassClient {
    async fn fetch(
        &self,
        origin: Coordinate,
        radius_meters: f64,
        class: FeatureClass,
    ) -> Result<Vec<FeatureGeometry>> {
        let query = Self::build_query(class, origin, radius_meters, self.timeout_secs);
        tracing::debug!("Overpass query ({}): {}", class, query);

        let elements = self.execute_query(&query).await?;
        Ok(elements_to_geometries(elements, class))
    }
}

mod overpass_client;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::priority::geo::Coordinate;

pub use overpass_client::OverpassClient;

/// Classes of infrastructure queried around a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureClass {
    Hospital,
    School,
    Road,
}

impl FeatureClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureClass::Hospital => "hospital",
            FeatureClass::School => "school",
            FeatureClass::Road => "road",
        }
    }
}

impl std::fmt::Display for FeatureClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position and type tag of one element returned by a feature source
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureGeometry {
    /// Point used for distance calculations (center for ways and relations)
    pub position: Coordinate,
    /// Scoring type: the class name, or the road classification for roads
    pub kind: String,
}

/// Source of nearby geographic features
#[async_trait]
pub trait FeatureSource: Send + Sync {
    /// Features of `class` within `radius_meters` of `origin`
    async fn fetch(
        &self,
        origin: Coordinate,
        radius_meters: f64,
        class: FeatureClass,
    ) -> Result<Vec<FeatureGeometry>>;
}

//! Priority score aggregation and normalization.
//!
//! Each nearby feature contributes `weight(kind) * (1 - distance / radius)`,
//! the sum is the raw score, and the raw score is rescaled into [0, 1]
//! against a fixed expected range.

use std::collections::HashMap;

/// A nearby feature reduced to what scoring needs
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFeature {
    /// `hospital`, `school`, or a road classification such as `primary`
    pub kind: String,
    pub distance_meters: f64,
}

impl GeoFeature {
    pub fn new(kind: impl Into<String>, distance_meters: f64) -> Self {
        Self {
            kind: kind.into(),
            distance_meters,
        }
    }
}

/// Weight per feature kind
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringWeights {
    weights: HashMap<String, f64>,
    /// Weight used for kinds missing from the table
    pub default_weight: f64,
}

impl ScoringWeights {
    /// Replace or add the given entries, keeping the rest
    pub fn with_overrides(mut self, overrides: HashMap<String, f64>) -> Self {
        for (kind, weight) in overrides {
            self.weights.insert(kind.to_lowercase(), weight);
        }
        self
    }

    pub fn weight_for(&self, kind: &str) -> f64 {
        self.weights
            .get(kind)
            .or_else(|| self.weights.get(&kind.to_lowercase()))
            .copied()
            .unwrap_or(self.default_weight)
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        let weights = [
            ("hospital", 5.0),
            ("school", 4.0),
            ("primary", 5.0),
            ("secondary", 3.0),
            ("tertiary", 1.0),
            ("residential", 2.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            weights,
            default_weight: 0.0,
        }
    }
}

/// Proximity factor in [0, 1]: 1 at the origin, 0 at or beyond the radius
pub fn proximity_decay(distance_meters: f64, max_radius_meters: f64) -> f64 {
    if max_radius_meters.is_nan() || max_radius_meters <= 0.0 || !distance_meters.is_finite() {
        return 0.0;
    }
    (1.0 - distance_meters.max(0.0) / max_radius_meters).clamp(0.0, 1.0)
}

/// Sum of weighted, distance-decayed contributions. Never negative.
pub fn calculate_priority_score(
    features: &[GeoFeature],
    weights: &ScoringWeights,
    max_radius_meters: f64,
) -> f64 {
    features
        .iter()
        .map(|f| {
            weights.weight_for(&f.kind).max(0.0)
                * proximity_decay(f.distance_meters, max_radius_meters)
        })
        .sum()
}

/// Linearly rescale `raw` from `[min, max]` into `[0, 1]`, clamping both ends
pub fn normalize_score(raw: f64, min: f64, max: f64) -> f64 {
    if raw.is_nan() {
        return 0.0;
    }
    if max.is_nan() || min.is_nan() || max <= min {
        return if raw <= min { 0.0 } else { 1.0 };
    }
    ((raw - min) / (max - min)).clamp(0.0, 1.0)
}

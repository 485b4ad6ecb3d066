//! Doubles and router builders shared by unit and router tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{body::Body, response::Response, Router};

use crate::core::config::ScoringConfig;
use crate::core::error::{AppError, Result};
use crate::features::photos::{routes as photos_routes, PhotoService};
use crate::features::priority::clients::{FeatureClass, FeatureGeometry, FeatureSource};
use crate::features::priority::geo::Coordinate;
use crate::features::priority::{routes as priority_routes, PriorityService};
use crate::features::reports::models::TransitionPolicy;
use crate::features::reports::store::InMemoryReportStore;
use crate::features::reports::{routes as reports_routes, ReportService};
use crate::modules::storage::PhotoStorage;

/// Feature source returning canned geometries per class
#[derive(Default)]
pub struct StubFeatureSource {
    features: HashMap<FeatureClass, Vec<FeatureGeometry>>,
    failing: HashSet<FeatureClass>,
}

impl StubFeatureSource {
    pub fn with_feature(mut self, class: FeatureClass, position: Coordinate, kind: &str) -> Self {
        self.features.entry(class).or_default().push(FeatureGeometry {
            position,
            kind: kind.to_string(),
        });
        self
    }

    /// Make fetches for `class` fail like an unreachable map service
    pub fn failing_on(mut self, class: FeatureClass) -> Self {
        self.failing.insert(class);
        self
    }
}

#[async_trait]
impl FeatureSource for StubFeatureSource {
    async fn fetch(
        &self,
        _origin: Coordinate,
        _radius_meters: f64,
        class: FeatureClass,
    ) -> Result<Vec<FeatureGeometry>> {
        if self.failing.contains(&class) {
            return Err(AppError::ExternalServiceError(format!(
                "{} query failed",
                class
            )));
        }
        Ok(self.features.get(&class).cloned().unwrap_or_default())
    }
}

/// Photo storage keeping objects in memory
#[derive(Default, Clone)]
pub struct InMemoryPhotoStorage {
    objects: Arc<Mutex<HashMap<String, (Vec<u8>, String)>>>,
}

impl InMemoryPhotoStorage {
    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl PhotoStorage for InMemoryPhotoStorage {
    async fn upload(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> std::result::Result<String, AppError> {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (data, content_type.to_string()));
        Ok(key.to_string())
    }

    fn public_url(&self, key: &str) -> String {
        format!("http://storage.test/report-photos/{}", key)
    }
}

/// Application router over in-memory doubles
pub struct TestApp {
    pub router: Router,
    pub store: InMemoryReportStore,
    pub photos: InMemoryPhotoStorage,
}

impl TestApp {
    pub fn new(source: StubFeatureSource) -> Self {
        Self::with_policy(source, TransitionPolicy::Unrestricted)
    }

    pub fn with_policy(source: StubFeatureSource, policy: TransitionPolicy) -> Self {
        let store = InMemoryReportStore::default();
        let photos = InMemoryPhotoStorage::default();

        let report_service = Arc::new(ReportService::new(Arc::new(store.clone()), policy));
        let priority_service = Arc::new(PriorityService::new(
            Arc::new(source),
            Arc::clone(&report_service),
            ScoringConfig::default(),
        ));
        let photo_service = Arc::new(PhotoService::new(Arc::new(photos.clone()), "photos"));

        let router = Router::new()
            .merge(reports_routes::routes(report_service))
            .merge(priority_routes::routes(priority_service))
            .merge(photos_routes::routes(photo_service));

        Self {
            router,
            store,
            photos,
        }
    }
}

/// Collect a response body as JSON
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// JSON request with the given method
pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> axum::http::Request<Body> {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Bodyless request with the given method
pub fn empty_request(method: &str, uri: &str) -> axum::http::Request<Body> {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

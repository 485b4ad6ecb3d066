use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{CreateReport, Report, ReportFilter, ReportStatus};

use super::ReportStore;

/// Vec-backed store used by service and router tests
#[derive(Default, Clone)]
pub struct InMemoryReportStore {
    reports: Arc<Mutex<Vec<Report>>>,
}

impl InMemoryReportStore {
    pub fn len(&self) -> usize {
        self.reports.lock().expect("report store mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ReportStore for InMemoryReportStore {
    async fn insert(&self, data: &CreateReport, at: DateTime<Utc>) -> Result<Report> {
        let report = Report {
            id: Uuid::new_v4(),
            user_id: data.user_id.clone(),
            latitude: data.latitude,
            longitude: data.longitude,
            photo_url: data.photo_url.clone(),
            comment: data.comment.clone(),
            status: ReportStatus::Reported,
            status_timestamps: vec![at],
            created_at: at,
            updated_at: at,
        };

        self.reports
            .lock()
            .map_err(|_| AppError::Internal("report store mutex poisoned".to_string()))?
            .push(report.clone());
        Ok(report)
    }

    async fn find(&self, filter: &ReportFilter) -> Result<Vec<Report>> {
        let guard = self
            .reports
            .lock()
            .map_err(|_| AppError::Internal("report store mutex poisoned".to_string()))?;
        let mut reports: Vec<Report> = guard.iter().filter(|r| filter.matches(r)).cloned().collect();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reports)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Report>> {
        let guard = self
            .reports
            .lock()
            .map_err(|_| AppError::Internal("report store mutex poisoned".to_string()))?;
        Ok(guard.iter().find(|r| r.id == id).cloned())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ReportStatus,
        expected: Option<ReportStatus>,
        at: DateTime<Utc>,
    ) -> Result<Option<Report>> {
        let mut guard = self
            .reports
            .lock()
            .map_err(|_| AppError::Internal("report store mutex poisoned".to_string()))?;

        let Some(report) = guard
            .iter_mut()
            .find(|r| r.id == id && expected.is_none_or(|s| s == r.status))
        else {
            return Ok(None);
        };

        report.status = status;
        report.status_timestamps.push(at);
        report.updated_at = at;
        Ok(Some(report.clone()))
    }
}

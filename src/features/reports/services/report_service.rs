use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{
    CreateReport, Report, ReportFilter, ReportStatus, TransitionPolicy,
};
use crate::features::reports::store::ReportStore;

/// Service for report operations
pub struct ReportService {
    store: Arc<dyn ReportStore>,
    policy: TransitionPolicy,
}

impl ReportService {
    pub fn new(store: Arc<dyn ReportStore>, policy: TransitionPolicy) -> Self {
        Self { store, policy }
    }

    /// Parse a path identifier; anything that is not a UUID cannot name a report
    pub fn parse_id(raw: &str) -> Result<Uuid> {
        Uuid::parse_str(raw.trim())
            .map_err(|_| AppError::NotFound(format!("Report {} not found", raw)))
    }

    /// Create a new report with status `reported`
    pub async fn create(&self, data: &CreateReport) -> Result<Report> {
        let report = self.store.insert(data, Utc::now()).await.map_err(|e| {
            tracing::error!("Failed to create report: {:?}", e);
            e
        })?;

        tracing::info!(
            "Created report: {} for user: {} at ({}, {})",
            report.id,
            report.user_id,
            report.latitude,
            report.longitude
        );

        Ok(report)
    }

    /// List reports, newest first
    pub async fn list(&self, filter: &ReportFilter) -> Result<Vec<Report>> {
        self.store.find(filter).await
    }

    /// List reports in one status; an empty result is reported as not found
    pub async fn list_by_status(&self, status: ReportStatus) -> Result<Vec<Report>> {
        let reports = self.store.find(&ReportFilter::by_status(status)).await?;
        if reports.is_empty() {
            return Err(AppError::NotFound(format!("No {} reports found.", status)));
        }
        Ok(reports)
    }

    /// Get report by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<Report> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))
    }

    /// Move a report to `status` and append the change time to its history
    pub async fn transition(&self, id: Uuid, status: ReportStatus) -> Result<Report> {
        let current = self.get_by_id(id).await?;

        if !self.policy.allows(current.status, status) {
            return Err(AppError::Conflict(format!(
                "Report {} cannot move from {} to {}",
                id, current.status, status
            )));
        }

        // Under the lifecycle policy the check above must still hold when the row is written
        let expected = match self.policy {
            TransitionPolicy::Unrestricted => None,
            TransitionPolicy::Lifecycle => Some(current.status),
        };

        let updated = self
            .store
            .update_status(id, status, expected, Utc::now())
            .await?;

        match updated {
            Some(report) => {
                tracing::info!(
                    "Updated report {} status from {} to {}",
                    id,
                    current.status,
                    report.status
                );
                Ok(report)
            }
            None if expected.is_some() => Err(AppError::Conflict(format!(
                "Report {} changed status concurrently",
                id
            ))),
            None => Err(AppError::NotFound(format!("Report {} not found", id))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::store::InMemoryReportStore;
    use tokio_test::{assert_err, assert_ok};

    fn service(policy: TransitionPolicy) -> (ReportService, InMemoryReportStore) {
        let store = InMemoryReportStore::default();
        (ReportService::new(Arc::new(store.clone()), policy), store)
    }

    fn create_report(user_id: &str) -> CreateReport {
        CreateReport {
            user_id: user_id.to_string(),
            latitude: 12.9716,
            longitude: 77.5946,
            photo_url: "https://cdn.example.com/photos/a.jpg".to_string(),
            comment: None,
        }
    }

    #[tokio::test]
    async fn test_create_starts_reported_with_one_timestamp() {
        let (service, store) = service(TransitionPolicy::Unrestricted);

        let report = service.create(&create_report("user-1")).await.unwrap();

        assert_eq!(report.status, ReportStatus::Reported);
        assert_eq!(report.status_timestamps, vec![report.created_at]);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_list_filters_by_user() {
        let (service, _) = service(TransitionPolicy::Unrestricted);
        service.create(&create_report("user-1")).await.unwrap();
        service.create(&create_report("user-2")).await.unwrap();
        service.create(&create_report("user-1")).await.unwrap();

        let all = service.list(&ReportFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        let mine = service.list(&ReportFilter::by_user("user-1")).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|r| r.user_id == "user-1"));

        let none = service.list(&ReportFilter::by_user("nobody")).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_list_by_status_empty_is_not_found() {
        let (service, _) = service(TransitionPolicy::Unrestricted);
        service.create(&create_report("user-1")).await.unwrap();

        let err = service
            .list_by_status(ReportStatus::Resolved)
            .await
            .unwrap_err();
        match err {
            AppError::NotFound(message) => assert_eq!(message, "No resolved reports found."),
            other => panic!("expected NotFound, got {other:?}"),
        }

        let reported = service
            .list_by_status(ReportStatus::Reported)
            .await
            .unwrap();
        assert_eq!(reported.len(), 1);
    }

    #[tokio::test]
    async fn test_transition_appends_timestamp() {
        let (service, _) = service(TransitionPolicy::Unrestricted);
        let report = service.create(&create_report("user-1")).await.unwrap();

        let updated = service
            .transition(report.id, ReportStatus::Resolved)
            .await
            .unwrap();

        assert_eq!(updated.status, ReportStatus::Resolved);
        assert_eq!(updated.status_timestamps.len(), 2);
        assert!(updated.status_timestamps[1] >= updated.status_timestamps[0]);
    }

    #[tokio::test]
    async fn test_transition_unknown_id_is_not_found() {
        let (service, _) = service(TransitionPolicy::Unrestricted);

        let result = service
            .transition(Uuid::new_v4(), ReportStatus::InProgress)
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_unrestricted_policy_allows_backward_moves() {
        let (service, _) = service(TransitionPolicy::Unrestricted);
        let report = service.create(&create_report("user-1")).await.unwrap();

        service
            .transition(report.id, ReportStatus::Resolved)
            .await
            .unwrap();
        let reopened = service
            .transition(report.id, ReportStatus::Reported)
            .await
            .unwrap();

        assert_eq!(reopened.status, ReportStatus::Reported);
        assert_eq!(reopened.status_timestamps.len(), 3);
    }

    #[tokio::test]
    async fn test_lifecycle_policy_rejects_backward_moves() {
        let (service, _) = service(TransitionPolicy::Lifecycle);
        let report = service.create(&create_report("user-1")).await.unwrap();

        assert_ok!(
            service
                .transition(report.id, ReportStatus::InProgress)
                .await
        );
        assert_ok!(service.transition(report.id, ReportStatus::Resolved).await);

        let err = assert_err!(
            service
                .transition(report.id, ReportStatus::InProgress)
                .await
        );
        assert!(matches!(err, AppError::Conflict(_)));

        let stored = service.get_by_id(report.id).await.unwrap();
        assert_eq!(stored.status, ReportStatus::Resolved);
        assert_eq!(stored.status_timestamps.len(), 3);
    }

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(ReportService::parse_id(&id.to_string()).unwrap(), id);
        assert!(matches!(
            ReportService::parse_id("not-a-uuid"),
            Err(AppError::NotFound(_))
        ));
    }
}

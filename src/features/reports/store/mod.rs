//! Persistence boundary for reports.
//!
//! The service layer only needs four operations from the store, so they are
//! expressed as a trait with a PostgreSQL implementation for the running
//! service and an in-memory one for tests.

mod pg_report_store;

#[cfg(test)]
mod memory_report_store;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::reports::models::{CreateReport, Report, ReportFilter, ReportStatus};

pub use pg_report_store::PgReportStore;

#[cfg(test)]
pub use memory_report_store::InMemoryReportStore;

#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Insert a new report with status `reported` and `at` as its first timestamp
    async fn insert(&self, data: &CreateReport, at: DateTime<Utc>) -> Result<Report>;

    /// Reports matching the filter, newest first
    async fn find(&self, filter: &ReportFilter) -> Result<Vec<Report>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Report>>;

    /// Set the status and append `at` to the timestamp history.
    ///
    /// When `expected` is given the update only applies if the stored status
    /// still equals it. Returns `None` when no row was updated.
    async fn update_status(
        &self,
        id: Uuid,
        status: ReportStatus,
        expected: Option<ReportStatus>,
        at: DateTime<Utc>,
    ) -> Result<Option<Report>>;
}

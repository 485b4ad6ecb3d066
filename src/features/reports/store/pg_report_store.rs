use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{CreateReport, Report, ReportFilter, ReportStatus};

use super::ReportStore;

const REPORT_COLUMNS: &str = r#"
    id, user_id, latitude, longitude, photo_url, comment,
    status, status_timestamps, created_at, updated_at
"#;

/// PostgreSQL-backed report store
pub struct PgReportStore {
    pool: PgPool,
}

impl PgReportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportStore for PgReportStore {
    async fn insert(&self, data: &CreateReport, at: DateTime<Utc>) -> Result<Report> {
        let query = format!(
            r#"
            INSERT INTO reports (id, user_id, latitude, longitude, photo_url, comment, status, status_timestamps, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, 'reported', ARRAY[$7]::TIMESTAMPTZ[], $7, $7)
            RETURNING {}
            "#,
            REPORT_COLUMNS
        );

        sqlx::query_as::<_, Report>(&query)
            .bind(Uuid::new_v4())
            .bind(&data.user_id)
            .bind(data.latitude)
            .bind(data.longitude)
            .bind(&data.photo_url)
            .bind(&data.comment)
            .bind(at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create report: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find(&self, filter: &ReportFilter) -> Result<Vec<Report>> {
        // NULL parameters disable the corresponding condition
        let query = format!(
            r#"
            SELECT {}
            FROM reports
            WHERE ($1::TEXT IS NULL OR user_id = $1)
              AND ($2::report_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
            REPORT_COLUMNS
        );

        sqlx::query_as::<_, Report>(&query)
            .bind(filter.user_id.as_deref())
            .bind(filter.status)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list reports: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Report>> {
        let query = format!("SELECT {} FROM reports WHERE id = $1", REPORT_COLUMNS);

        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get report: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ReportStatus,
        expected: Option<ReportStatus>,
        at: DateTime<Utc>,
    ) -> Result<Option<Report>> {
        let query = format!(
            r#"
            UPDATE reports
            SET status = $2,
                status_timestamps = array_append(status_timestamps, $4),
                updated_at = $4
            WHERE id = $1
              AND ($3::report_status IS NULL OR status = $3)
            RETURNING {}
            "#,
            REPORT_COLUMNS
        );

        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .bind(status)
            .bind(expected)
            .bind(at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update report status: {:?}", e);
                AppError::Database(e)
            })
    }
}

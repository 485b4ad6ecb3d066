use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Report status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ReportStatus {
    Reported,
    InProgress,
    Resolved,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Reported => "reported",
            ReportStatus::InProgress => "in-progress",
            ReportStatus::Resolved => "resolved",
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reported" | "pending" => Ok(ReportStatus::Reported),
            "in-progress" | "in_progress" => Ok(ReportStatus::InProgress),
            "resolved" => Ok(ReportStatus::Resolved),
            other => Err(format!(
                "Unknown report status '{}'; expected reported, in-progress or resolved",
                other
            )),
        }
    }
}

/// Which status changes a transition request may perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    /// Any status may be set from any status
    #[default]
    Unrestricted,
    /// Only forward moves along reported -> in-progress -> resolved
    Lifecycle,
}

impl TransitionPolicy {
    /// Forward steps accepted under [`TransitionPolicy::Lifecycle`]
    const LIFECYCLE_TRANSITIONS: [(ReportStatus, ReportStatus); 3] = [
        (ReportStatus::Reported, ReportStatus::InProgress),
        (ReportStatus::Reported, ReportStatus::Resolved),
        (ReportStatus::InProgress, ReportStatus::Resolved),
    ];

    pub fn allows(&self, from: ReportStatus, to: ReportStatus) -> bool {
        match self {
            TransitionPolicy::Unrestricted => true,
            TransitionPolicy::Lifecycle => Self::LIFECYCLE_TRANSITIONS.contains(&(from, to)),
        }
    }
}

impl std::str::FromStr for TransitionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "unrestricted" => Ok(TransitionPolicy::Unrestricted),
            "lifecycle" => Ok(TransitionPolicy::Lifecycle),
            other => Err(format!(
                "REPORT_TRANSITION_POLICY must be 'unrestricted' or 'lifecycle', got '{}'",
                other
            )),
        }
    }
}

/// Database model for report
#[derive(Debug, Clone, FromRow)]
pub struct Report {
    pub id: Uuid,
    pub user_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub photo_url: String,
    pub comment: Option<String>,
    pub status: ReportStatus,
    /// One entry at creation, plus one per status change
    pub status_timestamps: Vec<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new report
#[derive(Debug, Clone)]
pub struct CreateReport {
    pub user_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub photo_url: String,
    pub comment: Option<String>,
}

/// Filter for report listings; `None` fields match everything
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub user_id: Option<String>,
    pub status: Option<ReportStatus>,
}

impl ReportFilter {
    pub fn by_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            status: None,
        }
    }

    pub fn by_status(status: ReportStatus) -> Self {
        Self {
            user_id: None,
            status: Some(status),
        }
    }

    pub fn matches(&self, report: &Report) -> bool {
        self.user_id.as_ref().is_none_or(|u| *u == report.user_id)
            && self.status.is_none_or(|s| s == report.status)
    }
}

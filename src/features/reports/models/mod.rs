mod report;

pub use report::{CreateReport, Report, ReportFilter, ReportStatus, TransitionPolicy};

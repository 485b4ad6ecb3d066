use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::reports::dtos::{
    CreateReportDto, ListReportsQuery, ReportResponseDto, UpdateReportStatusDto,
};
use crate::features::reports::models::{Report, ReportFilter, ReportStatus};
use crate::features::reports::services::ReportService;
use crate::shared::types::{ApiResponse, Meta};

/// State for report handlers
#[derive(Clone)]
pub struct ReportState {
    pub report_service: Arc<ReportService>,
}

fn to_list_response(reports: Vec<Report>) -> Json<ApiResponse<Vec<ReportResponseDto>>> {
    let total = reports.len() as i64;
    let dtos: Vec<ReportResponseDto> = reports.into_iter().map(|r| r.into()).collect();
    Json(ApiResponse::success(Some(dtos), None, Some(Meta { total })))
}

/// Submit a new report
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = CreateReportDto,
    responses(
        (status = 201, description = "Report created", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Invalid input")
    ),
    tag = "reports"
)]
pub async fn create_report(
    State(state): State<ReportState>,
    AppJson(dto): AppJson<CreateReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponseDto>>)> {
    let data = dto.into_create_report()?;
    let report = state.report_service.create(&data).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(report.into()),
            Some("Report created".to_string()),
            None,
        )),
    ))
}

/// List reports, optionally for one user
#[utoipa::path(
    get,
    path = "/api/reports",
    params(ListReportsQuery),
    responses(
        (status = 200, description = "List of reports, newest first", body = ApiResponse<Vec<ReportResponseDto>>)
    ),
    tag = "reports"
)]
pub async fn list_reports(
    State(state): State<ReportState>,
    AppQuery(query): AppQuery<ListReportsQuery>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let filter = match query.user_id.filter(|u| !u.trim().is_empty()) {
        Some(user_id) => ReportFilter::by_user(user_id),
        None => ReportFilter::default(),
    };
    let reports = state.report_service.list(&filter).await?;
    Ok(to_list_response(reports))
}

/// List reports in a given status
#[utoipa::path(
    get,
    path = "/api/reports/status/{status}",
    params(
        ("status" = ReportStatus, Path, description = "reported, in-progress or resolved")
    ),
    responses(
        (status = 200, description = "Reports in the status", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "No reports in the status")
    ),
    tag = "reports"
)]
pub async fn list_reports_by_status(
    State(state): State<ReportState>,
    Path(status): Path<String>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let status: ReportStatus = status.parse().map_err(AppError::BadRequest)?;
    let reports = state.report_service.list_by_status(status).await?;
    Ok(to_list_response(reports))
}

/// Get report by ID
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportResponseDto>),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn get_report(
    State(state): State<ReportState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let id = ReportService::parse_id(&id)?;
    let report = state.report_service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Update report status
///
/// Sets the status and appends the change time to the report's history.
#[utoipa::path(
    patch,
    path = "/api/reports/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    request_body = UpdateReportStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Transition not allowed by the configured policy")
    ),
    tag = "reports"
)]
pub async fn update_report_status(
    State(state): State<ReportState>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<UpdateReportStatusDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let id = ReportService::parse_id(&id)?;
    let report = state.report_service.transition(id, dto.status).await?;
    Ok(Json(ApiResponse::success(
        Some(report.into()),
        Some(format!("Report marked as {}", dto.status)),
        None,
    )))
}

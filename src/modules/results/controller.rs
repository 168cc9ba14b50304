use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;
use utoipa::IntoParams;

use gradeport_core::AppError;
use gradeport_core::import::BatchOutcome;
use gradeport_core::import::results as result_import;
use gradeport_models::ids::{AcademicSessionId, StudentId};

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::results::model::{
    BulkUploadRequest, CourseResult, PaginatedResultsResponse, RecordResultDto, ReportCard,
    ResultFilterParams, UploadAcceptedResponse, UploadRejectedResponse,
};
use crate::modules::results::service::ResultService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReportCardParams {
    /// Restrict the card to one academic session.
    pub session_id: Option<AcademicSessionId>,
}

#[utoipa::path(
    post,
    path = "/api/results",
    request_body = RecordResultDto,
    responses(
        (status = 200, description = "Result recorded", body = CourseResult),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - staff only", body = ErrorResponse),
        (status = 422, description = "Score rejected by the grade engine", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Results"
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn record_result(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<RecordResultDto>,
) -> Result<Json<CourseResult>, AppError> {
    let result = ResultService::record_result(&state.db, auth_user.user_id()?, dto).await?;
    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/api/results",
    params(ResultFilterParams),
    responses(
        (status = 200, description = "Paginated results", body = PaginatedResultsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - staff only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Results"
)]
#[instrument(skip(state))]
pub async fn get_results(
    State(state): State<AppState>,
    Query(filters): Query<ResultFilterParams>,
) -> Result<Json<PaginatedResultsResponse>, AppError> {
    let response = ResultService::get_results(&state.db, filters).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/results/import",
    request_body = BulkUploadRequest,
    responses(
        (status = 200, description = "Batch imported", body = UploadAcceptedResponse),
        (status = 400, description = "Unparseable upload", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - staff only", body = ErrorResponse),
        (status = 422, description = "Batch rejected with the full error list", body = UploadRejectedResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Results"
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn import_results(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<BulkUploadRequest>,
) -> Result<Response, AppError> {
    let recorded_by = auth_user.user_id()?;
    match ResultService::import_results(&state.db, recorded_by, &dto.content).await? {
        BatchOutcome::Accepted(summary) => {
            let message = if summary.fully_complete() {
                format!("All {} results imported", summary.total)
            } else {
                format!(
                    "{} of {} results imported; {} failed",
                    summary.success_count, summary.total, summary.error_count
                )
            };
            Ok(Json(UploadAcceptedResponse { message, summary }).into_response())
        }
        BatchOutcome::Rejected(errors) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(UploadRejectedResponse {
                message: format!("Upload rejected: {} validation error(s)", errors.len()),
                errors,
            }),
        )
            .into_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/results/import/template",
    responses(
        (status = 200, description = "CSV template for bulk result upload", body = String, content_type = "text/csv")
    ),
    security(("bearer_auth" = [])),
    tag = "Results"
)]
#[instrument]
pub async fn result_import_template() -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"results_template.csv\"",
            ),
        ],
        result_import::template(),
    )
        .into_response()
}

#[utoipa::path(
    get,
    path = "/api/results/students/{student_id}/report-card",
    params(
        ("student_id" = StudentId, Path, description = "Student ID"),
        ReportCardParams
    ),
    responses(
        (status = 200, description = "Report card with per-semester GPA and CGPA", body = ReportCard),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Results"
)]
#[instrument(skip(state, auth_user))]
pub async fn report_card(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(student_id): Path<StudentId>,
    Query(params): Query<ReportCardParams>,
) -> Result<Json<ReportCard>, AppError> {
    // Staff can read any card; a student token only its own.
    if !auth_user.is_staff() && !auth_user.is_student_self(student_id) {
        return Err(AppError::forbidden(
            "You may only view your own report card",
        ));
    }

    let card = ResultService::report_card(&state.db, student_id, params.session_id).await?;
    Ok(Json(card))
}

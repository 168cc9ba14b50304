use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::instrument;

use gradeport_core::AppError;
use gradeport_core::import::BatchOutcome;
use gradeport_core::import::students as student_import;
use gradeport_models::ids::StudentId;

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::students::model::{
    BulkUploadRequest, CreateStudentDto, PaginatedStudentsResponse, Student, StudentFilterParams,
    UpdateStudentDto, UploadAcceptedResponse, UploadRejectedResponse,
};
use crate::modules::students::service::StudentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/students",
    request_body = CreateStudentDto,
    responses(
        (status = 200, description = "Student created successfully", body = Student),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn create_student(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<Json<Student>, AppError> {
    let student = StudentService::create_student(&state.db, dto).await?;
    Ok(Json(student))
}

#[utoipa::path(
    get,
    path = "/api/students",
    params(StudentFilterParams),
    responses(
        (status = 200, description = "Paginated students", body = PaginatedStudentsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_students(
    State(state): State<AppState>,
    Query(filters): Query<StudentFilterParams>,
) -> Result<Json<PaginatedStudentsResponse>, AppError> {
    let response = StudentService::get_students(&state.db, filters).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(("id" = StudentId, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student details", body = Student),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
) -> Result<Json<Student>, AppError> {
    let student = StudentService::get_student_by_id(&state.db, id).await?;
    Ok(Json(student))
}

#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(("id" = StudentId, Path, description = "Student ID")),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated successfully", body = Student),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<Json<Student>, AppError> {
    let student = StudentService::update_student(&state.db, id, dto).await?;
    Ok(Json(student))
}

#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    params(("id" = StudentId, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student deleted successfully"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
) -> Result<Json<serde_json::Value>, AppError> {
    StudentService::delete_student(&state.db, id).await?;
    Ok(Json(json!({"message": "Student deleted successfully"})))
}

#[utoipa::path(
    post,
    path = "/api/students/import",
    request_body = BulkUploadRequest,
    responses(
        (status = 200, description = "Batch imported", body = UploadAcceptedResponse),
        (status = 400, description = "Unparseable upload", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 422, description = "Batch rejected with the full error list", body = UploadRejectedResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn import_students(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<BulkUploadRequest>,
) -> Result<Response, AppError> {
    match StudentService::import_students(&state.db, &dto.content).await? {
        BatchOutcome::Accepted(summary) => {
            let message = if summary.fully_complete() {
                format!("All {} students imported", summary.total)
            } else {
                format!(
                    "{} of {} students imported; {} failed",
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
    path = "/api/students/import/template",
    responses(
        (status = 200, description = "CSV template for bulk student upload", body = String, content_type = "text/csv")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument]
pub async fn student_import_template() -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"students_template.csv\"",
            ),
        ],
        student_import::template(),
    )
        .into_response()
}

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::json;
use tracing::instrument;

use gradeport_core::AppError;
use gradeport_models::ids::{AcademicSessionId, SemesterId};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::semesters::model::{CreateSemesterDto, Semester, UpdateSemesterDto};
use crate::modules::semesters::service::SemesterService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/academic-sessions/{session_id}/semesters",
    params(("session_id" = AcademicSessionId, Path, description = "Parent session ID")),
    request_body = CreateSemesterDto,
    responses(
        (status = 200, description = "Semester created successfully", body = Semester),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Semesters"
)]
#[instrument(skip(state, dto))]
pub async fn create_semester(
    State(state): State<AppState>,
    Path(session_id): Path<AcademicSessionId>,
    ValidatedJson(dto): ValidatedJson<CreateSemesterDto>,
) -> Result<Json<Semester>, AppError> {
    let semester = SemesterService::create_semester(&state.db, session_id, dto).await?;
    Ok(Json(semester))
}

#[utoipa::path(
    get,
    path = "/api/academic-sessions/{session_id}/semesters",
    params(("session_id" = AcademicSessionId, Path, description = "Parent session ID")),
    responses(
        (status = 200, description = "Semesters in the session", body = [Semester]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Semesters"
)]
#[instrument(skip(state))]
pub async fn get_session_semesters(
    State(state): State<AppState>,
    Path(session_id): Path<AcademicSessionId>,
) -> Result<Json<Vec<Semester>>, AppError> {
    let semesters = SemesterService::get_semesters_by_session(&state.db, session_id).await?;
    Ok(Json(semesters))
}

#[utoipa::path(
    get,
    path = "/api/semesters/{id}",
    params(("id" = SemesterId, Path, description = "Semester ID")),
    responses(
        (status = 200, description = "Semester details", body = Semester),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Semester not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Semesters"
)]
#[instrument(skip(state))]
pub async fn get_semester(
    State(state): State<AppState>,
    Path(id): Path<SemesterId>,
) -> Result<Json<Semester>, AppError> {
    let semester = SemesterService::get_semester_by_id(&state.db, id).await?;
    Ok(Json(semester))
}

#[utoipa::path(
    put,
    path = "/api/semesters/{id}",
    params(("id" = SemesterId, Path, description = "Semester ID")),
    request_body = UpdateSemesterDto,
    responses(
        (status = 200, description = "Semester updated successfully", body = Semester),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Semester not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Semesters"
)]
#[instrument(skip(state, dto))]
pub async fn update_semester(
    State(state): State<AppState>,
    Path(id): Path<SemesterId>,
    ValidatedJson(dto): ValidatedJson<UpdateSemesterDto>,
) -> Result<Json<Semester>, AppError> {
    let semester = SemesterService::update_semester(&state.db, id, dto).await?;
    Ok(Json(semester))
}

#[utoipa::path(
    delete,
    path = "/api/semesters/{id}",
    params(("id" = SemesterId, Path, description = "Semester ID")),
    responses(
        (status = 200, description = "Semester deleted successfully"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Semester not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Semesters"
)]
#[instrument(skip(state))]
pub async fn delete_semester(
    State(state): State<AppState>,
    Path(id): Path<SemesterId>,
) -> Result<Json<serde_json::Value>, AppError> {
    SemesterService::delete_semester(&state.db, id).await?;
    Ok(Json(json!({"message": "Semester deleted successfully"})))
}

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::json;
use tracing::instrument;

use gradeport_core::AppError;
use gradeport_models::ids::AcademicSessionId;

use crate::modules::academic_sessions::model::{
    AcademicSession, AcademicSessionFilterParams, AcademicSessionWithStats,
    CreateAcademicSessionDto, PaginatedAcademicSessionsResponse, UpdateAcademicSessionDto,
};
use crate::modules::academic_sessions::service::AcademicSessionService;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/academic-sessions",
    request_body = CreateAcademicSessionDto,
    responses(
        (status = 200, description = "Session created successfully", body = AcademicSession),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Academic Sessions"
)]
#[instrument(skip(state, dto))]
pub async fn create_academic_session(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateAcademicSessionDto>,
) -> Result<Json<AcademicSession>, AppError> {
    let session = AcademicSessionService::create_academic_session(&state.db, dto).await?;
    Ok(Json(session))
}

#[utoipa::path(
    get,
    path = "/api/academic-sessions",
    params(AcademicSessionFilterParams),
    responses(
        (status = 200, description = "Paginated sessions", body = PaginatedAcademicSessionsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Academic Sessions"
)]
#[instrument(skip(state))]
pub async fn get_academic_sessions(
    State(state): State<AppState>,
    Query(filters): Query<AcademicSessionFilterParams>,
) -> Result<Json<PaginatedAcademicSessionsResponse>, AppError> {
    let response = AcademicSessionService::get_academic_sessions(&state.db, filters).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/academic-sessions/{id}",
    params(("id" = AcademicSessionId, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session details", body = AcademicSessionWithStats),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Academic Sessions"
)]
#[instrument(skip(state))]
pub async fn get_academic_session(
    State(state): State<AppState>,
    Path(id): Path<AcademicSessionId>,
) -> Result<Json<AcademicSessionWithStats>, AppError> {
    let session = AcademicSessionService::get_academic_session_by_id(&state.db, id).await?;
    Ok(Json(session))
}

#[utoipa::path(
    put,
    path = "/api/academic-sessions/{id}",
    params(("id" = AcademicSessionId, Path, description = "Session ID")),
    request_body = UpdateAcademicSessionDto,
    responses(
        (status = 200, description = "Session updated successfully", body = AcademicSession),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Academic Sessions"
)]
#[instrument(skip(state, dto))]
pub async fn update_academic_session(
    State(state): State<AppState>,
    Path(id): Path<AcademicSessionId>,
    ValidatedJson(dto): ValidatedJson<UpdateAcademicSessionDto>,
) -> Result<Json<AcademicSession>, AppError> {
    let session = AcademicSessionService::update_academic_session(&state.db, id, dto).await?;
    Ok(Json(session))
}

#[utoipa::path(
    delete,
    path = "/api/academic-sessions/{id}",
    params(("id" = AcademicSessionId, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session deleted successfully"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Academic Sessions"
)]
#[instrument(skip(state))]
pub async fn delete_academic_session(
    State(state): State<AppState>,
    Path(id): Path<AcademicSessionId>,
) -> Result<Json<serde_json::Value>, AppError> {
    AcademicSessionService::delete_academic_session(&state.db, id).await?;
    Ok(Json(json!({"message": "Academic session deleted successfully"})))
}

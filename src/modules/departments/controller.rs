use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::json;
use tracing::instrument;

use gradeport_core::AppError;
use gradeport_models::ids::DepartmentId;

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::departments::model::{
    CreateDepartmentDto, Department, DepartmentFilterParams, PaginatedDepartmentsResponse,
    UpdateDepartmentDto,
};
use crate::modules::departments::service::DepartmentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/departments",
    request_body = CreateDepartmentDto,
    responses(
        (status = 200, description = "Department created successfully", body = Department),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Departments"
)]
#[instrument(skip(state, dto))]
pub async fn create_department(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateDepartmentDto>,
) -> Result<Json<Department>, AppError> {
    let department = DepartmentService::create_department(&state.db, dto).await?;
    Ok(Json(department))
}

#[utoipa::path(
    get,
    path = "/api/departments",
    params(DepartmentFilterParams),
    responses(
        (status = 200, description = "Paginated departments", body = PaginatedDepartmentsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Departments"
)]
#[instrument(skip(state))]
pub async fn get_departments(
    State(state): State<AppState>,
    Query(filters): Query<DepartmentFilterParams>,
) -> Result<Json<PaginatedDepartmentsResponse>, AppError> {
    let response = DepartmentService::get_departments(&state.db, filters).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/departments/{id}",
    params(("id" = DepartmentId, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department details", body = Department),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Department not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Departments"
)]
#[instrument(skip(state))]
pub async fn get_department(
    State(state): State<AppState>,
    Path(id): Path<DepartmentId>,
) -> Result<Json<Department>, AppError> {
    let department = DepartmentService::get_department_by_id(&state.db, id).await?;
    Ok(Json(department))
}

#[utoipa::path(
    put,
    path = "/api/departments/{id}",
    params(("id" = DepartmentId, Path, description = "Department ID")),
    request_body = UpdateDepartmentDto,
    responses(
        (status = 200, description = "Department updated successfully", body = Department),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Department not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Departments"
)]
#[instrument(skip(state, dto))]
pub async fn update_department(
    State(state): State<AppState>,
    Path(id): Path<DepartmentId>,
    ValidatedJson(dto): ValidatedJson<UpdateDepartmentDto>,
) -> Result<Json<Department>, AppError> {
    let department = DepartmentService::update_department(&state.db, id, dto).await?;
    Ok(Json(department))
}

#[utoipa::path(
    delete,
    path = "/api/departments/{id}",
    params(("id" = DepartmentId, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department deleted successfully"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Department not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Departments"
)]
#[instrument(skip(state))]
pub async fn delete_department(
    State(state): State<AppState>,
    Path(id): Path<DepartmentId>,
) -> Result<Json<serde_json::Value>, AppError> {
    DepartmentService::delete_department(&state.db, id).await?;
    Ok(Json(json!({"message": "Department deleted successfully"})))
}

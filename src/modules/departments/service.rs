use sqlx::PgPool;
use tracing::instrument;

use gradeport_core::{AppError, PaginationMeta};
use gradeport_models::ids::DepartmentId;

use crate::modules::departments::model::{
    CreateDepartmentDto, Department, DepartmentFilterParams, PaginatedDepartmentsResponse,
    UpdateDepartmentDto,
};

pub struct DepartmentService;

impl DepartmentService {
    /// Department codes are stored uppercase; bulk uploads and matric
    /// numbers reference them verbatim.
    #[instrument(skip(db))]
    pub async fn create_department(
        db: &PgPool,
        dto: CreateDepartmentDto,
    ) -> Result<Department, AppError> {
        let code = dto.code.trim().to_ascii_uppercase();

        let department = sqlx::query_as::<_, Department>(
            r#"INSERT INTO departments (name, code)
               VALUES ($1, $2)
               RETURNING id, name, code, created_at, updated_at"#,
        )
        .bind(dto.name.trim())
        .bind(&code)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "A department with code {} already exists",
                        code
                    ));
                }
            }
            AppError::from(e)
        })?;

        Ok(department)
    }

    #[instrument(skip(db))]
    pub async fn get_departments(
        db: &PgPool,
        filters: DepartmentFilterParams,
    ) -> Result<PaginatedDepartmentsResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();
        let search = filters
            .search
            .as_deref()
            .map(|s| format!("%{}%", s.trim()));

        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM departments
               WHERE ($1::text IS NULL OR name ILIKE $1 OR code ILIKE $1)"#,
        )
        .bind(&search)
        .fetch_one(db)
        .await?;

        let departments = sqlx::query_as::<_, Department>(
            r#"SELECT id, name, code, created_at, updated_at
               FROM departments
               WHERE ($1::text IS NULL OR name ILIKE $1 OR code ILIKE $1)
               ORDER BY name
               LIMIT $2 OFFSET $3"#,
        )
        .bind(&search)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

        Ok(PaginatedDepartmentsResponse {
            data: departments,
            meta: PaginationMeta::for_page(total, limit, offset),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_department_by_id(
        db: &PgPool,
        id: DepartmentId,
    ) -> Result<Department, AppError> {
        let department = sqlx::query_as::<_, Department>(
            r#"SELECT id, name, code, created_at, updated_at FROM departments WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Department not found")))?;

        Ok(department)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_department(
        db: &PgPool,
        id: DepartmentId,
        dto: UpdateDepartmentDto,
    ) -> Result<Department, AppError> {
        let existing = Self::get_department_by_id(db, id).await?;

        let name = dto.name.unwrap_or(existing.name);
        let code = dto
            .code
            .map(|c| c.trim().to_ascii_uppercase())
            .unwrap_or(existing.code);

        let department = sqlx::query_as::<_, Department>(
            r#"UPDATE departments
               SET name = $1, code = $2, updated_at = NOW()
               WHERE id = $3
               RETURNING id, name, code, created_at, updated_at"#,
        )
        .bind(&name)
        .bind(&code)
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "A department with code {} already exists",
                        code
                    ));
                }
            }
            AppError::from(e)
        })?;

        Ok(department)
    }

    #[instrument(skip(db))]
    pub async fn delete_department(db: &PgPool, id: DepartmentId) -> Result<(), AppError> {
        let result = sqlx::query(r#"DELETE FROM departments WHERE id = $1"#)
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Department not found")));
        }

        Ok(())
    }
}

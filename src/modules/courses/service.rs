use sqlx::PgPool;
use tracing::instrument;

use gradeport_core::{AppError, PaginationMeta};
use gradeport_models::ids::CourseId;

use crate::modules::courses::model::{
    Course, CourseFilterParams, CreateCourseDto, PaginatedCoursesResponse, UpdateCourseDto,
};
use crate::modules::departments::service::DepartmentService;
use crate::modules::students::model::Level;

pub struct CourseService;

impl CourseService {
    #[instrument(skip(db, dto))]
    pub async fn create_course(db: &PgPool, dto: CreateCourseDto) -> Result<Course, AppError> {
        // The level vocabulary is shared with students and bulk uploads.
        dto.level
            .parse::<Level>()
            .map_err(|e| AppError::unprocessable(anyhow::anyhow!(e)))?;

        DepartmentService::get_department_by_id(db, dto.department_id).await?;

        let code = dto.code.trim().to_ascii_uppercase();

        let course = sqlx::query_as::<_, Course>(
            r#"INSERT INTO courses (code, title, credit_units, level, department_id)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, code, title, credit_units, level, department_id, created_at, updated_at"#,
        )
        .bind(&code)
        .bind(dto.title.trim())
        .bind(dto.credit_units)
        .bind(&dto.level)
        .bind(dto.department_id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "A course with code {} already exists",
                        code
                    ));
                }
            }
            AppError::from(e)
        })?;

        Ok(course)
    }

    #[instrument(skip(db))]
    pub async fn get_courses(
        db: &PgPool,
        filters: CourseFilterParams,
    ) -> Result<PaginatedCoursesResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();
        let search = filters
            .search
            .as_deref()
            .map(|s| format!("%{}%", s.trim()));

        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM courses
               WHERE ($1::uuid IS NULL OR department_id = $1)
                 AND ($2::text IS NULL OR level = $2)
                 AND ($3::text IS NULL OR code ILIKE $3 OR title ILIKE $3)"#,
        )
        .bind(filters.department_id)
        .bind(&filters.level)
        .bind(&search)
        .fetch_one(db)
        .await?;

        let courses = sqlx::query_as::<_, Course>(
            r#"SELECT id, code, title, credit_units, level, department_id, created_at, updated_at
               FROM courses
               WHERE ($1::uuid IS NULL OR department_id = $1)
                 AND ($2::text IS NULL OR level = $2)
                 AND ($3::text IS NULL OR code ILIKE $3 OR title ILIKE $3)
               ORDER BY code
               LIMIT $4 OFFSET $5"#,
        )
        .bind(filters.department_id)
        .bind(&filters.level)
        .bind(&search)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

        Ok(PaginatedCoursesResponse {
            data: courses,
            meta: PaginationMeta::for_page(total, limit, offset),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_course_by_id(db: &PgPool, id: CourseId) -> Result<Course, AppError> {
        let course = sqlx::query_as::<_, Course>(
            r#"SELECT id, code, title, credit_units, level, department_id, created_at, updated_at
               FROM courses WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course not found")))?;

        Ok(course)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_course(
        db: &PgPool,
        id: CourseId,
        dto: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        let existing = Self::get_course_by_id(db, id).await?;

        if let Some(level) = dto.level.as_deref() {
            level
                .parse::<Level>()
                .map_err(|e| AppError::unprocessable(anyhow::anyhow!(e)))?;
        }
        if let Some(department_id) = dto.department_id {
            DepartmentService::get_department_by_id(db, department_id).await?;
        }

        let code = dto
            .code
            .map(|c| c.trim().to_ascii_uppercase())
            .unwrap_or(existing.code);
        let title = dto.title.unwrap_or(existing.title);
        let credit_units = dto.credit_units.unwrap_or(existing.credit_units);
        let level = dto.level.unwrap_or(existing.level);
        let department_id = dto.department_id.unwrap_or(existing.department_id);

        let course = sqlx::query_as::<_, Course>(
            r#"UPDATE courses
               SET code = $1, title = $2, credit_units = $3, level = $4, department_id = $5,
                   updated_at = NOW()
               WHERE id = $6
               RETURNING id, code, title, credit_units, level, department_id, created_at, updated_at"#,
        )
        .bind(&code)
        .bind(&title)
        .bind(credit_units)
        .bind(&level)
        .bind(department_id)
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "A course with code {} already exists",
                        code
                    ));
                }
            }
            AppError::from(e)
        })?;

        Ok(course)
    }

    #[instrument(skip(db))]
    pub async fn delete_course(db: &PgPool, id: CourseId) -> Result<(), AppError> {
        let result = sqlx::query(r#"DELETE FROM courses WHERE id = $1"#)
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Course not found")));
        }

        Ok(())
    }
}

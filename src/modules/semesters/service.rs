use sqlx::PgPool;
use tracing::instrument;

use gradeport_core::AppError;
use gradeport_models::ids::{AcademicSessionId, SemesterId};

use crate::modules::academic_sessions::service::AcademicSessionService;
use crate::modules::semesters::model::{CreateSemesterDto, Semester, UpdateSemesterDto};

pub struct SemesterService;

impl SemesterService {
    /// Semester codes are stored uppercase; bulk result uploads reference
    /// them verbatim (`FIRST`, `SECOND`).
    #[instrument(skip(db, dto))]
    pub async fn create_semester(
        db: &PgPool,
        session_id: AcademicSessionId,
        dto: CreateSemesterDto,
    ) -> Result<Semester, AppError> {
        // 404 before insert when the parent session is missing.
        AcademicSessionService::get_academic_session_by_id(db, session_id).await?;

        if dto.start_date >= dto.end_date {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Start date must be before end date"
            )));
        }

        let code = dto.code.trim().to_ascii_uppercase();

        let semester = sqlx::query_as::<_, Semester>(
            r#"INSERT INTO semesters (session_id, name, code, start_date, end_date)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, session_id, name, code, start_date, end_date, created_at, updated_at"#,
        )
        .bind(session_id)
        .bind(dto.name.trim())
        .bind(&code)
        .bind(dto.start_date)
        .bind(dto.end_date)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "A semester with code {} already exists in this session",
                        code
                    ));
                }
            }
            AppError::from(e)
        })?;

        Ok(semester)
    }

    #[instrument(skip(db))]
    pub async fn get_semesters_by_session(
        db: &PgPool,
        session_id: AcademicSessionId,
    ) -> Result<Vec<Semester>, AppError> {
        AcademicSessionService::get_academic_session_by_id(db, session_id).await?;

        let semesters = sqlx::query_as::<_, Semester>(
            r#"SELECT id, session_id, name, code, start_date, end_date, created_at, updated_at
               FROM semesters
               WHERE session_id = $1
               ORDER BY start_date"#,
        )
        .bind(session_id)
        .fetch_all(db)
        .await?;

        Ok(semesters)
    }

    #[instrument(skip(db))]
    pub async fn get_semester_by_id(db: &PgPool, id: SemesterId) -> Result<Semester, AppError> {
        let semester = sqlx::query_as::<_, Semester>(
            r#"SELECT id, session_id, name, code, start_date, end_date, created_at, updated_at
               FROM semesters WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Semester not found")))?;

        Ok(semester)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_semester(
        db: &PgPool,
        id: SemesterId,
        dto: UpdateSemesterDto,
    ) -> Result<Semester, AppError> {
        let existing = Self::get_semester_by_id(db, id).await?;

        let name = dto.name.unwrap_or(existing.name);
        let code = dto
            .code
            .map(|c| c.trim().to_ascii_uppercase())
            .unwrap_or(existing.code);
        let start_date = dto.start_date.unwrap_or(existing.start_date);
        let end_date = dto.end_date.unwrap_or(existing.end_date);

        if start_date >= end_date {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Start date must be before end date"
            )));
        }

        let semester = sqlx::query_as::<_, Semester>(
            r#"UPDATE semesters
               SET name = $1, code = $2, start_date = $3, end_date = $4, updated_at = NOW()
               WHERE id = $5
               RETURNING id, session_id, name, code, start_date, end_date, created_at, updated_at"#,
        )
        .bind(&name)
        .bind(&code)
        .bind(start_date)
        .bind(end_date)
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(semester)
    }

    #[instrument(skip(db))]
    pub async fn delete_semester(db: &PgPool, id: SemesterId) -> Result<(), AppError> {
        let result = sqlx::query(r#"DELETE FROM semesters WHERE id = $1"#)
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Semester not found")));
        }

        Ok(())
    }
}

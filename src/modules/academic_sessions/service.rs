use sqlx::PgPool;
use tracing::instrument;

use gradeport_core::{AppError, PaginationMeta};
use gradeport_models::ids::AcademicSessionId;

use crate::modules::academic_sessions::model::{
    AcademicSession, AcademicSessionFilterParams, AcademicSessionWithStats,
    CreateAcademicSessionDto, PaginatedAcademicSessionsResponse, UpdateAcademicSessionDto,
};

pub struct AcademicSessionService;

impl AcademicSessionService {
    /// Create a new academic session.
    ///
    /// Validates that start_date < end_date and that the name is unique.
    #[instrument(skip(db))]
    pub async fn create_academic_session(
        db: &PgPool,
        dto: CreateAcademicSessionDto,
    ) -> Result<AcademicSession, AppError> {
        if dto.start_date >= dto.end_date {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Start date must be before end date"
            )));
        }

        let session = sqlx::query_as::<_, AcademicSession>(
            r#"INSERT INTO academic_sessions (name, start_date, end_date)
               VALUES ($1, $2, $3)
               RETURNING id, name, start_date, end_date, is_active, created_at, updated_at"#,
        )
        .bind(dto.name.trim())
        .bind(dto.start_date)
        .bind(dto.end_date)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "An academic session with this name already exists"
                    ));
                }
            }
            AppError::from(e)
        })?;

        Ok(session)
    }

    #[instrument(skip(db))]
    pub async fn get_academic_sessions(
        db: &PgPool,
        filters: AcademicSessionFilterParams,
    ) -> Result<PaginatedAcademicSessionsResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM academic_sessions
               WHERE ($1::bool IS NULL OR is_active = $1)"#,
        )
        .bind(filters.is_active)
        .fetch_one(db)
        .await?;

        let sessions = sqlx::query_as::<_, AcademicSessionWithStats>(
            r#"SELECT
                s.id, s.name, s.start_date, s.end_date, s.is_active,
                s.created_at, s.updated_at,
                COUNT(t.id) AS semester_count
               FROM academic_sessions s
               LEFT JOIN semesters t ON t.session_id = s.id
               WHERE ($1::bool IS NULL OR s.is_active = $1)
               GROUP BY s.id
               ORDER BY s.start_date DESC
               LIMIT $2 OFFSET $3"#,
        )
        .bind(filters.is_active)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

        Ok(PaginatedAcademicSessionsResponse {
            data: sessions,
            meta: PaginationMeta::for_page(total, limit, offset),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_academic_session_by_id(
        db: &PgPool,
        session_id: AcademicSessionId,
    ) -> Result<AcademicSessionWithStats, AppError> {
        let session = sqlx::query_as::<_, AcademicSessionWithStats>(
            r#"SELECT
                s.id, s.name, s.start_date, s.end_date, s.is_active,
                s.created_at, s.updated_at,
                COUNT(t.id) AS semester_count
               FROM academic_sessions s
               LEFT JOIN semesters t ON t.session_id = s.id
               WHERE s.id = $1
               GROUP BY s.id"#,
        )
        .bind(session_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Academic session not found")))?;

        Ok(session)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_academic_session(
        db: &PgPool,
        session_id: AcademicSessionId,
        dto: UpdateAcademicSessionDto,
    ) -> Result<AcademicSession, AppError> {
        let existing = Self::get_academic_session_by_id(db, session_id).await?;

        let name = dto.name.unwrap_or(existing.name);
        let start_date = dto.start_date.unwrap_or(existing.start_date);
        let end_date = dto.end_date.unwrap_or(existing.end_date);
        let is_active = dto.is_active.unwrap_or(existing.is_active);

        if start_date >= end_date {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Start date must be before end date"
            )));
        }

        // Activating a session deactivates every other one; a single active
        // session is what "the current session" means everywhere else.
        let mut tx = db.begin().await?;

        if is_active && !existing.is_active {
            sqlx::query(r#"UPDATE academic_sessions SET is_active = FALSE WHERE is_active"#)
                .execute(&mut *tx)
                .await?;
        }

        let session = sqlx::query_as::<_, AcademicSession>(
            r#"UPDATE academic_sessions
               SET name = $1, start_date = $2, end_date = $3, is_active = $4, updated_at = NOW()
               WHERE id = $5
               RETURNING id, name, start_date, end_date, is_active, created_at, updated_at"#,
        )
        .bind(&name)
        .bind(start_date)
        .bind(end_date)
        .bind(is_active)
        .bind(session_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(session)
    }

    #[instrument(skip(db))]
    pub async fn delete_academic_session(
        db: &PgPool,
        session_id: AcademicSessionId,
    ) -> Result<(), AppError> {
        let result = sqlx::query(r#"DELETE FROM academic_sessions WHERE id = $1"#)
            .bind(session_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Academic session not found"
            )));
        }

        Ok(())
    }
}

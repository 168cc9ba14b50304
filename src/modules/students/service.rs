use sqlx::PgPool;
use tracing::instrument;

use gradeport_core::import::students::{NewStudentRecord, StudentImportRefs};
use gradeport_core::import::{self, BatchOutcome, RecordSink};
use gradeport_core::{AppError, PaginationMeta};
use gradeport_models::ids::StudentId;

use crate::metrics;
use crate::modules::students::model::{
    CreateStudentDto, PaginatedStudentsResponse, Student, StudentFilterParams, UpdateStudentDto,
};

const STUDENT_COLUMNS: &str = r#"id, matric_number, first_name, last_name, email, phone,
    level, status, gender, date_of_birth, address, department_id, session_id,
    created_at, updated_at"#;

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db, dto))]
    pub async fn create_student(db: &PgPool, dto: CreateStudentDto) -> Result<Student, AppError> {
        let query = format!(
            r#"INSERT INTO students
               (matric_number, first_name, last_name, email, phone, level, status, gender,
                date_of_birth, address, department_id, session_id)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
               RETURNING {STUDENT_COLUMNS}"#
        );

        let student = sqlx::query_as::<_, Student>(&query)
            .bind(dto.matric_number.as_str())
            .bind(dto.first_name.trim())
            .bind(dto.last_name.trim())
            .bind(dto.email.as_str())
            .bind(&dto.phone)
            .bind(dto.level.as_str())
            .bind(dto.status.as_str())
            .bind(dto.gender.as_str())
            .bind(dto.date_of_birth)
            .bind(&dto.address)
            .bind(dto.department_id)
            .bind(dto.session_id)
            .fetch_one(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::bad_request(anyhow::anyhow!(
                            "A student with matric number {} or this email already exists",
                            dto.matric_number
                        ));
                    }
                }
                AppError::from(e)
            })?;

        Ok(student)
    }

    #[instrument(skip(db))]
    pub async fn get_students(
        db: &PgPool,
        filters: StudentFilterParams,
    ) -> Result<PaginatedStudentsResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();
        let search = filters
            .search
            .as_deref()
            .map(|s| format!("%{}%", s.trim()));

        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM students
               WHERE ($1::text IS NULL OR level = $1)
                 AND ($2::text IS NULL OR status = $2)
                 AND ($3::uuid IS NULL OR department_id = $3)
                 AND ($4::text IS NULL OR matric_number ILIKE $4 OR first_name ILIKE $4
                      OR last_name ILIKE $4 OR email ILIKE $4)"#,
        )
        .bind(&filters.level)
        .bind(&filters.status)
        .bind(filters.department_id)
        .bind(&search)
        .fetch_one(db)
        .await?;

        let query = format!(
            r#"SELECT {STUDENT_COLUMNS}
               FROM students
               WHERE ($1::text IS NULL OR level = $1)
                 AND ($2::text IS NULL OR status = $2)
                 AND ($3::uuid IS NULL OR department_id = $3)
                 AND ($4::text IS NULL OR matric_number ILIKE $4 OR first_name ILIKE $4
                      OR last_name ILIKE $4 OR email ILIKE $4)
               ORDER BY matric_number
               LIMIT $5 OFFSET $6"#
        );

        let students = sqlx::query_as::<_, Student>(&query)
            .bind(&filters.level)
            .bind(&filters.status)
            .bind(filters.department_id)
            .bind(&search)
            .bind(limit)
            .bind(offset)
            .fetch_all(db)
            .await?;

        Ok(PaginatedStudentsResponse {
            data: students,
            meta: PaginationMeta::for_page(total, limit, offset),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_student_by_id(db: &PgPool, id: StudentId) -> Result<Student, AppError> {
        let query = format!(r#"SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1"#);

        let student = sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))?;

        Ok(student)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        id: StudentId,
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        let existing = Self::get_student_by_id(db, id).await?;

        let first_name = dto.first_name.unwrap_or(existing.first_name);
        let last_name = dto.last_name.unwrap_or(existing.last_name);
        let email = dto.email.unwrap_or(existing.email);
        let phone = dto.phone.or(existing.phone);
        let level = dto
            .level
            .map(|l| l.as_str().to_string())
            .unwrap_or(existing.level);
        let status = dto
            .status
            .map(|s| s.as_str().to_string())
            .unwrap_or(existing.status);
        let gender = dto
            .gender
            .map(|g| g.as_str().to_string())
            .unwrap_or(existing.gender);
        let date_of_birth = dto.date_of_birth.or(existing.date_of_birth);
        let address = dto.address.or(existing.address);
        let department_id = dto.department_id.or(existing.department_id);
        let session_id = dto.session_id.or(existing.session_id);

        let query = format!(
            r#"UPDATE students
               SET first_name = $1, last_name = $2, email = $3, phone = $4, level = $5,
                   status = $6, gender = $7, date_of_birth = $8, address = $9,
                   department_id = $10, session_id = $11, updated_at = NOW()
               WHERE id = $12
               RETURNING {STUDENT_COLUMNS}"#
        );

        let student = sqlx::query_as::<_, Student>(&query)
            .bind(&first_name)
            .bind(&last_name)
            .bind(email.as_str())
            .bind(&phone)
            .bind(&level)
            .bind(&status)
            .bind(&gender)
            .bind(date_of_birth)
            .bind(&address)
            .bind(department_id)
            .bind(session_id)
            .bind(id)
            .fetch_one(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::bad_request(anyhow::anyhow!(
                            "A student with email {} already exists",
                            email
                        ));
                    }
                }
                AppError::from(e)
            })?;

        Ok(student)
    }

    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, id: StudentId) -> Result<(), AppError> {
        let result = sqlx::query(r#"DELETE FROM students WHERE id = $1"#)
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Student not found")));
        }

        Ok(())
    }

    /// Bulk CSV import.
    ///
    /// Parse, snapshot reference data, validate the whole batch
    /// (all-or-nothing), and only then submit row by row.
    #[instrument(skip(db, content))]
    pub async fn import_students(db: &PgPool, content: &str) -> Result<BatchOutcome, AppError> {
        // Parsing happens before any database work; a malformed upload is
        // answered without touching the store.
        let rows = gradeport_core::import::students::parse_rows(content).map_err(|e| {
            metrics::track_import_batch("students", false);
            AppError::bad_request(anyhow::anyhow!(e))
        })?;

        let refs = Self::snapshot_refs(db).await?;

        let records = match gradeport_core::import::students::validate(&rows, &refs) {
            Ok(records) => records,
            Err(errors) => {
                metrics::track_import_batch("students", false);
                return Ok(BatchOutcome::Rejected(errors));
            }
        };

        let sink = StudentRowSink { db };
        let summary = import::submit_batch(&records, &sink).await;

        metrics::track_import_batch("students", true);
        metrics::track_import_rows("students", summary.success_count, summary.error_count);

        Ok(BatchOutcome::Accepted(summary))
    }

    async fn snapshot_refs(db: &PgPool) -> Result<StudentImportRefs, AppError> {
        let departments = sqlx::query_as::<_, (String, uuid::Uuid)>(
            r#"SELECT code, id FROM departments"#,
        )
        .fetch_all(db)
        .await?
        .into_iter()
        .collect();

        let sessions = sqlx::query_as::<_, (String, uuid::Uuid)>(
            r#"SELECT name, id FROM academic_sessions"#,
        )
        .fetch_all(db)
        .await?
        .into_iter()
        .collect();

        Ok(StudentImportRefs {
            departments,
            sessions,
        })
    }
}

/// Persistence collaborator for the import core: one insert per row. A
/// failing insert (say, a matric number that appeared since validation) is
/// this row's problem only.
struct StudentRowSink<'a> {
    db: &'a PgPool,
}

impl RecordSink for StudentRowSink<'_> {
    type Record = NewStudentRecord;

    async fn submit(&self, record: &NewStudentRecord) -> anyhow::Result<()> {
        sqlx::query(
            r#"INSERT INTO students
               (matric_number, first_name, last_name, email, phone, level, status, gender,
                date_of_birth, address, department_id, session_id)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)"#,
        )
        .bind(&record.matric_number)
        .bind(&record.first_name)
        .bind(&record.last_name)
        .bind(&record.email)
        .bind(&record.phone)
        .bind(&record.level)
        .bind(&record.status)
        .bind(&record.gender)
        .bind(record.date_of_birth)
        .bind(&record.address)
        .bind(record.department_id)
        .bind(record.session_id)
        .execute(self.db)
        .await?;

        Ok(())
    }
}

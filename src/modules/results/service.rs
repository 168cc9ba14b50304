use sqlx::PgPool;
use tracing::instrument;

use gradeport_core::grading::{DegreeClass, Grade, WeightedEntry, aggregate_gpa};
use gradeport_core::import::results::{NewResultRecord, ResultImportRefs};
use gradeport_core::import::{self, BatchOutcome, RecordSink};
use gradeport_core::{AppError, PaginationMeta};
use gradeport_models::ids::{AcademicSessionId, StudentId, UserId};

use crate::metrics;
use crate::modules::results::model::{
    CourseResult, PaginatedResultsResponse, RecordResultDto, ReportCard, ReportCardLine,
    ResultFilterParams, SemesterReport,
};
use crate::modules::students::service::StudentService;

const RESULT_COLUMNS: &str = r#"id, student_id, course_id, semester_id, session_id, score,
    grade, grade_point, remarks, recorded_by, created_at, updated_at"#;

pub struct ResultService;

impl ResultService {
    /// Record (or re-record) one course result. The grade engine is the
    /// single authority: the letter and point are computed here and stored
    /// with the score. A retake overwrites the previous row for the same
    /// (student, course, semester).
    #[instrument(skip(db, dto))]
    pub async fn record_result(
        db: &PgPool,
        recorded_by: UserId,
        dto: RecordResultDto,
    ) -> Result<CourseResult, AppError> {
        let grade = Grade::from_score(dto.score)
            .map_err(|e| AppError::unprocessable(anyhow::anyhow!(e)))?;

        let query = format!(
            r#"INSERT INTO results
               (student_id, course_id, semester_id, session_id, score, grade, grade_point,
                remarks, recorded_by)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               ON CONFLICT (student_id, course_id, semester_id)
               DO UPDATE SET score = EXCLUDED.score, grade = EXCLUDED.grade,
                             grade_point = EXCLUDED.grade_point, remarks = EXCLUDED.remarks,
                             recorded_by = EXCLUDED.recorded_by, updated_at = NOW()
               RETURNING {RESULT_COLUMNS}"#
        );

        let result = sqlx::query_as::<_, CourseResult>(&query)
            .bind(dto.student_id)
            .bind(dto.course_id)
            .bind(dto.semester_id)
            .bind(dto.session_id)
            .bind(dto.score)
            .bind(grade.as_str())
            .bind(grade.points())
            .bind(&dto.remarks)
            .bind(recorded_by)
            .fetch_one(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::bad_request(anyhow::anyhow!(
                            "Unknown student, course, semester, or session reference"
                        ));
                    }
                }
                AppError::from(e)
            })?;

        metrics::track_result_recorded(grade.as_str());
        Ok(result)
    }

    #[instrument(skip(db))]
    pub async fn get_results(
        db: &PgPool,
        filters: ResultFilterParams,
    ) -> Result<PaginatedResultsResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM results
               WHERE ($1::uuid IS NULL OR student_id = $1)
                 AND ($2::uuid IS NULL OR course_id = $2)
                 AND ($3::uuid IS NULL OR semester_id = $3)
                 AND ($4::uuid IS NULL OR session_id = $4)"#,
        )
        .bind(filters.student_id)
        .bind(filters.course_id)
        .bind(filters.semester_id)
        .bind(filters.session_id)
        .fetch_one(db)
        .await?;

        let query = format!(
            r#"SELECT {RESULT_COLUMNS}
               FROM results
               WHERE ($1::uuid IS NULL OR student_id = $1)
                 AND ($2::uuid IS NULL OR course_id = $2)
                 AND ($3::uuid IS NULL OR semester_id = $3)
                 AND ($4::uuid IS NULL OR session_id = $4)
               ORDER BY created_at DESC
               LIMIT $5 OFFSET $6"#
        );

        let results = sqlx::query_as::<_, CourseResult>(&query)
            .bind(filters.student_id)
            .bind(filters.course_id)
            .bind(filters.semester_id)
            .bind(filters.session_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(db)
            .await?;

        Ok(PaginatedResultsResponse {
            data: results,
            meta: PaginationMeta::for_page(total, limit, offset),
        })
    }

    /// Bulk CSV result import: snapshot references, validate all-or-nothing,
    /// submit row by row. Unresolved references are validation errors, same
    /// as the student upload.
    #[instrument(skip(db, content))]
    pub async fn import_results(
        db: &PgPool,
        recorded_by: UserId,
        content: &str,
    ) -> Result<BatchOutcome, AppError> {
        let rows = gradeport_core::import::results::parse_rows(content).map_err(|e| {
            metrics::track_import_batch("results", false);
            AppError::bad_request(anyhow::anyhow!(e))
        })?;

        let refs = Self::snapshot_refs(db).await?;

        let records = match gradeport_core::import::results::validate(&rows, &refs) {
            Ok(records) => records,
            Err(errors) => {
                metrics::track_import_batch("results", false);
                return Ok(BatchOutcome::Rejected(errors));
            }
        };

        let sink = ResultRowSink { db, recorded_by };
        let summary = import::submit_batch(&records, &sink).await;

        metrics::track_import_batch("results", true);
        metrics::track_import_rows("results", summary.success_count, summary.error_count);

        Ok(BatchOutcome::Accepted(summary))
    }

    async fn snapshot_refs(db: &PgPool) -> Result<ResultImportRefs, AppError> {
        let students = sqlx::query_as::<_, (String, uuid::Uuid)>(
            r#"SELECT matric_number, id FROM students"#,
        )
        .fetch_all(db)
        .await?
        .into_iter()
        .collect();

        let courses = sqlx::query_as::<_, (String, uuid::Uuid)>(r#"SELECT code, id FROM courses"#)
            .fetch_all(db)
            .await?
            .into_iter()
            .collect();

        let semesters =
            sqlx::query_as::<_, (String, uuid::Uuid)>(r#"SELECT code, id FROM semesters"#)
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

        Ok(ResultImportRefs {
            students,
            courses,
            semesters,
            sessions,
        })
    }

    /// Build a student's report card: results joined with courses, grouped
    /// into semester sections. Each semester's GPA and the overall CGPA come
    /// from the same weighted aggregation over different subsets.
    #[instrument(skip(db))]
    pub async fn report_card(
        db: &PgPool,
        student_id: StudentId,
        session_id: Option<AcademicSessionId>,
    ) -> Result<ReportCard, AppError> {
        let student = StudentService::get_student_by_id(db, student_id).await?;

        let lines = sqlx::query_as::<_, ReportCardLine>(
            r#"SELECT
                c.code AS course_code,
                c.title AS course_title,
                c.credit_units,
                r.score,
                r.grade,
                r.grade_point,
                r.semester_id,
                t.name AS semester_name,
                s.name AS session_name
               FROM results r
               JOIN courses c ON c.id = r.course_id
               JOIN semesters t ON t.id = r.semester_id
               JOIN academic_sessions s ON s.id = r.session_id
               WHERE r.student_id = $1
                 AND ($2::uuid IS NULL OR r.session_id = $2)
               ORDER BY t.start_date, c.code"#,
        )
        .bind(student_id)
        .bind(session_id)
        .fetch_all(db)
        .await?;

        let mut semesters: Vec<SemesterReport> = Vec::new();
        for line in lines {
            match semesters
                .iter_mut()
                .find(|report| report.semester_id == line.semester_id)
            {
                Some(report) => report.lines.push(line),
                None => semesters.push(SemesterReport {
                    semester_id: line.semester_id,
                    semester_name: line.semester_name.clone(),
                    session_name: line.session_name.clone(),
                    lines: vec![line],
                    total_credit_units: 0,
                    gpa: String::new(),
                }),
            }
        }

        let mut all_entries: Vec<WeightedEntry> = Vec::new();
        let mut total_credit_units: i64 = 0;

        for report in &mut semesters {
            let entries: Vec<WeightedEntry> = report.lines.iter().map(weighted_entry).collect();
            report.total_credit_units =
                report.lines.iter().map(|l| l.credit_units as i64).sum();
            report.gpa = aggregate_gpa(&entries);

            total_credit_units += report.total_credit_units;
            all_entries.extend(entries);
        }

        let cgpa = aggregate_gpa(&all_entries);
        let degree_class = DegreeClass::from_cgpa(cgpa.parse::<f64>().unwrap_or(0.0));

        Ok(ReportCard {
            student_id: student.id,
            matric_number: student.matric_number.into_inner(),
            full_name: format!("{} {}", student.first_name, student.last_name),
            semesters,
            total_credit_units,
            cgpa,
            degree_class: degree_class.as_str().to_string(),
        })
    }
}

/// One line's weight in the GPA. Stored letters outside the scale (none are
/// written by this codebase) fall back to zero points rather than failing
/// the whole card.
fn weighted_entry(line: &ReportCardLine) -> WeightedEntry {
    WeightedEntry {
        grade: Grade::from_letter(&line.grade).unwrap_or(Grade::F),
        credit_units: line.credit_units.max(0) as u64,
    }
}

/// Persistence collaborator for the result import: one upsert per row,
/// failures isolated per row.
struct ResultRowSink<'a> {
    db: &'a PgPool,
    recorded_by: UserId,
}

impl RecordSink for ResultRowSink<'_> {
    type Record = NewResultRecord;

    async fn submit(&self, record: &NewResultRecord) -> anyhow::Result<()> {
        sqlx::query(
            r#"INSERT INTO results
               (student_id, course_id, semester_id, session_id, score, grade, grade_point,
                remarks, recorded_by)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               ON CONFLICT (student_id, course_id, semester_id)
               DO UPDATE SET score = EXCLUDED.score, grade = EXCLUDED.grade,
                             grade_point = EXCLUDED.grade_point, remarks = EXCLUDED.remarks,
                             recorded_by = EXCLUDED.recorded_by, updated_at = NOW()"#,
        )
        .bind(record.student_id)
        .bind(record.course_id)
        .bind(record.semester_id)
        .bind(record.session_id)
        .bind(record.score)
        .bind(record.grade.as_str())
        .bind(record.grade.points())
        .bind(&record.remarks)
        .bind(self.recorded_by)
        .execute(self.db)
        .await?;

        Ok(())
    }
}

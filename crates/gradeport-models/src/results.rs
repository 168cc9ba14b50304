//! Result entities, DTOs, and report-card shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use gradeport_core::{PaginationMeta, PaginationParams};

use crate::ids::{AcademicSessionId, CourseId, ResultId, SemesterId, StudentId, UserId};

/// One recorded course result. The grade and grade point are computed by the
/// grade engine when the score is recorded and stored alongside it.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CourseResult {
    pub id: ResultId,
    pub student_id: StudentId,
    pub course_id: CourseId,
    pub semester_id: SemesterId,
    pub session_id: AcademicSessionId,
    pub score: f64,
    pub grade: String,
    pub grade_point: f64,
    pub remarks: Option<String>,
    pub recorded_by: Option<UserId>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RecordResultDto {
    pub student_id: StudentId,
    pub course_id: CourseId,
    pub semester_id: SemesterId,
    pub session_id: AcademicSessionId,
    /// Raw score, 0-100. Out-of-range scores are rejected, never clamped.
    pub score: f64,
    #[validate(length(max = 300))]
    pub remarks: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct ResultFilterParams {
    pub student_id: Option<StudentId>,
    pub course_id: Option<CourseId>,
    pub semester_id: Option<SemesterId>,
    pub session_id: Option<AcademicSessionId>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResultsResponse {
    pub data: Vec<CourseResult>,
    pub meta: PaginationMeta,
}

/// One line of a report card: a result joined with its course.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ReportCardLine {
    pub course_code: String,
    pub course_title: String,
    pub credit_units: i16,
    pub score: f64,
    pub grade: String,
    pub grade_point: f64,
    pub semester_id: SemesterId,
    pub semester_name: String,
    pub session_name: String,
}

/// Grouped report-card section for one semester.
#[derive(Debug, Serialize, ToSchema)]
pub struct SemesterReport {
    pub semester_id: SemesterId,
    pub semester_name: String,
    pub session_name: String,
    pub lines: Vec<ReportCardLine>,
    pub total_credit_units: i64,
    /// Weighted GPA over this semester's lines, fixed-point 2 decimals.
    pub gpa: String,
}

/// The full report card returned to students and admins.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReportCard {
    pub student_id: StudentId,
    pub matric_number: String,
    pub full_name: String,
    pub semesters: Vec<SemesterReport>,
    pub total_credit_units: i64,
    /// Cumulative GPA over every line, same aggregation as each semester GPA.
    pub cgpa: String,
    pub degree_class: String,
}

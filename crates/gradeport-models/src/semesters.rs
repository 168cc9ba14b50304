//! Semester entities and DTOs. Semesters always belong to a session.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{AcademicSessionId, SemesterId};

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Semester {
    pub id: SemesterId,
    pub session_id: AcademicSessionId,
    /// Display name, e.g. `First Semester`.
    pub name: String,
    /// Stable code used by bulk result uploads, e.g. `FIRST`.
    pub code: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateSemesterDto {
    #[validate(length(min = 3, max = 50))]
    pub name: String,
    #[validate(length(min = 2, max = 20))]
    pub code: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateSemesterDto {
    #[validate(length(min = 3, max = 50))]
    pub name: Option<String>,
    #[validate(length(min = 2, max = 20))]
    pub code: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

//! Academic session entities and DTOs.
//!
//! A session is one academic year, named `2023/2024`, holding two semesters.
//! At most one session is active at a time; the active session is the default
//! target for new students and recorded results.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use gradeport_core::{PaginationMeta, PaginationParams};

use crate::ids::AcademicSessionId;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AcademicSession {
    pub id: AcademicSessionId,
    /// Session name in `YYYY/YYYY` form, e.g. `2023/2024`.
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A session together with how many semesters it carries.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AcademicSessionWithStats {
    pub id: AcademicSessionId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub semester_count: i64,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateAcademicSessionDto {
    #[validate(length(min = 4, max = 20))]
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateAcademicSessionDto {
    #[validate(length(min = 4, max = 20))]
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct AcademicSessionFilterParams {
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedAcademicSessionsResponse {
    pub data: Vec<AcademicSessionWithStats>,
    pub meta: PaginationMeta,
}

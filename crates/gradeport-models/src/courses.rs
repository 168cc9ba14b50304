//! Course entities and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use gradeport_core::{PaginationMeta, PaginationParams};

use crate::ids::{CourseId, DepartmentId};

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Course {
    pub id: CourseId,
    /// Course code used in bulk result uploads, e.g. `MTH101`.
    pub code: String,
    pub title: String,
    /// Integer weight of the course in GPA aggregation.
    pub credit_units: i16,
    /// Level the course is offered at, e.g. `100L`.
    pub level: String,
    pub department_id: DepartmentId,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateCourseDto {
    #[validate(length(min = 3, max = 20))]
    pub code: String,
    #[validate(length(min = 3, max = 200))]
    pub title: String,
    #[validate(range(min = 1, max = 6))]
    pub credit_units: i16,
    #[validate(length(min = 4, max = 4))]
    pub level: String,
    pub department_id: DepartmentId,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateCourseDto {
    #[validate(length(min = 3, max = 20))]
    pub code: Option<String>,
    #[validate(length(min = 3, max = 200))]
    pub title: Option<String>,
    #[validate(range(min = 1, max = 6))]
    pub credit_units: Option<i16>,
    #[validate(length(min = 4, max = 4))]
    pub level: Option<String>,
    pub department_id: Option<DepartmentId>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct CourseFilterParams {
    pub department_id: Option<DepartmentId>,
    pub level: Option<String>,
    /// Case-insensitive match against code or title.
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedCoursesResponse {
    pub data: Vec<Course>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credit_units_are_bounded() {
        let dto = CreateCourseDto {
            code: "MTH101".to_string(),
            title: "General Mathematics I".to_string(),
            credit_units: 0,
            level: "100L".to_string(),
            department_id: DepartmentId::new(),
        };
        assert!(dto.validate().is_err());

        let dto = CreateCourseDto {
            credit_units: 3,
            ..dto
        };
        assert!(dto.validate().is_ok());
    }
}

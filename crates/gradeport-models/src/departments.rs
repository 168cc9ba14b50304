//! Department entities and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use gradeport_core::{PaginationMeta, PaginationParams};

use crate::ids::DepartmentId;

/// A department offering courses and owning students.
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    /// Short uppercase code used in matric numbers and bulk uploads, e.g. `CSC`.
    pub code: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateDepartmentDto {
    #[validate(length(min = 2, max = 150))]
    pub name: String,
    #[validate(length(min = 2, max = 10))]
    pub code: String,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateDepartmentDto {
    #[validate(length(min = 2, max = 150))]
    pub name: Option<String>,
    #[validate(length(min = 2, max = 10))]
    pub code: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct DepartmentFilterParams {
    /// Case-insensitive match against name or code.
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedDepartmentsResponse {
    pub data: Vec<Department>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_dto_validates_lengths() {
        let dto = CreateDepartmentDto {
            name: "Computer Science".to_string(),
            code: "CSC".to_string(),
        };
        assert!(dto.validate().is_ok());

        let dto = CreateDepartmentDto {
            name: "C".to_string(),
            code: "THISCODEISTOOLONG".to_string(),
        };
        assert!(dto.validate().is_err());
    }
}

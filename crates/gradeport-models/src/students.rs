//! Student entities, DTOs, and the enumerated field vocabularies.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use gradeport_core::{PaginationMeta, PaginationParams};

use crate::ids::{AcademicSessionId, DepartmentId, StudentId};
use crate::value_types::{Email, MatricNumber};

/// Study level. Serialized exactly as uploaded and stored: `100L`..`500L`,
/// case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Level {
    #[serde(rename = "100L")]
    L100,
    #[serde(rename = "200L")]
    L200,
    #[serde(rename = "300L")]
    L300,
    #[serde(rename = "400L")]
    L400,
    #[serde(rename = "500L")]
    L500,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::L100,
        Level::L200,
        Level::L300,
        Level::L400,
        Level::L500,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Level::L100 => "100L",
            Level::L200 => "200L",
            Level::L300 => "300L",
            Level::L400 => "400L",
            Level::L500 => "500L",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    // Case-sensitive on purpose: `100l` is not a level.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| format!("'{}' is not a valid level", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    Active,
    Inactive,
    Graduated,
}

impl StudentStatus {
    pub const ALL: [StudentStatus; 3] = [
        StudentStatus::Active,
        StudentStatus::Inactive,
        StudentStatus::Graduated,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            StudentStatus::Active => "active",
            StudentStatus::Inactive => "inactive",
            StudentStatus::Graduated => "graduated",
        }
    }
}

impl Default for StudentStatus {
    fn default() -> Self {
        StudentStatus::Active
    }
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("'{}' is not a valid status", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    // Matched case-insensitively, stored lowercase.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(format!("'{}' is not a valid gender", s)),
        }
    }
}

impl<'de> Deserialize<'de> for Gender {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A student record as stored.
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Student {
    pub id: StudentId,
    pub matric_number: MatricNumber,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub level: String,
    pub status: String,
    pub gender: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub department_id: Option<DepartmentId>,
    pub session_id: Option<AcademicSessionId>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateStudentDto {
    pub matric_number: MatricNumber,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    pub email: Email,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    pub level: Level,
    #[serde(default)]
    pub status: StudentStatus,
    pub gender: Gender,
    pub date_of_birth: Option<NaiveDate>,
    #[validate(length(max = 300))]
    pub address: Option<String>,
    pub department_id: Option<DepartmentId>,
    pub session_id: Option<AcademicSessionId>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateStudentDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    pub email: Option<Email>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    pub level: Option<Level>,
    pub status: Option<StudentStatus>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    #[validate(length(max = 300))]
    pub address: Option<String>,
    pub department_id: Option<DepartmentId>,
    pub session_id: Option<AcademicSessionId>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct StudentFilterParams {
    pub level: Option<String>,
    pub status: Option<String>,
    pub department_id: Option<DepartmentId>,
    /// Case-insensitive match against matric number, names, or email.
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedStudentsResponse {
    pub data: Vec<Student>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradeport_core::import::students as import;

    /// The API vocabularies and the bulk-upload vocabularies are the same
    /// sets; a drift here would let an upload create rows the API rejects.
    #[test]
    fn enums_match_the_import_vocabulary() {
        let levels: Vec<&str> = Level::ALL.iter().map(|l| l.as_str()).collect();
        assert_eq!(levels, import::ALLOWED_LEVELS);

        let statuses: Vec<&str> = StudentStatus::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(statuses, import::ALLOWED_STATUSES);

        assert_eq!(
            [Gender::Male.as_str(), Gender::Female.as_str()],
            import::ALLOWED_GENDERS
        );
    }

    #[test]
    fn level_is_case_sensitive() {
        assert!("100L".parse::<Level>().is_ok());
        assert!("100l".parse::<Level>().is_err());
    }

    #[test]
    fn gender_is_case_insensitive() {
        assert_eq!("MALE".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!("Female".parse::<Gender>().unwrap(), Gender::Female);
        assert!("other".parse::<Gender>().is_err());
    }

    #[test]
    fn status_defaults_to_active_when_absent() {
        let json = r#"{
            "matric_number": "CSC/2023/001",
            "first_name": "Ada",
            "last_name": "Obi",
            "email": "ada@unn.edu.ng",
            "level": "100L",
            "gender": "female"
        }"#;
        let dto: CreateStudentDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.status, StudentStatus::Active);
        assert!(dto.validate().is_ok());
    }
}

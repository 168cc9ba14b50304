//! User accounts (admins and lecturers).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::UserId;
use crate::value_types::Email;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Lecturer,
    Student,
}

impl UserRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Lecturer => "lecturer",
            UserRole::Student => "student",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "lecturer" => Ok(UserRole::Lecturer),
            "student" => Ok(UserRole::Student),
            _ => Err(format!("'{}' is not a valid role", s)),
        }
    }
}

/// A user account, without the password hash.
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub role: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateUserDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    pub email: Email,
    #[validate(length(min = 8))]
    pub password: String,
    pub role: UserRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips() {
        for role in [UserRole::Admin, UserRole::Lecturer, UserRole::Student] {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
        assert!("registrar".parse::<UserRole>().is_err());
    }

    #[test]
    fn create_user_requires_long_password() {
        let dto = CreateUserDto {
            first_name: "Ngozi".to_string(),
            last_name: "Ibe".to_string(),
            email: Email::new("ngozi@unn.edu.ng").unwrap(),
            password: "short".to_string(),
            role: UserRole::Lecturer,
        };
        assert!(dto.validate().is_err());
    }
}

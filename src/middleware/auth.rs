use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use gradeport_core::AppError;
use gradeport_models::ids::{StudentId, UserId};

use crate::modules::auth::model::Claims;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::jwt::verify_token;

/// Extractor that validates the bearer token and carries the authenticated
/// user's claims for the rest of the request. This is the request's session
/// object — handlers receive it explicitly instead of reaching into any
/// shared auth context.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> Result<UserId, AppError> {
        self.0
            .sub
            .parse::<UserId>()
            .map_err(|_| AppError::unauthorized("Invalid user ID in token"))
    }

    pub fn role(&self) -> Result<UserRole, AppError> {
        self.0
            .role
            .parse::<UserRole>()
            .map_err(|_| AppError::unauthorized("Invalid role in token"))
    }

    pub fn is_admin(&self) -> bool {
        self.0.role == UserRole::Admin.as_str()
    }

    /// Admin or lecturer: the accounts that may record and inspect results.
    pub fn is_staff(&self) -> bool {
        self.is_admin() || self.0.role == UserRole::Lecturer.as_str()
    }

    /// Student tokens carry the student row's id as subject.
    pub fn is_student_self(&self, student_id: StudentId) -> bool {
        self.0.role == UserRole::Student.as_str() && self.0.sub == student_id.to_string()
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: &str, sub: &str) -> Claims {
        Claims {
            sub: sub.to_string(),
            email: "t@unn.edu.ng".to_string(),
            role: role.to_string(),
            exp: 9999999999,
            iat: 1234567890,
        }
    }

    #[test]
    fn role_checks() {
        let admin = AuthUser(claims("admin", "x"));
        assert!(admin.is_admin());
        assert!(admin.is_staff());

        let lecturer = AuthUser(claims("lecturer", "x"));
        assert!(!lecturer.is_admin());
        assert!(lecturer.is_staff());

        let student = AuthUser(claims("student", "x"));
        assert!(!student.is_staff());
    }

    #[test]
    fn student_self_matches_on_subject() {
        let id = StudentId::new();
        let student = AuthUser(claims("student", &id.to_string()));
        assert!(student.is_student_self(id));
        assert!(!student.is_student_self(StudentId::new()));

        // A lecturer is never "the student", even with a matching subject.
        let lecturer = AuthUser(claims("lecturer", &id.to_string()));
        assert!(!lecturer.is_student_self(id));
    }
}

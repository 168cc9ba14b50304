//! Authentication DTOs and JWT claims.
//!
//! The claims object is the request's whole session: extracted once by the
//! auth middleware, passed explicitly into handlers, and dropped when the
//! response goes out. Nothing auth-related lives in global state.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::UserId;
use crate::users::User;
use crate::value_types::Email;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub email: String,
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}

/// Credential row fetched for login; the only place the password hash leaves
/// the database.
#[derive(Debug, FromRow)]
pub struct UserCredentials {
    pub id: UserId,
    pub email: Email,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    pub email: Email,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: User,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

use sqlx::PgPool;
use tracing::instrument;

use gradeport_core::AppError;
use gradeport_models::ids::UserId;

use crate::config::jwt::JwtConfig;
use crate::modules::auth::model::{LoginRequest, LoginResponse, UserCredentials};
use crate::modules::users::model::User;
use crate::metrics;
use crate::utils::jwt::create_access_token;
use crate::utils::password::verify_password;

pub struct AuthService;

impl AuthService {
    /// Verify credentials and issue an access token. Unknown email and wrong
    /// password produce the same response; nothing leaks which one it was.
    #[instrument(skip(db, jwt_config, dto))]
    pub async fn login(
        db: &PgPool,
        jwt_config: &JwtConfig,
        dto: LoginRequest,
    ) -> Result<LoginResponse, AppError> {
        let credentials = sqlx::query_as::<_, UserCredentials>(
            r#"SELECT id, email, password, role FROM users WHERE email = $1"#,
        )
        .bind(dto.email.as_str())
        .fetch_optional(db)
        .await?
        .ok_or_else(|| {
            metrics::track_login(false);
            AppError::unauthorized("Invalid email or password")
        })?;

        if !verify_password(&dto.password, &credentials.password)? {
            metrics::track_login(false);
            return Err(AppError::unauthorized("Invalid email or password"));
        }

        let user = Self::get_user(db, credentials.id).await?;

        let access_token = create_access_token(
            credentials.id,
            credentials.email.as_str(),
            &credentials.role,
            jwt_config,
        )?;

        metrics::track_login(true);
        Ok(LoginResponse { access_token, user })
    }

    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, user_id: UserId) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, first_name, last_name, email, role, created_at, updated_at
               FROM users WHERE id = $1"#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        Ok(user)
    }
}

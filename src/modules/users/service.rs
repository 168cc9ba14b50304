use sqlx::PgPool;
use tracing::instrument;

use gradeport_core::AppError;
use gradeport_models::ids::UserId;

use crate::modules::users::model::{CreateUserDto, User};
use crate::utils::password::hash_password;

pub struct UserService;

impl UserService {
    #[instrument(skip(db, dto))]
    pub async fn create_user(db: &PgPool, dto: CreateUserDto) -> Result<User, AppError> {
        let hashed_password = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(
            r#"INSERT INTO users (first_name, last_name, email, password, role)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, first_name, last_name, email, role, created_at, updated_at"#,
        )
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(dto.email.as_str())
        .bind(&hashed_password)
        .bind(dto.role.as_str())
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "A user with email {} already exists",
                        dto.email
                    ));
                }
            }
            AppError::from(e)
        })?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn get_users(db: &PgPool) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            r#"SELECT id, first_name, last_name, email, role, created_at, updated_at
               FROM users
               ORDER BY last_name, first_name"#,
        )
        .fetch_all(db)
        .await?;

        Ok(users)
    }

    #[instrument(skip(db))]
    pub async fn delete_user(db: &PgPool, id: UserId) -> Result<(), AppError> {
        let result = sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("User not found")));
        }

        Ok(())
    }
}

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::password;
use crate::database::models::User;
use crate::services::ServiceError;

/// Registration and credential checks over the users collection
pub struct UserService {
    pool: PgPool,
}

#[derive(Debug, Deserialize)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginUser {
    pub email: String,
    pub password: String,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn register(&self, input: RegisterUser) -> Result<User, ServiceError> {
        if input.name.is_empty() || input.email.is_empty() || input.password.is_empty() {
            return Err(ServiceError::Validation("Please add all fields".to_string()));
        }

        let existing =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = $1")
                .bind(&input.email)
                .fetch_one(&self.pool)
                .await?;
        if existing > 0 {
            return Err(ServiceError::AlreadyExists("User already exists".to_string()));
        }

        let hash = password::hash_password(&input.password)
            .map_err(|_| ServiceError::Validation("Invalid user data".to_string()))?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.email)
        .bind(&hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            // Unique email index closes the check-then-insert race
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                ServiceError::AlreadyExists("User already exists".to_string())
            }
            _ => ServiceError::from(e),
        })?;

        tracing::info!("Registered user {}", user.id);
        Ok(user)
    }

    pub async fn authenticate(&self, input: LoginUser) -> Result<User, ServiceError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(&input.email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        let ok = password::verify_password(&input.password, &user.password)
            .map_err(|_| ServiceError::InvalidCredentials)?;
        if !ok {
            return Err(ServiceError::InvalidCredentials);
        }

        Ok(user)
    }
}

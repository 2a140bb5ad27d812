// POST /api/auth/register and POST /api/auth/login

use axum::{http::StatusCode, response::Json};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims};
use crate::database::manager::DatabaseManager;
use crate::database::models::User;
use crate::error::ApiError;
use crate::handlers::AppJson;
use crate::services::user_service::{LoginUser, RegisterUser};
use crate::services::UserService;

/// Body returned by both register and login: the user's public fields plus
/// a freshly issued bearer token. The client stores the whole object.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub token: String,
}

pub async fn register(
    AppJson(input): AppJson<RegisterUser>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let pool = DatabaseManager::pool().await?;
    let user = UserService::new(pool).register(input).await?;
    let token = issue_token(&user)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            token,
        }),
    ))
}

pub async fn login(AppJson(input): AppJson<LoginUser>) -> Result<Json<AuthResponse>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let user = UserService::new(pool).authenticate(input).await?;
    let token = issue_token(&user)?;

    Ok(Json(AuthResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        token,
    }))
}

fn issue_token(user: &User) -> Result<String, ApiError> {
    let claims = Claims::new(user.id, user.name.clone(), user.email.clone());
    generate_jwt(claims).map_err(|e| {
        tracing::error!("Token issuance failed: {}", e);
        ApiError::internal_server_error("Failed to issue token")
    })
}

// /api/doctors - reads are unrestricted, writes are owner-only

use axum::{extract::Path, http::StatusCode, response::Json, Extension};
use serde_json::{json, Value};

use crate::database::manager::DatabaseManager;
use crate::database::models::Doctor;
use crate::error::ApiError;
use crate::handlers::{parse_id, AppJson};
use crate::middleware::AuthUser;
use crate::services::doctor_service::{CreateDoctor, UpdateDoctor};
use crate::services::DoctorService;

/// POST /api/doctors - create a doctor record owned by the caller
pub async fn create(
    Extension(user): Extension<AuthUser>,
    AppJson(input): AppJson<CreateDoctor>,
) -> Result<(StatusCode, Json<Doctor>), ApiError> {
    let pool = DatabaseManager::pool().await?;
    let doctor = DoctorService::new(pool).create(user.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(doctor)))
}

/// GET /api/doctors - every doctor in the store, regardless of caller
pub async fn list() -> Result<Json<Vec<Doctor>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let doctors = DoctorService::new(pool).list().await?;
    Ok(Json(doctors))
}

/// GET /api/doctors/:id - no ownership check
pub async fn get(Path(id): Path<String>) -> Result<Json<Doctor>, ApiError> {
    let id = parse_id(&id, "Doctor not found")?;
    let pool = DatabaseManager::pool().await?;
    let doctor = DoctorService::new(pool).get(id).await?;
    Ok(Json(doctor))
}

/// PUT /api/doctors/:id - creator only
pub async fn update(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    AppJson(input): AppJson<UpdateDoctor>,
) -> Result<Json<Doctor>, ApiError> {
    let id = parse_id(&id, "Doctor not found")?;
    let pool = DatabaseManager::pool().await?;
    let doctor = DoctorService::new(pool)
        .update(user.user_id, id, input)
        .await?;
    Ok(Json(doctor))
}

/// DELETE /api/doctors/:id - creator only
pub async fn delete(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, "Doctor not found")?;
    let pool = DatabaseManager::pool().await?;
    DoctorService::new(pool).delete(user.user_id, id).await?;
    Ok(Json(json!({ "message": "Doctor removed" })))
}

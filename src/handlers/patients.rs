// /api/patients - ownership-scoped patient CRUD

use axum::{extract::Path, http::StatusCode, response::Json, Extension};
use serde_json::{json, Value};

use crate::database::manager::DatabaseManager;
use crate::database::models::Patient;
use crate::error::ApiError;
use crate::handlers::{parse_id, AppJson};
use crate::middleware::AuthUser;
use crate::services::patient_service::{CreatePatient, UpdatePatient};
use crate::services::PatientService;

/// POST /api/patients - create a patient owned by the caller
pub async fn create(
    Extension(user): Extension<AuthUser>,
    AppJson(input): AppJson<CreatePatient>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let pool = DatabaseManager::pool().await?;
    let patient = PatientService::new(pool).create(user.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(patient)))
}

/// GET /api/patients - list the caller's patients
pub async fn list(Extension(user): Extension<AuthUser>) -> Result<Json<Vec<Patient>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let patients = PatientService::new(pool).list(user.user_id).await?;
    Ok(Json(patients))
}

/// GET /api/patients/:id
pub async fn get(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Patient>, ApiError> {
    let id = parse_id(&id, "Patient not found")?;
    let pool = DatabaseManager::pool().await?;
    let patient = PatientService::new(pool).get(user.user_id, id).await?;
    Ok(Json(patient))
}

/// PUT /api/patients/:id - shallow merge of the provided fields
pub async fn update(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    AppJson(input): AppJson<UpdatePatient>,
) -> Result<Json<Patient>, ApiError> {
    let id = parse_id(&id, "Patient not found")?;
    let pool = DatabaseManager::pool().await?;
    let patient = PatientService::new(pool)
        .update(user.user_id, id, input)
        .await?;
    Ok(Json(patient))
}

/// DELETE /api/patients/:id
pub async fn delete(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, "Patient not found")?;
    let pool = DatabaseManager::pool().await?;
    PatientService::new(pool).delete(user.user_id, id).await?;
    Ok(Json(json!({ "message": "Patient removed" })))
}

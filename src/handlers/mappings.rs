// /api/mappings - patient-doctor assignments

use axum::{extract::Path, http::StatusCode, response::Json, Extension};
use serde_json::{json, Value};

use crate::database::manager::DatabaseManager;
use crate::database::models::{AssignedDoctor, Mapping, MappingWithRefs};
use crate::error::ApiError;
use crate::handlers::{parse_id, AppJson};
use crate::middleware::AuthUser;
use crate::services::mapping_service::CreateMapping;
use crate::services::MappingService;

/// POST /api/mappings - assign a doctor to a patient the caller owns
pub async fn create(
    Extension(user): Extension<AuthUser>,
    AppJson(input): AppJson<CreateMapping>,
) -> Result<(StatusCode, Json<Mapping>), ApiError> {
    let pool = DatabaseManager::pool().await?;
    let mapping = MappingService::new(pool).create(user.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(mapping)))
}

/// GET /api/mappings - the caller's mappings, references expanded
pub async fn list(
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<MappingWithRefs>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let mappings = MappingService::new(pool).list(user.user_id).await?;
    Ok(Json(mappings))
}

/// GET /api/mappings/patient/:patient_id - doctors assigned to one patient
pub async fn doctors_for_patient(
    Extension(user): Extension<AuthUser>,
    Path(patient_id): Path<String>,
) -> Result<Json<Vec<AssignedDoctor>>, ApiError> {
    let patient_id = parse_id(&patient_id, "Patient not found")?;
    let pool = DatabaseManager::pool().await?;
    let doctors = MappingService::new(pool)
        .doctors_for_patient(user.user_id, patient_id)
        .await?;
    Ok(Json(doctors))
}

/// DELETE /api/mappings/delete/:id
pub async fn delete(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, "Mapping not found")?;
    let pool = DatabaseManager::pool().await?;
    MappingService::new(pool).delete(user.user_id, id).await?;
    Ok(Json(json!({ "message": "Mapping removed" })))
}

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{AssignedDoctor, Mapping, MappingJoinRow, MappingWithRefs, Patient};
use crate::services::ServiceError;

/// CRUD over the patient-doctor relationship records. Ownership flows
/// transitively through the referenced patient on create; the store's unique
/// index on (patient, doctor) is the single arbiter for concurrent creates
/// of the same pair.
pub struct MappingService {
    pool: PgPool,
}

#[derive(Debug, Deserialize)]
pub struct CreateMapping {
    pub patient: Uuid,
    pub doctor: Uuid,
    pub notes: Option<String>,
}

impl MappingService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Four-stage validation gate, short-circuiting on the first failure.
    /// Order matters: patient existence, doctor existence, patient ownership,
    /// then pair uniqueness (left to the store's unique index).
    pub async fn create(&self, owner: Uuid, input: CreateMapping) -> Result<Mapping, ServiceError> {
        let patient = sqlx::query_as::<_, Patient>("SELECT * FROM patients WHERE id = $1")
            .bind(input.patient)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Patient not found"))?;

        let doctor_exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM doctors WHERE id = $1")
            .bind(input.doctor)
            .fetch_one(&self.pool)
            .await?;
        if doctor_exists == 0 {
            return Err(ServiceError::not_found("Doctor not found"));
        }

        if patient.user_id != owner {
            return Err(ServiceError::not_owner("Not authorized to map this patient"));
        }

        let mapping = sqlx::query_as::<_, Mapping>(
            r#"
            INSERT INTO mappings (id, patient_id, doctor_id, notes, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.patient)
        .bind(input.doctor)
        .bind(input.notes.unwrap_or_default())
        .bind(owner)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                ServiceError::DuplicateAssignment
            }
            _ => ServiceError::from(e),
        })?;

        Ok(mapping)
    }

    /// Caller-owned mappings with the patient and doctor references expanded
    /// for display (patient name; doctor name and specialization)
    pub async fn list(&self, owner: Uuid) -> Result<Vec<MappingWithRefs>, ServiceError> {
        let rows = sqlx::query_as::<_, MappingJoinRow>(
            r#"
            SELECT m.id, m.patient_id, m.doctor_id, m.notes, m.user_id,
                   m.created_at, m.updated_at,
                   p.name AS patient_name,
                   d.name AS doctor_name,
                   d.specialization AS doctor_specialization
            FROM mappings m
            LEFT JOIN patients p ON p.id = m.patient_id
            LEFT JOIN doctors d ON d.id = m.doctor_id
            WHERE m.user_id = $1
            ORDER BY m.created_at
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(MappingWithRefs::from).collect())
    }

    /// Every doctor mapped to the given patient, each annotated with the
    /// mapping id and notes. The patient must exist and belong to the caller.
    pub async fn doctors_for_patient(
        &self,
        owner: Uuid,
        patient_id: Uuid,
    ) -> Result<Vec<AssignedDoctor>, ServiceError> {
        let patient = sqlx::query_as::<_, Patient>("SELECT * FROM patients WHERE id = $1")
            .bind(patient_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Patient not found"))?;

        if patient.user_id != owner {
            return Err(ServiceError::not_owner(
                "Not authorized to view this patient's doctors",
            ));
        }

        let doctors = sqlx::query_as::<_, AssignedDoctor>(
            r#"
            SELECT d.*, m.id AS mapping_id, m.notes
            FROM mappings m
            JOIN doctors d ON d.id = m.doctor_id
            WHERE m.patient_id = $1
            ORDER BY m.created_at
            "#,
        )
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(doctors)
    }

    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), ServiceError> {
        let mapping = sqlx::query_as::<_, Mapping>("SELECT * FROM mappings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Mapping not found"))?;

        if mapping.user_id != owner {
            return Err(ServiceError::not_owner(
                "Not authorized to delete this mapping",
            ));
        }

        sqlx::query("DELETE FROM mappings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

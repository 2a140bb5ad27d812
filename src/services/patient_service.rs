use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::Patient;
use crate::services::ServiceError;

/// Ownership-scoped CRUD over the patients collection. Every operation runs
/// on behalf of an authenticated owner.
pub struct PatientService {
    pool: PgPool,
}

/// Fields accepted when creating a patient. No field-level validation beyond
/// type shape; malformed-but-typed input (e.g. a negative age) is stored as-is.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatient {
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub contact_number: String,
    pub address: String,
    pub medical_history: Option<String>,
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatient {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub medical_history: Option<String>,
}

impl PatientService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, owner: Uuid, input: CreatePatient) -> Result<Patient, ServiceError> {
        let patient = sqlx::query_as::<_, Patient>(
            r#"
            INSERT INTO patients (id, name, age, gender, contact_number, address, medical_history, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(input.age)
        .bind(&input.gender)
        .bind(&input.contact_number)
        .bind(&input.address)
        .bind(&input.medical_history)
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;

        Ok(patient)
    }

    /// All patients owned by the caller, in creation order
    pub async fn list(&self, owner: Uuid) -> Result<Vec<Patient>, ServiceError> {
        let patients = sqlx::query_as::<_, Patient>(
            "SELECT * FROM patients WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(patients)
    }

    pub async fn get(&self, owner: Uuid, id: Uuid) -> Result<Patient, ServiceError> {
        self.find_owned(owner, id, "access").await
    }

    pub async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        input: UpdatePatient,
    ) -> Result<Patient, ServiceError> {
        self.find_owned(owner, id, "update").await?;

        let patient = sqlx::query_as::<_, Patient>(
            r#"
            UPDATE patients SET
                name = COALESCE($2, name),
                age = COALESCE($3, age),
                gender = COALESCE($4, gender),
                contact_number = COALESCE($5, contact_number),
                address = COALESCE($6, address),
                medical_history = COALESCE($7, medical_history),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.age)
        .bind(&input.gender)
        .bind(&input.contact_number)
        .bind(&input.address)
        .bind(&input.medical_history)
        .fetch_one(&self.pool)
        .await?;

        Ok(patient)
    }

    /// Removes the patient. Dependent mappings are left in place (no cascade).
    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), ServiceError> {
        self.find_owned(owner, id, "delete").await?;

        sqlx::query("DELETE FROM patients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // Existence is checked before ownership, so a non-owner sees 401 rather
    // than 404 (observed behavior, kept as-is)
    async fn find_owned(
        &self,
        owner: Uuid,
        id: Uuid,
        action: &str,
    ) -> Result<Patient, ServiceError> {
        let patient = sqlx::query_as::<_, Patient>("SELECT * FROM patients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Patient not found"))?;

        if patient.user_id != owner {
            return Err(ServiceError::not_owner(format!(
                "Not authorized to {} this patient",
                action
            )));
        }

        Ok(patient)
    }
}

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::Doctor;
use crate::services::ServiceError;

/// CRUD over the doctors collection. Unlike patients, reads are not scoped
/// to the caller: any authenticated user may list or fetch any doctor, but
/// only the creator may update or delete one.
pub struct DoctorService {
    pool: PgPool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDoctor {
    pub name: String,
    pub specialization: String,
    pub experience: f64,
    pub contact_number: String,
    pub email: String,
    pub address: String,
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDoctor {
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub experience: Option<f64>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl DoctorService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, owner: Uuid, input: CreateDoctor) -> Result<Doctor, ServiceError> {
        let doctor = sqlx::query_as::<_, Doctor>(
            r#"
            INSERT INTO doctors (id, name, specialization, experience, contact_number, email, address, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.specialization)
        .bind(input.experience)
        .bind(&input.contact_number)
        .bind(&input.email)
        .bind(&input.address)
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;

        Ok(doctor)
    }

    /// All doctors in the store, regardless of caller
    pub async fn list(&self) -> Result<Vec<Doctor>, ServiceError> {
        let doctors = sqlx::query_as::<_, Doctor>("SELECT * FROM doctors ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;

        Ok(doctors)
    }

    /// No ownership check on single-get either
    pub async fn get(&self, id: Uuid) -> Result<Doctor, ServiceError> {
        sqlx::query_as::<_, Doctor>("SELECT * FROM doctors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Doctor not found"))
    }

    pub async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        input: UpdateDoctor,
    ) -> Result<Doctor, ServiceError> {
        self.find_owned(owner, id, "update").await?;

        let doctor = sqlx::query_as::<_, Doctor>(
            r#"
            UPDATE doctors SET
                name = COALESCE($2, name),
                specialization = COALESCE($3, specialization),
                experience = COALESCE($4, experience),
                contact_number = COALESCE($5, contact_number),
                email = COALESCE($6, email),
                address = COALESCE($7, address),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.specialization)
        .bind(input.experience)
        .bind(&input.contact_number)
        .bind(&input.email)
        .bind(&input.address)
        .fetch_one(&self.pool)
        .await?;

        Ok(doctor)
    }

    /// Removes the doctor. Dependent mappings are left in place (no cascade).
    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), ServiceError> {
        self.find_owned(owner, id, "delete").await?;

        sqlx::query("DELETE FROM doctors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_owned(&self, owner: Uuid, id: Uuid, action: &str) -> Result<Doctor, ServiceError> {
        let doctor = self.get(id).await?;

        if doctor.user_id != owner {
            return Err(ServiceError::not_owner(format!(
                "Not authorized to {} this doctor",
                action
            )));
        }

        Ok(doctor)
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Doctor;

/// A patient-doctor assignment. The (patient, doctor) pair is unique
/// system-wide, enforced by the store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Mapping {
    pub id: Uuid,
    #[serde(rename = "patient")]
    pub patient_id: Uuid,
    #[serde(rename = "doctor")]
    pub doctor_id: Uuid,
    pub notes: String,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Patient reference expanded into a mapping listing (name only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRef {
    pub id: Uuid,
    pub name: String,
}

/// Doctor reference expanded into a mapping listing (name and specialization)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorRef {
    pub id: Uuid,
    pub name: String,
    pub specialization: String,
}

/// A mapping with its references expanded for display. References left
/// dangling by a deleted patient/doctor resolve to null.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingWithRefs {
    pub id: Uuid,
    pub patient: Option<PatientRef>,
    pub doctor: Option<DoctorRef>,
    pub notes: String,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Flat join row backing [`MappingWithRefs`]
#[derive(Debug, FromRow)]
pub struct MappingJoinRow {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub notes: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub patient_name: Option<String>,
    pub doctor_name: Option<String>,
    pub doctor_specialization: Option<String>,
}

impl From<MappingJoinRow> for MappingWithRefs {
    fn from(row: MappingJoinRow) -> Self {
        let patient = row.patient_name.map(|name| PatientRef {
            id: row.patient_id,
            name,
        });
        let doctor = match (row.doctor_name, row.doctor_specialization) {
            (Some(name), Some(specialization)) => Some(DoctorRef {
                id: row.doctor_id,
                name,
                specialization,
            }),
            _ => None,
        };

        Self {
            id: row.id,
            patient,
            doctor,
            notes: row.notes,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Read-model projection for "doctors assigned to a patient": the doctor's
/// fields flattened, annotated with the mapping id and notes.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AssignedDoctor {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub doctor: Doctor,
    pub mapping_id: Uuid,
    pub notes: String,
}

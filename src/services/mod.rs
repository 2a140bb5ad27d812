use thiserror::Error;

pub mod doctor_service;
pub mod mapping_service;
pub mod patient_service;
pub mod user_service;

pub use doctor_service::DoctorService;
pub use mapping_service::MappingService;
pub use patient_service::PatientService;
pub use user_service::UserService;

/// Shared failure taxonomy for the entity and relationship services.
/// Converted to HTTP errors at the handler boundary.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    // Authenticated, but not the owner of the record
    #[error("{0}")]
    NotOwner(String),

    #[error("This doctor is already assigned to this patient")]
    DuplicateAssignment,

    #[error("{0}")]
    AlreadyExists(String),

    #[error("{0}")]
    Validation(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl ServiceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    pub fn not_owner(message: impl Into<String>) -> Self {
        ServiceError::NotOwner(message.into())
    }
}

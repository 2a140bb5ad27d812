// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// HTTP API error with appropriate status codes and the uniform
/// `{"message": ..., "stack": ...}` body every failing endpoint returns.
///
/// `stack` carries diagnostic detail (the underlying error chain) and is
/// forced to `null` when running in production.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request (validation, duplicate email)
    BadRequest(String),

    // 400 Bad Request, fixed message for the mapping uniqueness violation
    DuplicateAssignment,

    // 401 Unauthorized (missing/invalid credential, or caller is not the owner)
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError { message: String, detail: Option<String> },
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::DuplicateAssignment => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::DuplicateAssignment => "This doctor is already assigned to this patient",
            ApiError::Unauthorized(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::InternalServerError { message, .. } => message,
        }
    }

    /// Diagnostic detail for the `stack` field. Suppressed in production.
    pub fn stack(&self) -> Option<String> {
        if crate::is_production!() {
            return None;
        }

        match self {
            ApiError::InternalServerError { detail: Some(d), .. } => Some(d.clone()),
            other => Some(other.message().to_string()),
        }
    }

    /// Convert to the uniform JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "message": self.message(),
            "stack": self.stack(),
        })
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError {
            message: message.into(),
            detail: None,
        }
    }
}

// Convert other error types to ApiError
impl From<crate::services::ServiceError> for ApiError {
    fn from(err: crate::services::ServiceError) -> Self {
        use crate::services::ServiceError;

        match err {
            ServiceError::NotFound(msg) => ApiError::NotFound(msg),
            ServiceError::NotOwner(msg) => ApiError::Unauthorized(msg),
            ServiceError::DuplicateAssignment => ApiError::DuplicateAssignment,
            ServiceError::AlreadyExists(msg) => ApiError::BadRequest(msg),
            ServiceError::Validation(msg) => ApiError::BadRequest(msg),
            ServiceError::InvalidCredentials => {
                ApiError::unauthorized("Invalid email or password")
            }
            ServiceError::Database(e) => {
                // Never expose raw store errors to clients
                tracing::error!("Database error: {}", e);
                ApiError::InternalServerError {
                    message: "An error occurred while processing your request".to_string(),
                    detail: Some(e.to_string()),
                }
            }
        }
    }
}

impl From<axum::extract::rejection::JsonRejection> for ApiError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<crate::database::manager::DatabaseError> for ApiError {
    fn from(err: crate::database::manager::DatabaseError) -> Self {
        tracing::error!("Database manager error: {}", err);
        ApiError::InternalServerError {
            message: "An error occurred while processing your request".to_string(),
            detail: Some(err.to_string()),
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::bad_request("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::DuplicateAssignment.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::unauthorized("nope").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::not_found("missing").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::internal_server_error("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_duplicate_assignment_message_is_fixed() {
        assert_eq!(
            ApiError::DuplicateAssignment.message(),
            "This doctor is already assigned to this patient"
        );
    }

    #[test]
    fn test_error_body_shape() {
        let body = ApiError::not_found("Patient not found").to_json();
        let obj = body.as_object().expect("body is an object");
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["message"], "Patient not found");
        assert!(obj.contains_key("stack"));
    }

    #[test]
    fn test_service_error_conversion() {
        use crate::services::ServiceError;

        let err: ApiError = ServiceError::NotFound("Doctor not found".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err: ApiError = ServiceError::DuplicateAssignment.into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.message(),
            "This doctor is already assigned to this patient"
        );

        let err: ApiError =
            ServiceError::NotOwner("Not authorized to access this patient".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }
}

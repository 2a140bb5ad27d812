pub mod auth;
pub mod doctors;
pub mod mappings;
pub mod patients;

use axum::extract::FromRequest;
use uuid::Uuid;

use crate::error::ApiError;

/// JSON extractor whose rejection uses the uniform error body instead of
/// axum's plain-text default
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// Parse a path id. A syntactically invalid id is indistinguishable from a
/// missing document: both yield the same 404.
pub(crate) fn parse_id(raw: &str, not_found: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(not_found))
}

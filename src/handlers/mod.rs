pub mod categories;
pub mod health;
pub mod products;
pub mod users;

use axum::extract::rejection::{JsonRejection, QueryRejection};

use crate::error::ApiError;

pub const MAX_ID_LENGTH: usize = 64;

/// Path identifiers: 1-64 chars of ASCII letters, digits, `-` or `_`
pub fn validate_id(id: &str) -> Result<&str, ApiError> {
    let valid = !id.is_empty()
        && id.len() <= MAX_ID_LENGTH
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(id)
    } else {
        Err(ApiError::bad_request("Invalid ID format"))
    }
}

/// Replace the framework's rejection text with a stable client message
pub fn body_rejection(rejection: JsonRejection) -> ApiError {
    tracing::debug!("Rejected request body: {}", rejection.body_text());
    ApiError::invalid_json("Invalid request body")
}

pub fn query_rejection(rejection: QueryRejection) -> ApiError {
    tracing::debug!("Rejected query string: {}", rejection.body_text());
    ApiError::bad_request("Invalid query parameters")
}

/// Fallback for unmatched routes
pub async fn not_found() -> ApiError {
    ApiError::not_found("endpoint not found")
}

/// Fallback for a known path hit with an unsupported method
pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed("method not allowed")
}

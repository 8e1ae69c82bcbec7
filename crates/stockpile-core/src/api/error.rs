use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized - please log in again")]
    Unauthorized,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// The backend wraps failures as `{"error": "..."}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    /// Pull the backend's error message out of the body when it has one,
    /// truncating raw bodies so logs stay readable.
    fn message_from_body(body: &str) -> String {
        if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
            return parsed.error;
        }
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..MAX_ERROR_BODY_LENGTH],
                body.len()
            )
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = Self::message_from_body(body);
        match status.as_u16() {
            400 => ApiError::BadRequest(message),
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(message),
            404 => ApiError::NotFound(message),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(message),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_extracts_backend_message() {
        let status = reqwest::StatusCode::BAD_REQUEST;
        let err = ApiError::from_status(status, r#"{"error": "Fill in name and inventory number"}"#);
        match err {
            ApiError::BadRequest(msg) => assert_eq!(msg, "Fill in name and inventory number"),
            other => panic!("unexpected error variant: {other:?}"),
        }
    }

    #[test]
    fn test_from_status_plain_body() {
        let status = reqwest::StatusCode::INTERNAL_SERVER_ERROR;
        let err = ApiError::from_status(status, "database connection refused");
        match err {
            ApiError::ServerError(msg) => assert_eq!(msg, "database connection refused"),
            other => panic!("unexpected error variant: {other:?}"),
        }
    }
}

// Domain error types - Secure error handling with no information disclosure

use thiserror::Error;

use crate::store::StoreError;

/// Main error type for the crew server
#[derive(Error, Debug)]
pub enum CrewError {
    /// Body is not well-formed JSON of the expected shape (HTTP 400)
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Decoded input failed validation (HTTP 400)
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Missing or incorrect bearer token (HTTP 401)
    #[error("Unauthorized")]
    Unauthorized,

    /// Resource with the same unique key already exists (HTTP 409)
    #[error("Duplicate resource: {0}")]
    DuplicateResource(String),

    /// Any lower-level storage error (HTTP 500)
    #[error("Storage failure: {0}")]
    StorageFailure(String),

    /// Configuration error (HTTP 500)
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl CrewError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CrewError::MalformedInput(_) => 400,
            CrewError::ValidationFailed(_) => 400,
            CrewError::Unauthorized => 401,
            CrewError::DuplicateResource(_) => 409,
            CrewError::StorageFailure(_) => 500,
            CrewError::ConfigurationError(_) => 500,
        }
    }

    /// Get user-friendly error message (no sensitive information)
    pub fn user_message(&self) -> String {
        match self {
            CrewError::MalformedInput(_) => "Invalid request body".to_string(),
            CrewError::ValidationFailed(reason) => reason.clone(),
            CrewError::Unauthorized => "Unauthorized".to_string(),
            CrewError::DuplicateResource(_) => "User already exists".to_string(),
            CrewError::StorageFailure(_) => "Internal error".to_string(),
            CrewError::ConfigurationError(_) => "Internal error".to_string(),
        }
    }
}

impl From<StoreError> for CrewError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateName(name) => CrewError::DuplicateResource(name),
            StoreError::Failure(detail) => CrewError::StorageFailure(detail),
        }
    }
}

// Response types for API endpoints

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::core::errors::CrewError;

/// Body returned by `GET /health`
pub const HEALTH_BODY: &str = "OK";

/// Confirmation body for a successful registration
pub fn user_created_body(name: &str) -> String {
    format!("User created: {}", name)
}

/// API error type that converts domain errors to HTTP responses
///
/// The body is a short plain-text message. Internal detail carried by the
/// underlying [`CrewError`] never reaches the client.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, message: String) -> Self {
        Self { status, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

impl From<CrewError> for ApiError {
    fn from(err: CrewError) -> Self {
        let status = StatusCode::from_u16(err.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::new(status, err.user_message())
    }
}

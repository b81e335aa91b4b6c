// Request handlers for API endpoints

use axum::{body::Bytes, extract::State, http::StatusCode};
use tracing::{debug, error, info, warn};

use crate::api::responses::{user_created_body, ApiError, HEALTH_BODY};
use crate::api::AppState;
use crate::core::errors::CrewError;
use crate::core::models::RegisterRequest;

/// Liveness probe
///
/// GET /health
///
/// Unauthenticated, always 200 `OK`.
pub async fn health_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, HEALTH_BODY)
}

/// Register a new crew member
///
/// POST /register
///
/// Request flow:
/// 1. Decode `{"name": string}` from the body (Content-Type is not required)
/// 2. Reject empty, whitespace-only and over-long names
/// 3. Insert through the user store; duplicates surface as 409
pub async fn register_handler(
    State(app_state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, String), ApiError> {
    let request: RegisterRequest = serde_json::from_slice(&body).map_err(|e| {
        error!(error = %e, "Failed to decode registration body");
        CrewError::MalformedInput(e.to_string())
    })?;

    if let Err(e) = request.validate() {
        warn!(reason = %e, "Rejected registration");
        return Err(e.into());
    }

    let user = app_state
        .user_store
        .create_user(&request.name)
        .await
        .map_err(|e| {
            let err = CrewError::from(e);
            match &err {
                CrewError::DuplicateResource(_) => {
                    warn!(name = %request.name, "Registration for existing user")
                }
                _ => error!(error = %err, "Failed to create user"),
            }
            err
        })?;

    info!(user_id = user.id, name = %user.name, "User registered");

    Ok((StatusCode::CREATED, user_created_body(&user.name)))
}

/// Placeholder login endpoint
///
/// POST /login
///
/// Sits behind the API key check and answers 200 with an empty body. The
/// request body is not read.
pub async fn login_handler() -> StatusCode {
    debug!("Login requested; no login flow is configured");
    StatusCode::OK
}

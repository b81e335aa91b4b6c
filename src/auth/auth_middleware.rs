// Axum authentication middleware

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::api::responses::ApiError;
use crate::auth::api_key::{authorize, ApiKey, AuthDecision};
use crate::auth::audit_logger::{log_auth_event, AuthEvent};
use crate::core::errors::CrewError;

/// Authentication state shared by every protected route
#[derive(Debug, Clone)]
pub struct AuthState {
    pub api_key: Arc<ApiKey>,
}

impl AuthState {
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key: Arc::new(api_key),
        }
    }
}

/// Authentication middleware function
///
/// Reads the bearer token from the `Authorization` header and compares it to
/// the shared API key. On rejection the inner handler is never called and the
/// caller gets 401 `Unauthorized`. Allowed requests pass through untouched.
pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorization = extract_authorization(request.headers());
    let decision = authorize(&auth_state.api_key, authorization.as_deref());

    let remote_addr = extract_remote_addr(&request);
    let path = request.uri().path().to_string();

    match decision {
        AuthDecision::Allow => {
            log_auth_event(&AuthEvent::AuthSuccess, remote_addr.as_deref(), &path);
            Ok(next.run(request).await)
        }
        AuthDecision::Reject => {
            let reason = if authorization.is_none() {
                "Missing API key"
            } else {
                "Invalid API key"
            };
            log_auth_event(
                &AuthEvent::AuthFailure { reason: reason.to_string() },
                remote_addr.as_deref(),
                &path,
            );
            Err(CrewError::Unauthorized.into())
        }
    }
}

/// Put every route of `router` behind the API key check
///
/// Applied as a route layer, so unmatched paths still fall through to 404
/// rather than 401.
pub fn require_api_key<S>(router: Router<S>, auth_state: Arc<AuthState>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(axum::middleware::from_fn_with_state(
        auth_state,
        auth_middleware,
    ))
}

/// Extract the raw `Authorization` header value
///
/// Values that are not visible ASCII are treated as absent.
fn extract_authorization(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

/// Extract the caller's address
///
/// Prefers the peer address recorded by the server, then `X-Forwarded-For`
/// and `X-Real-IP` (for proxied requests).
fn extract_remote_addr(request: &Request) -> Option<String> {
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return Some(addr.to_string());
    }

    request
        .headers()
        .get("X-Forwarded-For")
        .or_else(|| request.headers().get("X-Real-IP"))
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

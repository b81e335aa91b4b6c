// Security event logging

use tracing::{debug, warn};

/// Authentication event type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    AuthSuccess,
    AuthFailure { reason: String },
}

/// Log an authentication event with the caller's address and requested path
///
/// Failures go out at WARN for operational visibility. Nothing is counted or
/// throttled.
pub fn log_auth_event(event: &AuthEvent, remote_addr: Option<&str>, path: &str) {
    match event {
        AuthEvent::AuthSuccess => {
            debug!(
                remote_addr = remote_addr.unwrap_or("unknown"),
                path = %path,
                "Authentication successful"
            );
        }
        AuthEvent::AuthFailure { reason } => {
            warn!(
                remote_addr = remote_addr.unwrap_or("unknown"),
                path = %path,
                reason = %reason,
                "Authentication failed"
            );
        }
    }
}

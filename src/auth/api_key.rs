// Shared API key and bearer token checks

use secrecy::{ExposeSecret, Secret};
use std::fmt;
use subtle::ConstantTimeEq;

/// Scheme prefix stripped from the `Authorization` header
pub const BEARER_PREFIX: &str = "Bearer ";

/// The crew's shared API key
///
/// Uses `secrecy::Secret` to prevent accidental logging of the key. The key is
/// compared byte-for-byte against presented tokens; it is never hashed.
#[derive(Clone)]
pub struct ApiKey(Secret<String>);

impl ApiKey {
    /// Create a new ApiKey from a string
    pub fn new(api_key: &str) -> Self {
        Self(Secret::new(api_key.to_string()))
    }

    /// True when no key is configured; every protected request is then rejected
    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }

    /// Check a presented token against the configured key
    ///
    /// An empty token never matches, even against an empty key. The comparison
    /// is constant-time over the token bytes.
    pub fn verify(&self, token: &str) -> bool {
        let expected = self.0.expose_secret();
        if token.is_empty() || expected.is_empty() {
            return false;
        }
        expected.as_bytes().ct_eq(token.as_bytes()).into()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("key", &"<REDACTED>")
            .finish()
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<REDACTED>")
    }
}

/// Outcome of checking a request's credential
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    Allow,
    Reject,
}

/// Strip an optional `Bearer ` prefix from an `Authorization` header value
///
/// A value without the prefix is returned unchanged and treated as the
/// literal token.
pub fn extract_bearer(header_value: &str) -> &str {
    header_value
        .strip_prefix(BEARER_PREFIX)
        .unwrap_or(header_value)
}

/// Decide whether a request with this `Authorization` header may proceed
pub fn authorize(api_key: &ApiKey, authorization: Option<&str>) -> AuthDecision {
    let token = authorization.map(extract_bearer).unwrap_or("");
    if api_key.verify(token) {
        AuthDecision::Allow
    } else {
        AuthDecision::Reject
    }
}

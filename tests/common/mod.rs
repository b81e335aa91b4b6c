// Common test utilities and helpers for all test modules

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response},
    Router,
};
use crew::api::{create_router, AppState};
use crew::auth::auth_middleware::AuthState;
use crew::config::Config;
use crew::core::models::User;
use crew::store::{MemoryUserStore, StoreError, UserStore};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const TEST_API_KEY: &str = "crew-test-key";

/// Mock UserStore that fails every call
///
/// `duplicate` switches `create_user` from a generic failure to a duplicate
/// outcome. `create_calls` counts how often the handler reached the store.
pub struct MockUserStore {
    pub duplicate: bool,
    pub create_calls: AtomicUsize,
}

impl Default for MockUserStore {
    fn default() -> Self {
        Self {
            duplicate: false,
            create_calls: AtomicUsize::new(0),
        }
    }
}

impl MockUserStore {
    pub fn calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl UserStore for MockUserStore {
    async fn create_user(&self, name: &str) -> Result<User, StoreError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.duplicate {
            return Err(StoreError::DuplicateName(name.to_string()));
        }
        Err(StoreError::Failure(
            "error returned from database: (code: 10) disk I/O error at /var/lib/crew/crew.db"
                .to_string(),
        ))
    }

    async fn find_user(&self, _name: &str) -> Result<Option<User>, StoreError> {
        Ok(None)
    }

    async fn count_users(&self) -> Result<u64, StoreError> {
        Ok(0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Failure("unreachable".to_string()))
    }
}

/// Build the full application router around `store` with the given secret
pub fn build_app_with_key(store: Arc<dyn UserStore + Send + Sync>, api_key: &str) -> Router {
    let config = Config::test_config(api_key);
    let auth_state = Arc::new(AuthState::new(config.api_key.clone()));
    let app_state = AppState::new(store, config);
    create_router(&app_state, auth_state).with_state(app_state)
}

/// Build the full application router around `store` with [`TEST_API_KEY`]
pub fn build_app(store: Arc<dyn UserStore + Send + Sync>) -> Router {
    build_app_with_key(store, TEST_API_KEY)
}

/// Router backed by a fresh in-memory store
pub fn memory_app() -> (Router, Arc<MemoryUserStore>) {
    let store = Arc::new(MemoryUserStore::new());
    (build_app(store.clone()), store)
}

/// `POST path` with an optional `Authorization` header value and a JSON body
pub fn post(path: &str, authorization: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }

    builder.body(Body::from(body.to_string())).unwrap()
}

/// `POST /register` authenticated with [`TEST_API_KEY`]
pub fn register(name_json: &str) -> Request<Body> {
    post(
        "/register",
        Some(&format!("Bearer {}", TEST_API_KEY)),
        name_json,
    )
}

/// JSON body for a registration of `name`
pub fn name_body(name: &str) -> String {
    serde_json::json!({ "name": name }).to_string()
}

/// Collect a response body as UTF-8
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

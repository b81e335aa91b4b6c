// Axum web server layer

use axum::{error_handling::HandleErrorLayer, routing::{get, post}, Router};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;

pub mod handlers;
pub mod middleware;
pub mod responses;

use crate::auth::auth_middleware::{require_api_key, AuthState};
use crate::store::UserStore;

pub use crate::config::Config;

/// Application state containing all shared dependencies
///
/// Built once at startup and cloned into every request. Nothing in here is
/// mutated after construction; the store handles its own synchronization.
#[derive(Clone)]
pub struct AppState {
    pub user_store: Arc<dyn UserStore + Send + Sync>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(user_store: Arc<dyn UserStore + Send + Sync>, config: Config) -> Self {
        Self {
            user_store,
            config: Arc::new(config),
        }
    }
}

/// Create the Axum router with all routes and middleware
///
/// Middleware stack (outermost to innermost):
/// - Request timeout (tower::timeout) - configurable, 408 on expiry
/// - Body size limit (tower-http::limit) - configurable, 413 when exceeded
/// - Tracing (tower-http::trace)
/// - Auth middleware - bearer token check, `/register` and `/login` only
///
/// `/health` bypasses auth.
pub fn create_router(app_state: &AppState, auth_state: Arc<AuthState>) -> Router<AppState> {
    let protected = Router::new()
        .route("/register", post(handlers::register_handler))
        .route("/login", post(handlers::login_handler));

    let router = Router::new()
        .route("/health", get(handlers::health_handler))
        .merge(require_api_key(protected, auth_state))
        .layer(middleware::tracing_layer())
        .layer(middleware::body_size_limit_layer(
            app_state.config.body_size_limit_bytes,
        ));

    let timeout_secs = app_state.config.request_timeout_secs;
    router.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(middleware::handle_timeout_error))
            .timeout(Duration::from_secs(timeout_secs)),
    )
}

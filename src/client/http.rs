// HTTP client for a crew server

use reqwest::{Client, StatusCode};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};
use url::Url;

use crate::client::config::CrewConfig;

/// Errors talking to a crew server
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid server URL '{0}'")]
    InvalidUrl(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Could not reach server: {0}")]
    Transport(String),

    #[error("Server rejected the API key")]
    Unauthorized,

    #[error("Server rejected the request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Server error: HTTP {status} - {body}")]
    Server { status: u16, body: String },
}

/// Client for the crew server's public and protected endpoints
pub struct CrewClient {
    http_client: Client,
    base_url: Url,
    api_key: String,
    timeout: Duration,
}

impl CrewClient {
    /// Create a client for the server described by `config`
    pub fn new(config: &CrewConfig, timeout_secs: u64) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(&config.server_url)
            .map_err(|_| ClientError::InvalidUrl(config.server_url.clone()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(config.server_url.clone()));
        }

        // Url::join replaces the last path segment unless the path ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let timeout = Duration::from_secs(timeout_secs);
        let http_client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(2)) // Fail fast on connection
            .build()
            .map_err(|e| ClientError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url,
            api_key: config.server_api_key.clone(),
            timeout,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|_| ClientError::InvalidUrl(format!("{}{}", self.base_url, path)))
    }

    fn map_send_error(&self, e: reqwest::Error) -> ClientError {
        if e.is_timeout() {
            ClientError::Timeout(self.timeout.as_secs())
        } else {
            ClientError::Transport(e.to_string())
        }
    }

    /// Check that the server is up
    ///
    /// Succeeds only on 200 with body `OK`.
    pub async fn health(&self) -> Result<(), ClientError> {
        let url = self.endpoint("health")?;
        debug!(url = %url, "Checking server health");

        let response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status == StatusCode::OK && body == "OK" {
            Ok(())
        } else {
            error!(status = %status, url = %url, "Health check failed");
            Err(ClientError::Server {
                status: status.as_u16(),
                body,
            })
        }
    }

    /// Register `name` with the crew
    ///
    /// Returns the server's confirmation text.
    pub async fn register(&self, name: &str) -> Result<String, ClientError> {
        let url = self.endpoint("register")?;
        debug!(url = %url, "Registering user");

        let response = self
            .http_client
            .post(url.clone())
            .bearer_auth(&self.api_key)
            .json(&json!({ "name": name }))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        match status {
            StatusCode::CREATED => {
                info!(url = %url, "Registration accepted");
                Ok(body)
            }
            StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
            StatusCode::BAD_REQUEST => Err(ClientError::BadRequest(body)),
            StatusCode::CONFLICT => Err(ClientError::Conflict(body)),
            other => {
                error!(status = %other, url = %url, "Registration failed");
                Err(ClientError::Server {
                    status: other.as_u16(),
                    body,
                })
            }
        }
    }
}

// Client against a live server on a loopback port

use crew::client::{ClientError, CrewClient, CrewConfig};
use crew::store::{MemoryUserStore, UserStore};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::common::*;

/// Serve the app on an ephemeral port and return its base URL
async fn spawn_server(store: Arc<MemoryUserStore>) -> String {
    let app = build_app(store);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    format!("http://{}", addr)
}

fn client(url: &str, api_key: &str) -> CrewClient {
    let config = CrewConfig {
        server_url: url.to_string(),
        server_api_key: api_key.to_string(),
    };
    CrewClient::new(&config, 5).unwrap()
}

#[tokio::test]
async fn test_client_health_and_register() {
    let store = Arc::new(MemoryUserStore::new());
    let url = spawn_server(store.clone()).await;
    let client = client(&url, TEST_API_KEY);

    client.health().await.unwrap();

    let confirmation = client.register("alice").await.unwrap();
    assert_eq!(confirmation, "User created: alice");
    assert_eq!(store.count_users().await.unwrap(), 1);

    let err = client.register("alice").await.unwrap_err();
    assert!(matches!(err, ClientError::Conflict(_)));

    let err = client.register(" ").await.unwrap_err();
    assert!(matches!(err, ClientError::BadRequest(ref body) if body == "Name is required"));
}

#[tokio::test]
async fn test_client_with_wrong_key() {
    let store = Arc::new(MemoryUserStore::new());
    let url = spawn_server(store.clone()).await;
    let client = client(&url, "not-the-key");

    client.health().await.unwrap();

    let err = client.register("mallory").await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));
    assert_eq!(store.count_users().await.unwrap(), 0);
}

#[tokio::test]
async fn test_client_unreachable_server() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client(&format!("http://{}", addr), TEST_API_KEY);
    let err = client.health().await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_) | ClientError::Timeout(_)));
}

// End-to-end registration flow against the SQLite store

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use crew::store::{SqliteUserStore, UserStore};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::common::*;

async fn sqlite_app() -> (Router, Arc<SqliteUserStore>, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(
        SqliteUserStore::connect(&dir.path().join("crew.db"))
            .await
            .unwrap(),
    );
    (build_app(store.clone()), store, dir)
}

#[tokio::test]
async fn test_register_without_authorization_is_unauthorized() {
    let (app, store, _dir) = sqlite_app().await;

    let response = app
        .oneshot(post("/register", None, &name_body("alice")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(store.count_users().await.unwrap(), 0);
}

#[tokio::test]
async fn test_register_with_wrong_token_is_unauthorized() {
    let (app, store, _dir) = sqlite_app().await;

    let response = app
        .oneshot(post("/register", Some("Bearer wrong"), &name_body("alice")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_string(response).await, "Unauthorized");
    assert_eq!(store.count_users().await.unwrap(), 0);
}

#[tokio::test]
async fn test_register_then_duplicate() {
    let (app, store, _dir) = sqlite_app().await;

    let response = app
        .clone()
        .oneshot(register(r#"{"name":"alice"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_string(response).await, "User created: alice");
    assert_eq!(store.count_users().await.unwrap(), 1);
    assert!(store.find_user("alice").await.unwrap().is_some());

    let response = app.oneshot(register(r#"{"name":"alice"}"#)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(store.count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn test_health_without_authorization() {
    let (app, _store, _dir) = sqlite_app().await;

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "OK");
}

#[tokio::test]
async fn test_distinct_names_get_distinct_ids() {
    let (app, store, _dir) = sqlite_app().await;

    for name in ["alice", "bob"] {
        let response = app.clone().oneshot(register(&name_body(name))).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let alice = store.find_user("alice").await.unwrap().unwrap();
    let bob = store.find_user("bob").await.unwrap().unwrap();
    assert_ne!(alice.id, bob.id);
}

#[tokio::test]
async fn test_stored_name_matches_submitted_exactly() {
    let (app, store, _dir) = sqlite_app().await;

    for name in ["  Padded  ", "MiXeD Case", "名前", "o'brien; DROP TABLE users"] {
        let response = app.clone().oneshot(register(&name_body(name))).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED, "name {:?}", name);

        let stored = store.find_user(name).await.unwrap().unwrap();
        assert_eq!(stored.name, name);
    }

    assert!(store.find_user("Padded").await.unwrap().is_none());
    assert!(store.find_user("mixed case").await.unwrap().is_none());
    assert_eq!(store.count_users().await.unwrap(), 4);
}

#[tokio::test]
async fn test_concurrent_duplicate_registrations_single_winner() {
    let (app, store, _dir) = sqlite_app().await;

    let handles: Vec<_> = (0..12)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move {
                app.oneshot(register(&name_body("racer")))
                    .await
                    .unwrap()
                    .status()
            })
        })
        .collect();

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::CREATED => created += 1,
            StatusCode::CONFLICT => conflicts += 1,
            other => panic!("unexpected status {}", other),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(conflicts, 11);
    assert_eq!(store.count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn test_rejected_requests_leave_store_untouched() {
    let (app, store, _dir) = sqlite_app().await;

    let attempts = vec![
        post("/register", None, &name_body("ghost")),
        post("/register", Some("Bearer nope"), &name_body("ghost")),
        register("{broken"),
        register(&name_body("")),
        register(&name_body(&"z".repeat(256))),
    ];

    for request in attempts {
        let response = app.clone().oneshot(request).await.unwrap();
        assert!(response.status().is_client_error());
    }

    assert_eq!(store.count_users().await.unwrap(), 0);
}

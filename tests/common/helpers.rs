//! Shared helper functions for integration tests

use std::sync::Arc;

use axum::{
    body::Body,
    http::{self, Request, StatusCode},
    Router,
};
use forum_api::{
    create_router,
    models::{Category, Post, Topic, UserRead},
    security::Argon2PasswordHasher,
};
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::SqlitePool;
use tower::ServiceExt;

pub async fn create_test_app(pool: SqlitePool) -> Router {
    create_router(pool, Arc::new(Argon2PasswordHasher))
}

/// POSTs a JSON body and returns the status plus collected response bytes.
pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> (StatusCode, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(http::Method::POST)
                .uri(uri)
                .header(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, bytes)
}

/// PATCHes a JSON body and returns the status plus collected response bytes.
pub async fn patch_json(app: &Router, uri: &str, body: serde_json::Value) -> (StatusCode, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(http::Method::PATCH)
                .uri(uri)
                .header(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, bytes)
}

/// Sends a bodyless request (GET or DELETE) and collects the response.
pub async fn send_empty(
    app: &Router,
    method: http::Method,
    uri: &str,
) -> (StatusCode, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, bytes)
}

pub async fn create_test_category(app: &Router, name: &str) -> Category {
    let (status, body) = post_json(
        app,
        "/categories",
        json!({ "name": name, "description": "..." }),
    )
    .await;
    assert_eq!(
        status,
        StatusCode::CREATED,
        "Failed to create category: {}",
        String::from_utf8_lossy(&body)
    );
    serde_json::from_slice(&body).expect("Failed to deserialize category in helper")
}

pub async fn create_test_user(app: &Router, display_name: &str) -> UserRead {
    let (status, body) = post_json(
        app,
        "/users",
        json!({
            "display_name": display_name,
            "email": format!("{display_name}@example.com"),
            "password": "correct horse battery staple",
        }),
    )
    .await;
    assert_eq!(
        status,
        StatusCode::CREATED,
        "Failed to create user: {}",
        String::from_utf8_lossy(&body)
    );
    serde_json::from_slice(&body).expect("Failed to deserialize user in helper")
}

pub async fn create_test_topic(
    app: &Router,
    name: &str,
    author_user_id: i64,
    category_id: i64,
) -> Topic {
    let (status, body) = post_json(
        app,
        "/topics",
        json!({
            "name": name,
            "author_user_id": author_user_id,
            "category_id": category_id,
        }),
    )
    .await;
    assert_eq!(
        status,
        StatusCode::CREATED,
        "Failed to create topic: {}",
        String::from_utf8_lossy(&body)
    );
    serde_json::from_slice(&body).expect("Failed to deserialize topic in helper")
}

pub async fn create_test_post(
    app: &Router,
    content: &str,
    topic_id: i64,
    parent_post_id: Option<i64>,
    author_user_id: i64,
) -> Post {
    let (status, body) = post_json(
        app,
        "/posts",
        json!({
            "content": content,
            "topic_id": topic_id,
            "parent_post_id": parent_post_id,
            "author_user_id": author_user_id,
        }),
    )
    .await;
    assert_eq!(
        status,
        StatusCode::CREATED,
        "Failed to create post: {}",
        String::from_utf8_lossy(&body)
    );
    serde_json::from_slice(&body).expect("Failed to deserialize post in helper")
}

// Declare the common module
mod common;

use axum::http::{self, StatusCode};
use forum_api::models::Topic;
use serde_json::json;
use sqlx::SqlitePool;

use common::helpers::{
    create_test_app, create_test_category, create_test_post, create_test_topic, create_test_user,
    patch_json, post_json, send_empty,
};

#[sqlx::test]
async fn test_create_topic_success(pool: SqlitePool) {
    let app = create_test_app(pool.clone()).await;
    let category = create_test_category(&app, "General").await;
    let user = create_test_user(&app, "alice").await;

    let (status, body) = post_json(
        &app,
        "/topics",
        json!({
            "name": "Hello",
            "author_user_id": user.id,
            "category_id": category.id,
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let topic: Topic = serde_json::from_slice(&body).unwrap();
    assert_eq!(topic.name, "Hello");
    assert_eq!(topic.author_user_id, user.id);
    assert_eq!(topic.category_id, category.id);
    assert!(!topic.is_pinned);
    assert!(topic.created_on <= chrono::Utc::now());

    let saved = sqlx::query_as::<_, Topic>("SELECT * FROM topics WHERE id = $1")
        .bind(topic.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(saved, topic);
}

#[sqlx::test]
async fn test_create_topic_with_dangling_author_rejected(pool: SqlitePool) {
    let app = create_test_app(pool.clone()).await;
    let category = create_test_category(&app, "General").await;

    let (status, body) = post_json(
        &app,
        "/topics",
        json!({ "name": "Orphan", "author_user_id": 42, "category_id": category.id }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let detail: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(detail["detail"], "author user 42 does not exist");

    // No row may survive the failed write.
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM topics")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test]
async fn test_create_topic_with_dangling_category_rejected(pool: SqlitePool) {
    let app = create_test_app(pool.clone()).await;
    let user = create_test_user(&app, "alice").await;

    let (status, body) = post_json(
        &app,
        "/topics",
        json!({ "name": "Orphan", "author_user_id": user.id, "category_id": 42 }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let detail: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(detail["detail"], "category 42 does not exist");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM topics")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test]
async fn test_get_topic_round_trip(pool: SqlitePool) {
    let app = create_test_app(pool).await;
    let category = create_test_category(&app, "General").await;
    let user = create_test_user(&app, "alice").await;
    let created = create_test_topic(&app, "Fetch Me", user.id, category.id).await;

    let (status, body) =
        send_empty(&app, http::Method::GET, &format!("/topics/{}", created.id)).await;

    assert_eq!(status, StatusCode::OK);
    let fetched: Topic = serde_json::from_slice(&body).unwrap();
    assert_eq!(fetched, created);
}

#[sqlx::test]
async fn test_get_topic_not_found(pool: SqlitePool) {
    let app = create_test_app(pool).await;

    let (status, body) = send_empty(&app, http::Method::GET, "/topics/9999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let detail: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(detail["detail"], "Topic not found");
}

#[sqlx::test]
async fn test_list_topics(pool: SqlitePool) {
    let app = create_test_app(pool).await;
    let category = create_test_category(&app, "General").await;
    let user = create_test_user(&app, "alice").await;
    let t1 = create_test_topic(&app, "One", user.id, category.id).await;
    let t2 = create_test_topic(&app, "Two", user.id, category.id).await;

    let (status, body) = send_empty(&app, http::Method::GET, "/topics").await;

    assert_eq!(status, StatusCode::OK);
    let topics: Vec<Topic> = serde_json::from_slice(&body).unwrap();
    assert_eq!(topics, vec![t1, t2]);
}

#[sqlx::test]
async fn test_patch_pin_flag_leaves_name_and_created_on(pool: SqlitePool) {
    let app = create_test_app(pool).await;
    let category = create_test_category(&app, "General").await;
    let user = create_test_user(&app, "alice").await;
    let created = create_test_topic(&app, "Sticky?", user.id, category.id).await;

    let (status, body) = patch_json(
        &app,
        &format!("/topics/{}", created.id),
        json!({ "is_pinned": true }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let updated: Topic = serde_json::from_slice(&body).unwrap();
    assert!(updated.is_pinned);
    assert_eq!(updated.name, created.name);
    // created_on is immutable.
    assert_eq!(updated.created_on, created.created_on);
}

#[sqlx::test]
async fn test_update_topic_not_found(pool: SqlitePool) {
    let app = create_test_app(pool).await;

    let (status, _) = patch_json(&app, "/topics/9999", json!({ "name": "n" })).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test]
async fn test_delete_topic_success(pool: SqlitePool) {
    let app = create_test_app(pool.clone()).await;
    let category = create_test_category(&app, "General").await;
    let user = create_test_user(&app, "alice").await;
    let created = create_test_topic(&app, "Doomed", user.id, category.id).await;

    let (status, body) =
        send_empty(&app, http::Method::DELETE, &format!("/topics/{}", created.id)).await;

    assert_eq!(status, StatusCode::OK);
    let confirmation: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(confirmation["message"], "Topic deleted successfully");

    let result = sqlx::query("SELECT 1 FROM topics WHERE id = $1")
        .bind(created.id)
        .fetch_optional(&pool)
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test]
async fn test_delete_topic_not_found(pool: SqlitePool) {
    let app = create_test_app(pool).await;

    let (status, _) = send_empty(&app, http::Method::DELETE, "/topics/9999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test]
async fn test_delete_topic_with_posts_rejected(pool: SqlitePool) {
    let app = create_test_app(pool).await;
    let category = create_test_category(&app, "General").await;
    let user = create_test_user(&app, "alice").await;
    let topic = create_test_topic(&app, "Busy", user.id, category.id).await;
    create_test_post(&app, "first!", topic.id, None, user.id).await;

    let (status, _) =
        send_empty(&app, http::Method::DELETE, &format!("/topics/{}", topic.id)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

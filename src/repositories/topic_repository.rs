use chrono::Utc;
use sqlx::SqlitePool;

use crate::errors::ApiError;
use crate::models::Topic;
use crate::repositories::check_exists;

// Input data for creating a new topic
#[derive(serde::Deserialize)]
pub struct CreateTopicData {
    pub name: String,
    pub author_user_id: i64,
    pub category_id: i64,
}

// Sparse patch for a topic: only the name and pin flag are mutable
#[derive(serde::Deserialize, Default)]
pub struct UpdateTopicData {
    pub name: Option<String>,
    pub is_pinned: Option<bool>,
}

/// Inserts a new topic after resolving both foreign keys, stamping
/// `created_on` server-side. A dangling author or category id fails the
/// whole transaction.
pub async fn create_topic(pool: &SqlitePool, data: CreateTopicData) -> Result<Topic, ApiError> {
    let mut tx = pool.begin().await?;

    check_exists(
        &mut tx,
        "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)",
        data.author_user_id,
        format!("author user {} does not exist", data.author_user_id),
    )
    .await?;
    check_exists(
        &mut tx,
        "SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)",
        data.category_id,
        format!("category {} does not exist", data.category_id),
    )
    .await?;

    let topic = sqlx::query_as::<_, Topic>(
        r#"
        INSERT INTO topics (name, author_user_id, category_id, created_on, is_pinned)
        VALUES ($1, $2, $3, $4, FALSE)
        RETURNING id, name, author_user_id, category_id, created_on, is_pinned
        "#,
    )
    .bind(&data.name)
    .bind(data.author_user_id)
    .bind(data.category_id)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;
    Ok(topic)
}

/// Fetches a single topic by its ID.
pub async fn get_topic_by_id(pool: &SqlitePool, topic_id: i64) -> Result<Option<Topic>, ApiError> {
    let topic = sqlx::query_as::<_, Topic>(
        r#"
        SELECT id, name, author_user_id, category_id, created_on, is_pinned
        FROM topics
        WHERE id = $1
        "#,
    )
    .bind(topic_id)
    .fetch_optional(pool)
    .await?;
    Ok(topic)
}

/// Fetches all topics in id order.
pub async fn get_all_topics(pool: &SqlitePool) -> Result<Vec<Topic>, ApiError> {
    let topics = sqlx::query_as::<_, Topic>(
        r#"
        SELECT id, name, author_user_id, category_id, created_on, is_pinned
        FROM topics
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(topics)
}

/// Applies a sparse patch to an existing topic. `created_on` and both
/// foreign keys are immutable. Returns `None` when the id does not resolve.
pub async fn update_topic(
    pool: &SqlitePool,
    topic_id: i64,
    data: UpdateTopicData,
) -> Result<Option<Topic>, ApiError> {
    let mut tx = pool.begin().await?;
    let Some(mut topic) = sqlx::query_as::<_, Topic>(
        r#"
        SELECT id, name, author_user_id, category_id, created_on, is_pinned
        FROM topics
        WHERE id = $1
        "#,
    )
    .bind(topic_id)
    .fetch_optional(&mut *tx)
    .await?
    else {
        return Ok(None);
    };

    if let Some(name) = data.name {
        topic.name = name;
    }
    if let Some(is_pinned) = data.is_pinned {
        topic.is_pinned = is_pinned;
    }

    sqlx::query("UPDATE topics SET name = $1, is_pinned = $2 WHERE id = $3")
        .bind(&topic.name)
        .bind(topic.is_pinned)
        .bind(topic_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(Some(topic))
}

/// Deletes a topic by its ID. Deletion is rejected while posts still
/// reference the topic. Returns the number of rows affected.
pub async fn delete_topic(pool: &SqlitePool, topic_id: i64) -> Result<u64, ApiError> {
    let mut tx = pool.begin().await?;
    let referenced: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE topic_id = $1)")
            .bind(topic_id)
            .fetch_one(&mut *tx)
            .await?;
    if referenced {
        return Err(ApiError::unprocessable(
            "topic is still referenced by existing posts",
        ));
    }

    let result = sqlx::query("DELETE FROM topics WHERE id = $1")
        .bind(topic_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(result.rows_affected())
}

use chrono::Utc;
use sqlx::SqlitePool;

use crate::errors::ApiError;
use crate::models::Post;
use crate::repositories::check_exists;

// Input data for creating a new post. A parent_post_id of zero is a client
// sentinel for "no parent" and is normalized to NULL before persistence.
#[derive(serde::Deserialize)]
pub struct CreatePostData {
    pub content: String,
    pub topic_id: i64,
    pub parent_post_id: Option<i64>,
    pub author_user_id: i64,
}

// Sparse patch for a post: only content and rating are mutable
#[derive(serde::Deserialize, Default)]
pub struct UpdatePostData {
    pub content: Option<String>,
    pub rating: Option<i64>,
}

/// Inserts a new post after resolving the topic and author foreign keys and,
/// when a parent is given, checking that the parent post lives in the same
/// topic. `created_on` and `modified_on` are both stamped at creation.
pub async fn create_post(pool: &SqlitePool, data: CreatePostData) -> Result<Post, ApiError> {
    // Zero is not a valid self-reference, it means top-level post.
    let parent_post_id = data.parent_post_id.filter(|&id| id != 0);

    let mut tx = pool.begin().await?;

    check_exists(
        &mut tx,
        "SELECT EXISTS(SELECT 1 FROM topics WHERE id = $1)",
        data.topic_id,
        format!("topic {} does not exist", data.topic_id),
    )
    .await?;
    check_exists(
        &mut tx,
        "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)",
        data.author_user_id,
        format!("author user {} does not exist", data.author_user_id),
    )
    .await?;

    if let Some(parent_id) = parent_post_id {
        let parent_topic: Option<i64> =
            sqlx::query_scalar("SELECT topic_id FROM posts WHERE id = $1")
                .bind(parent_id)
                .fetch_optional(&mut *tx)
                .await?;
        match parent_topic {
            None => {
                return Err(ApiError::unprocessable(format!(
                    "parent post {parent_id} does not exist"
                )));
            }
            Some(topic_id) if topic_id != data.topic_id => {
                return Err(ApiError::unprocessable(format!(
                    "parent post {parent_id} belongs to a different topic"
                )));
            }
            Some(_) => {}
        }
    }

    let now = Utc::now();
    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (content, rating, topic_id, parent_post_id,
                           author_user_id, created_on, modified_on)
        VALUES ($1, 0, $2, $3, $4, $5, $6)
        RETURNING id, content, rating, topic_id, parent_post_id,
                  author_user_id, created_on, modified_on
        "#,
    )
    .bind(&data.content)
    .bind(data.topic_id)
    .bind(parent_post_id)
    .bind(data.author_user_id)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;
    Ok(post)
}

/// Fetches a single post by its ID.
pub async fn get_post_by_id(pool: &SqlitePool, post_id: i64) -> Result<Option<Post>, ApiError> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, content, rating, topic_id, parent_post_id,
               author_user_id, created_on, modified_on
        FROM posts
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;
    Ok(post)
}

/// Fetches all posts in id order.
pub async fn get_all_posts(pool: &SqlitePool) -> Result<Vec<Post>, ApiError> {
    let posts = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, content, rating, topic_id, parent_post_id,
               author_user_id, created_on, modified_on
        FROM posts
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(posts)
}

/// Applies a sparse patch to an existing post. `modified_on` is re-stamped
/// on every successful update, no matter which fields the patch carried.
/// Returns `None` when the id does not resolve.
pub async fn update_post(
    pool: &SqlitePool,
    post_id: i64,
    data: UpdatePostData,
) -> Result<Option<Post>, ApiError> {
    let mut tx = pool.begin().await?;
    let Some(mut post) = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, content, rating, topic_id, parent_post_id,
               author_user_id, created_on, modified_on
        FROM posts
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(&mut *tx)
    .await?
    else {
        return Ok(None);
    };

    if let Some(content) = data.content {
        post.content = content;
    }
    if let Some(rating) = data.rating {
        post.rating = rating;
    }
    post.modified_on = Utc::now();

    sqlx::query("UPDATE posts SET content = $1, rating = $2, modified_on = $3 WHERE id = $4")
        .bind(&post.content)
        .bind(post.rating)
        .bind(post.modified_on)
        .bind(post_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(Some(post))
}

/// Deletes a post by its ID. Deletion is rejected while replies still
/// reference the post as parent. Returns the number of rows affected.
pub async fn delete_post(pool: &SqlitePool, post_id: i64) -> Result<u64, ApiError> {
    let mut tx = pool.begin().await?;
    let referenced: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE parent_post_id = $1)")
            .bind(post_id)
            .fetch_one(&mut *tx)
            .await?;
    if referenced {
        return Err(ApiError::unprocessable(
            "post is still referenced by existing replies",
        ));
    }

    let result = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(post_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(result.rows_affected())
}

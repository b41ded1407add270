use chrono::Utc;
use sqlx::SqlitePool;

use crate::errors::ApiError;
use crate::models::{User, UserRead};

// Input data for creating a new user. The password has already been hashed
// by the time it reaches this layer; the plaintext never crosses it.
pub struct CreateUserData {
    pub display_name: String,
    pub email: String,
    pub password_digest: String,
}

// Sparse patch for a user, digest already applied when a password was sent
#[derive(Default)]
pub struct UpdateUserData {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub password_digest: Option<String>,
    pub is_banned: Option<bool>,
    pub is_moderator: Option<bool>,
    pub is_administrator: Option<bool>,
}

/// Inserts a new user, stamping `registered_on` server-side.
pub async fn create_user(pool: &SqlitePool, data: CreateUserData) -> Result<User, ApiError> {
    let mut tx = pool.begin().await?;
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (display_name, email, password_digest, registered_on)
        VALUES ($1, $2, $3, $4)
        RETURNING id, display_name, email, password_digest,
                  is_banned, is_moderator, is_administrator, registered_on
        "#,
    )
    .bind(&data.display_name)
    .bind(&data.email)
    .bind(&data.password_digest)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;
    Ok(user)
}

/// Fetches a single user by ID in the restricted read view.
pub async fn get_user_by_id(pool: &SqlitePool, user_id: i64) -> Result<Option<UserRead>, ApiError> {
    let user = sqlx::query_as::<_, UserRead>("SELECT id, display_name FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Fetches all users in id order, restricted read view only.
pub async fn get_all_users(pool: &SqlitePool) -> Result<Vec<UserRead>, ApiError> {
    let users = sqlx::query_as::<_, UserRead>("SELECT id, display_name FROM users ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(users)
}

/// Applies a sparse patch to an existing user. `registered_on` is immutable
/// and never part of the patch. Returns `None` when the id does not resolve.
pub async fn update_user(
    pool: &SqlitePool,
    user_id: i64,
    data: UpdateUserData,
) -> Result<Option<User>, ApiError> {
    let mut tx = pool.begin().await?;
    let Some(mut user) = sqlx::query_as::<_, User>(
        r#"
        SELECT id, display_name, email, password_digest,
               is_banned, is_moderator, is_administrator, registered_on
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?
    else {
        return Ok(None);
    };

    if let Some(display_name) = data.display_name {
        user.display_name = display_name;
    }
    if let Some(email) = data.email {
        user.email = email;
    }
    if let Some(password_digest) = data.password_digest {
        user.password_digest = password_digest;
    }
    if let Some(is_banned) = data.is_banned {
        user.is_banned = is_banned;
    }
    if let Some(is_moderator) = data.is_moderator {
        user.is_moderator = is_moderator;
    }
    if let Some(is_administrator) = data.is_administrator {
        user.is_administrator = is_administrator;
    }

    sqlx::query(
        r#"
        UPDATE users
        SET display_name = $1, email = $2, password_digest = $3,
            is_banned = $4, is_moderator = $5, is_administrator = $6
        WHERE id = $7
        "#,
    )
    .bind(&user.display_name)
    .bind(&user.email)
    .bind(&user.password_digest)
    .bind(user.is_banned)
    .bind(user.is_moderator)
    .bind(user.is_administrator)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;
    Ok(Some(user))
}

/// Deletes a user by ID. Deletion is rejected while topics or posts still
/// reference the user as author. Returns the number of rows affected.
pub async fn delete_user(pool: &SqlitePool, user_id: i64) -> Result<u64, ApiError> {
    let mut tx = pool.begin().await?;
    let referenced: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(SELECT 1 FROM topics WHERE author_user_id = $1)
            OR EXISTS(SELECT 1 FROM posts WHERE author_user_id = $1)
        "#,
    )
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;
    if referenced {
        return Err(ApiError::unprocessable(
            "user is still referenced by existing topics or posts",
        ));
    }

    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(result.rows_affected())
}

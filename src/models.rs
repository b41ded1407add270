use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents a top-level category grouping topics.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// Full user record as stored.
///
/// Deliberately does not implement `Serialize`: the password digest and the
/// moderation flags must never reach a response body. Use [`UserRead`] for
/// anything that leaves the server.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub display_name: String,
    pub email: String,
    pub password_digest: String,
    pub is_banned: bool,
    pub is_moderator: bool,
    pub is_administrator: bool,
    pub registered_on: DateTime<Utc>,
}

/// Restricted read view of a user returned by the HTTP surface.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct UserRead {
    pub id: i64,
    pub display_name: String,
}

impl From<User> for UserRead {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name,
        }
    }
}

/// Represents a discussion topic within a category.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Topic {
    pub id: i64,
    pub name: String,
    pub author_user_id: i64,
    pub category_id: i64,
    pub created_on: DateTime<Utc>,
    pub is_pinned: bool,
}

/// Represents a post within a topic. `parent_post_id` links threaded replies
/// to another post in the same topic; NULL means a top-level post.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub content: String,
    pub rating: i64,
    pub topic_id: i64,
    pub parent_post_id: Option<i64>,
    pub author_user_id: i64,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
}

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub mod errors;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod security;

use handlers::{
    category_handlers::{create_category_handler, delete_category_handler, get_category_handler, list_categories_handler, update_category_handler},
    post_handlers::{create_post_handler, delete_post_handler, get_post_handler, list_posts_handler, update_post_handler},
    topic_handlers::{create_topic_handler, delete_topic_handler, get_topic_handler, list_topics_handler, update_topic_handler},
    user_handlers::{create_user_handler, delete_user_handler, get_user_handler, list_users_handler, update_user_handler},
};
use security::PasswordHasher;

// Define the application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub password_hasher: Arc<dyn PasswordHasher>,
}

// Function to create the main application router
pub fn create_router(db_pool: SqlitePool, password_hasher: Arc<dyn PasswordHasher>) -> Router {
    let app_state = AppState {
        db_pool,
        password_hasher,
    };

    // JSON bodies only; 1MB is plenty for any of them
    const MAX_BODY_SIZE: usize = 1024 * 1024;

    Router::new()
        .route("/", get(root))
        .route("/categories", post(create_category_handler).get(list_categories_handler))
        .route("/categories/:id", get(get_category_handler).patch(update_category_handler).delete(delete_category_handler))
        .route("/users", post(create_user_handler).get(list_users_handler))
        .route("/users/:id", get(get_user_handler).patch(update_user_handler).delete(delete_user_handler))
        .route("/topics", post(create_topic_handler).get(list_topics_handler))
        .route("/topics/:id", get(get_topic_handler).patch(update_topic_handler).delete(delete_topic_handler))
        .route("/posts", post(create_post_handler).get(list_posts_handler))
        .route("/posts/:id", get(get_post_handler).patch(update_post_handler).delete(delete_post_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
}

// Basic handler for the root path
async fn root(State(_state): State<AppState>) -> &'static str {
    "Forum backend is up."
}

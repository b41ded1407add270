use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::{
    errors::ApiError,
    handlers::DeleteConfirmation,
    repositories::post_repository::{self, CreatePostData, UpdatePostData},
    AppState,
};

pub async fn create_post_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreatePostData>,
) -> Result<Response, ApiError> {
    let post = post_repository::create_post(&state.db_pool, payload).await?;
    info!(post_id = post.id, topic_id = post.topic_id, "created post");
    Ok((StatusCode::CREATED, Json(post)).into_response())
}

pub async fn list_posts_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let posts = post_repository::get_all_posts(&state.db_pool).await?;
    Ok((StatusCode::OK, Json(posts)).into_response())
}

pub async fn get_post_handler(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> Result<Response, ApiError> {
    let post = post_repository::get_post_by_id(&state.db_pool, post_id)
        .await?
        .ok_or(ApiError::not_found("Post"))?;
    Ok((StatusCode::OK, Json(post)).into_response())
}

pub async fn update_post_handler(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    Json(payload): Json<UpdatePostData>,
) -> Result<Response, ApiError> {
    let post = post_repository::update_post(&state.db_pool, post_id, payload)
        .await?
        .ok_or(ApiError::not_found("Post"))?;
    info!(post_id, "updated post");
    Ok((StatusCode::OK, Json(post)).into_response())
}

pub async fn delete_post_handler(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> Result<Response, ApiError> {
    let rows_affected = post_repository::delete_post(&state.db_pool, post_id).await?;
    if rows_affected == 0 {
        return Err(ApiError::not_found("Post"));
    }
    info!(post_id, "deleted post");
    Ok((StatusCode::OK, Json(DeleteConfirmation::for_entity("Post"))).into_response())
}

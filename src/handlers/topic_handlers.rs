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
    repositories::topic_repository::{self, CreateTopicData, UpdateTopicData},
    AppState,
};

pub async fn create_topic_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateTopicData>,
) -> Result<Response, ApiError> {
    let topic = topic_repository::create_topic(&state.db_pool, payload).await?;
    info!(topic_id = topic.id, category_id = topic.category_id, "created topic");
    Ok((StatusCode::CREATED, Json(topic)).into_response())
}

pub async fn list_topics_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let topics = topic_repository::get_all_topics(&state.db_pool).await?;
    Ok((StatusCode::OK, Json(topics)).into_response())
}

pub async fn get_topic_handler(
    State(state): State<AppState>,
    Path(topic_id): Path<i64>,
) -> Result<Response, ApiError> {
    let topic = topic_repository::get_topic_by_id(&state.db_pool, topic_id)
        .await?
        .ok_or(ApiError::not_found("Topic"))?;
    Ok((StatusCode::OK, Json(topic)).into_response())
}

pub async fn update_topic_handler(
    State(state): State<AppState>,
    Path(topic_id): Path<i64>,
    Json(payload): Json<UpdateTopicData>,
) -> Result<Response, ApiError> {
    let topic = topic_repository::update_topic(&state.db_pool, topic_id, payload)
        .await?
        .ok_or(ApiError::not_found("Topic"))?;
    info!(topic_id, "updated topic");
    Ok((StatusCode::OK, Json(topic)).into_response())
}

pub async fn delete_topic_handler(
    State(state): State<AppState>,
    Path(topic_id): Path<i64>,
) -> Result<Response, ApiError> {
    let rows_affected = topic_repository::delete_topic(&state.db_pool, topic_id).await?;
    if rows_affected == 0 {
        return Err(ApiError::not_found("Topic"));
    }
    info!(topic_id, "deleted topic");
    Ok((StatusCode::OK, Json(DeleteConfirmation::for_entity("Topic"))).into_response())
}

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
    repositories::category_repository::{self, CreateCategoryData, UpdateCategoryData},
    AppState,
};

pub async fn create_category_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryData>,
) -> Result<Response, ApiError> {
    let category = category_repository::create_category(&state.db_pool, payload).await?;
    info!(category_id = category.id, "created category");
    Ok((StatusCode::CREATED, Json(category)).into_response())
}

pub async fn list_categories_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let categories = category_repository::get_all_categories(&state.db_pool).await?;
    Ok((StatusCode::OK, Json(categories)).into_response())
}

pub async fn get_category_handler(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
) -> Result<Response, ApiError> {
    let category = category_repository::get_category_by_id(&state.db_pool, category_id)
        .await?
        .ok_or(ApiError::not_found("Category"))?;
    Ok((StatusCode::OK, Json(category)).into_response())
}

pub async fn update_category_handler(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
    Json(payload): Json<UpdateCategoryData>,
) -> Result<Response, ApiError> {
    let category = category_repository::update_category(&state.db_pool, category_id, payload)
        .await?
        .ok_or(ApiError::not_found("Category"))?;
    info!(category_id, "updated category");
    Ok((StatusCode::OK, Json(category)).into_response())
}

pub async fn delete_category_handler(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
) -> Result<Response, ApiError> {
    let rows_affected = category_repository::delete_category(&state.db_pool, category_id).await?;
    if rows_affected == 0 {
        return Err(ApiError::not_found("Category"));
    }
    info!(category_id, "deleted category");
    Ok((StatusCode::OK, Json(DeleteConfirmation::for_entity("Category"))).into_response())
}

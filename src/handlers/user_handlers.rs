use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::{
    errors::ApiError,
    handlers::DeleteConfirmation,
    models::UserRead,
    repositories::user_repository::{self, CreateUserData, UpdateUserData},
    AppState,
};

/// Wire payload for user creation. The plaintext password is hashed here,
/// before anything else touches it; only the digest crosses into the
/// repository layer.
#[derive(Deserialize)]
pub struct CreateUserPayload {
    pub display_name: String,
    pub email: String,
    pub password: String,
}

/// Wire payload for the sparse user patch. The role flags are settable
/// through this surface; authorization enforcement is out of scope.
#[derive(Deserialize, Default)]
pub struct UpdateUserPayload {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_banned: Option<bool>,
    pub is_moderator: Option<bool>,
    pub is_administrator: Option<bool>,
}

pub async fn create_user_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<Response, ApiError> {
    let password_digest = state
        .password_hasher
        .hash(&payload.password)
        .map_err(|e| ApiError::unprocessable(e.to_string()))?;
    let user = user_repository::create_user(
        &state.db_pool,
        CreateUserData {
            display_name: payload.display_name,
            email: payload.email,
            password_digest,
        },
    )
    .await?;
    info!(user_id = user.id, "created user");
    Ok((StatusCode::CREATED, Json(UserRead::from(user))).into_response())
}

pub async fn list_users_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let users = user_repository::get_all_users(&state.db_pool).await?;
    Ok((StatusCode::OK, Json(users)).into_response())
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Response, ApiError> {
    let user = user_repository::get_user_by_id(&state.db_pool, user_id)
        .await?
        .ok_or(ApiError::not_found("User"))?;
    Ok((StatusCode::OK, Json(user)).into_response())
}

pub async fn update_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<Response, ApiError> {
    // Re-hash only when the patch actually carries a password.
    let password_digest = match payload.password {
        Some(ref password) => Some(
            state
                .password_hasher
                .hash(password)
                .map_err(|e| ApiError::unprocessable(e.to_string()))?,
        ),
        None => None,
    };
    let user = user_repository::update_user(
        &state.db_pool,
        user_id,
        UpdateUserData {
            display_name: payload.display_name,
            email: payload.email,
            password_digest,
            is_banned: payload.is_banned,
            is_moderator: payload.is_moderator,
            is_administrator: payload.is_administrator,
        },
    )
    .await?
    .ok_or(ApiError::not_found("User"))?;
    info!(user_id, "updated user");
    Ok((StatusCode::OK, Json(UserRead::from(user))).into_response())
}

pub async fn delete_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Response, ApiError> {
    let rows_affected = user_repository::delete_user(&state.db_pool, user_id).await?;
    if rows_affected == 0 {
        return Err(ApiError::not_found("User"));
    }
    info!(user_id, "deleted user");
    Ok((StatusCode::OK, Json(DeleteConfirmation::for_entity("User"))).into_response())
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{password::hash_password, AuthUser},
    error::ApiError,
    state::AppState,
    store::types::{NewUser, PublicUser, UserUpdate},
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/:id", get(get_user).put(update_user))
}

/// POST /users — bearer auth required. The password arrives in plaintext and
/// is hashed before the store ever sees it.
#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Json(mut payload): Json<NewUser>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    if payload.password.trim().is_empty() {
        return Err(ApiError::Validation("password is required".into()));
    }
    payload.password = hash_password(&payload.password)?;
    let user = state.store.create_user(payload).await?;
    info!(user_id = %user.id, "user created");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PublicUser>, ApiError> {
    let user = state
        .store
        .user_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UserUpdate>,
) -> Result<Json<PublicUser>, ApiError> {
    let user = state
        .store
        .update_user(&id, payload)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    info!(user_id = %user.id, "user updated");
    Ok(Json(user.into()))
}

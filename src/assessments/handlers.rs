use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    error::ApiError,
    state::AppState,
    store::types::{Assessment, NewAssessment},
};

pub fn assessment_routes() -> Router<AppState> {
    Router::new()
        .route("/assessments", post(create_assessment))
        .route("/users/:user_id/assessments", get(list_assessments))
}

#[instrument(skip(state, payload))]
pub async fn create_assessment(
    State(state): State<AppState>,
    Json(payload): Json<NewAssessment>,
) -> Result<(StatusCode, Json<Assessment>), ApiError> {
    let assessment = state.store.create_assessment(payload).await?;
    info!(assessment_id = %assessment.id, user_id = %assessment.user_id, "assessment recorded");
    Ok((StatusCode::CREATED, Json(assessment)))
}

#[instrument(skip(state))]
pub async fn list_assessments(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Assessment>>, ApiError> {
    let assessments = state.store.assessments_by_user(&user_id).await?;
    Ok(Json(assessments))
}

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
    store::types::{NewPortfolio, Portfolio},
};

pub fn portfolio_routes() -> Router<AppState> {
    Router::new()
        .route("/portfolios", post(create_portfolio))
        .route("/users/:user_id/portfolios", get(list_portfolios))
}

#[instrument(skip(state, payload))]
pub async fn create_portfolio(
    State(state): State<AppState>,
    Json(payload): Json<NewPortfolio>,
) -> Result<(StatusCode, Json<Portfolio>), ApiError> {
    let portfolio = state.store.create_portfolio(payload).await?;
    info!(portfolio_id = %portfolio.id, user_id = %portfolio.user_id, "portfolio created");
    Ok((StatusCode::CREATED, Json(portfolio)))
}

#[instrument(skip(state))]
pub async fn list_portfolios(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Portfolio>>, ApiError> {
    let portfolios = state.store.portfolios_by_user(&user_id).await?;
    Ok(Json(portfolios))
}

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::AppError,
    models::{Trip, UserStats},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats))
        .route("/get_trips", get(trips))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserQuery {
    user_id: String,
}

async fn stats(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<UserStats>, AppError> {
    debug!(user = %query.user_id, "stats requested");
    let stats = state.store.fetch_stats(&query.user_id).await?;
    Ok(Json(stats))
}

async fn trips(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<Trip>>, AppError> {
    debug!(user = %query.user_id, "trips requested");
    let trips = state.store.fetch_trips(&query.user_id).await?;
    Ok(Json(trips))
}

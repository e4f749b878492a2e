use axum::{extract::State, Json};

use crate::{models::StatsSnapshot, routes::AppState};

/// Handler for `GET /api/stats`
pub async fn stats(State(state): State<AppState>) -> Json<StatsSnapshot> {
    Json(state.stats.as_ref().clone())
}

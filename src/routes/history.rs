use axum::{extract::State, Extension, Json};
use serde_json::{json, Value};

use crate::{
    db::HISTORY_READ_LIMIT,
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{HistorySnapshot, ViewRecord},
    routes::AppState,
};

/// Handler for `GET /api/history`
pub async fn get_history(State(state): State<AppState>) -> AppResult<Json<HistorySnapshot>> {
    let searches = state.history.searches(&state.user_id, HISTORY_READ_LIMIT).await?;
    let views = state.history.views(&state.user_id, HISTORY_READ_LIMIT).await?;
    Ok(Json(HistorySnapshot { searches, views }))
}

/// Handler for `POST /api/history/view`
pub async fn save_view(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(view): Json<ViewRecord>,
) -> AppResult<Json<Value>> {
    if view.title.trim().is_empty() {
        return Err(AppError::InvalidInput("Movie title is required".to_string()));
    }

    state.history.add_view(&state.user_id, &view).await?;

    tracing::info!(
        request_id = %request_id,
        movie_id = %view.movie_id,
        "Recorded view"
    );

    Ok(Json(json!({ "status": "ok" })))
}

/// Handler for `POST /api/history/clear`
pub async fn clear_history(State(state): State<AppState>) -> AppResult<Json<Value>> {
    state.history.clear(&state.user_id).await?;
    Ok(Json(json!({ "status": "ok" })))
}

use axum::{extract::State, Extension, Json};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{RecommendRequest, RecommendResponse},
    routes::AppState,
};

/// Handler for `POST /api/recommend`
///
/// A missing or unparsable body is treated like an empty one, so the caller
/// always gets the JSON validation error rather than an extractor rejection.
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Option<Json<RecommendRequest>>,
) -> AppResult<Json<RecommendResponse>> {
    let request = payload.map(|Json(p)| p).unwrap_or_default();
    let query = request.query.trim().to_string();
    if query.is_empty() {
        return Err(AppError::InvalidInput(
            "Please enter a keyword or description".to_string(),
        ));
    }
    let top_k = request.requested_top_k();

    tracing::info!(request_id = %request_id, query = %query, top_k, "Processing recommendation request");

    let recommender = state.recommender.clone();
    let search = query.clone();
    let results = tokio::task::spawn_blocking(move || recommender.recommend(&search, top_k))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if let Err(e) = state
        .history
        .add_search(&state.user_id, &query, top_k, results.len() as i64)
        .await
    {
        tracing::warn!(request_id = %request_id, error = %e, "Failed to record search history");
    }

    tracing::info!(request_id = %request_id, results = results.len(), "Recommendation completed");

    Ok(Json(RecommendResponse { results }))
}

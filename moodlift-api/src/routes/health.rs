//! Health check endpoint

use axum::extract::State;
use axum::Json;

use crate::dto::HealthResponse;
use crate::state::AppState;

/// Health check endpoint; reports datastore connectivity alongside the
/// process status
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = if state.datastore.ping().await {
        "ok"
    } else {
        "error"
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        version: state.version.clone(),
        database: database.to_string(),
    })
}

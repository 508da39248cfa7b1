//! Aggregate backend health endpoint.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// `GET /health` — probe every configured backend concurrently and return a
/// JSON object mapping backend name to its reachability snapshot. Always
/// 200: an unreachable backend is data, not an error.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let results = state.probe.check_all().await;
    Json(json!(results))
}

//! Liveness endpoints.
//!
//! - `GET /ping` — literal `pong`, the cheapest possible liveness check
//! - `GET /status` — JSON service summary

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;
use crate::util::rfc3339_now;

/// `GET /ping` — plain-text liveness probe. No authentication, suitable for
/// load-balancer checks.
pub async fn ping() -> &'static str {
    "pong"
}

/// `GET /status` — one-level JSON summary: status, service name, RFC 3339
/// timestamp, version, and uptime.
pub async fn status(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "online",
        "service": state.config.server.service_name,
        "timestamp": rfc3339_now(),
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}

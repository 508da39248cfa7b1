//! Outbound message submission endpoint.
//!
//! `GET /send?username=&password=&to=&content=` — credentials and payload
//! travel as query parameters, matching the HTTP surface of the gateway this
//! facade stands in for. Success acknowledges acceptance only; delivery is
//! someone else's problem.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::Result;
use crate::state::AppState;
use crate::submission::SubmissionRequest;
use crate::util::rfc3339_now;

/// Query parameters for `GET /send`. Absent parameters behave as empty
/// strings: missing `to`/`content` maps to 400, missing credentials to 401.
#[derive(Debug, Deserialize)]
pub struct SendParams {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub content: String,
}

/// `GET /send` — submit one outbound message.
///
/// # Errors
///
/// - `400` — empty or missing `to`/`content`
/// - `401` — credential mismatch (`{"status":"error","message":"Authentication failed"}`)
pub async fn send(
    State(state): State<AppState>,
    Query(params): Query<SendParams>,
) -> Result<Json<Value>> {
    let request = SubmissionRequest {
        username: params.username,
        password: params.password,
        destination: params.to,
        content: params.content,
    };

    let record = state.submissions.submit(&request).await?;

    Ok(Json(json!({
        "status": "success",
        "message_id": record.message_id,
        "to": record.destination,
        "content": record.content,
        "timestamp": rfc3339_now(),
    })))
}

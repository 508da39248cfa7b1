//! Central error taxonomy.
//!
//! Every fallible path in the gateway maps into one of these variants, and
//! the HTTP facade converts them to responses through a single
//! [`IntoResponse`] impl — handlers never pick status codes themselves.
//!
//! | Variant             | HTTP status | Notes                                    |
//! |---------------------|-------------|------------------------------------------|
//! | `InvalidRequest`    | 400         | Missing/empty required field             |
//! | `Unauthorized`      | 401         | Credential mismatch, field not disclosed |
//! | `Timeout`           | 504         | Network operation exceeded its bound     |
//! | `ProtocolViolation` | —           | Console-only: closes the session         |
//!
//! None of these are process-fatal. `Timeout` from a health probe is folded
//! into a degraded `reachable = false` status by the probe itself and never
//! surfaces as an HTTP error.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Authentication failed")]
    Unauthorized,
    #[error("Operation timed out")]
    Timeout,
    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Error::InvalidRequest(msg) => {
                tracing::debug!(message = %msg, "Bad request");
                (StatusCode::BAD_REQUEST, msg)
            }
            Error::Unauthorized => {
                tracing::debug!("Authentication failed");
                (StatusCode::UNAUTHORIZED, "Authentication failed".to_string())
            }
            Error::Timeout => {
                tracing::warn!("Request timed out");
                (StatusCode::GATEWAY_TIMEOUT, "Operation timed out".to_string())
            }
            Error::ProtocolViolation(msg) => {
                // Console sessions never travel through HTTP; mapped anyway
                // so the impl stays total.
                tracing::debug!(message = %msg, "Protocol violation");
                (StatusCode::BAD_REQUEST, msg)
            }
        };

        let body = Json(json!({
            "status": "error",
            "message": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_maps_to_401() {
        let response = Error::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_invalid_request_maps_to_400() {
        let response = Error::InvalidRequest("Missing required fields".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_timeout_maps_to_504() {
        let response = Error::Timeout.into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }
}

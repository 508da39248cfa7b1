//! HTTP facade route handlers.

pub mod health;
pub mod send;
pub mod status;

use axum::{routing::get, Router};

use crate::state::AppState;

/// Assemble the facade router. Every endpoint is a stateless mapping onto
/// the authenticator, submission log, and health probe carried in
/// [`AppState`].
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(status::ping))
        .route("/status", get(status::status))
        .route("/send", get(send::send))
        .route("/health", get(health::health))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::CredentialStore;
    use crate::config::{BackendConfig, Config};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let config = Config::load(None);
        let credentials =
            CredentialStore::from_config(&config.users).expect("store should build");
        router(AppState::new(config, credentials))
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("router should respond");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body should collect")
            .to_bytes();
        let json = serde_json::from_slice(&bytes).expect("body should be JSON");
        (status, json)
    }

    #[tokio::test]
    async fn test_ping_pong() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/ping")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router should respond");
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body should collect")
            .to_bytes();
        assert_eq!(&bytes[..], b"pong");
    }

    #[tokio::test]
    async fn test_status_shape() {
        let (status, json) = get_json(test_router(), "/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "online");
        assert_eq!(json["service"], "SMS Gateway");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
        assert!(json["timestamp"].is_string());
        assert!(json["uptime_secs"].is_number());
    }

    #[tokio::test]
    async fn test_send_success() {
        let (status, json) = get_json(
            test_router(),
            "/send?username=admin&password=admin123&to=%2B15551234567&content=Hello",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "success");
        assert_eq!(json["to"], "+15551234567");
        assert_eq!(json["content"], "Hello");
        assert!(
            !json["message_id"].as_str().expect("message_id").is_empty(),
            "message_id must be assigned"
        );
    }

    #[tokio::test]
    async fn test_send_bad_credentials() {
        let (status, json) = get_json(
            test_router(),
            "/send?username=admin&password=wrong&to=%2B1&content=x",
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Authentication failed");
    }

    #[tokio::test]
    async fn test_send_missing_content() {
        let (status, json) = get_json(
            test_router(),
            "/send?username=admin&password=admin123&to=%2B1",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["status"], "error");
    }

    #[tokio::test]
    async fn test_send_missing_destination() {
        let (status, _) = get_json(
            test_router(),
            "/send?username=admin&password=admin123&content=x",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health_reports_each_backend() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind should succeed");
        let live_port = listener.local_addr().expect("local_addr").port();

        let mut config = Config::load(None);
        config.backends = vec![
            BackendConfig {
                name: "smpp".to_string(),
                host: "127.0.0.1".to_string(),
                port: live_port,
            },
            BackendConfig {
                name: "redis".to_string(),
                host: "127.0.0.1".to_string(),
                // Port 1 is practically never listening locally.
                port: 1,
            },
        ];
        let credentials =
            CredentialStore::from_config(&config.users).expect("store should build");
        let router = router(AppState::new(config, credentials));

        let (status, json) = get_json(router, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["smpp"]["reachable"], true);
        assert_eq!(json["redis"]["reachable"], false);
        assert_eq!(json["smpp"]["port"], live_port);
    }

    #[tokio::test]
    async fn test_unknown_path_404() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/nope")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router should respond");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

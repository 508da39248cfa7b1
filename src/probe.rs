//! Backend reachability probes.
//!
//! Each configured backend (delivery daemon, broker, cache) is checked with a
//! single bounded-duration TCP connect. An established connection is dropped
//! immediately — the probe never speaks the backend's protocol. Any error
//! (refused, timeout, unreachable) marks the backend down; there are no
//! retries, callers re-invoke when they need a fresh answer.
//!
//! The aggregate probe dispatches one task per backend and joins them, so a
//! hung backend delays the result only by its own timeout.

use std::collections::HashMap;
use std::time::Duration;

use futures::future::join_all;
use serde::Serialize;
use time::OffsetDateTime;
use tokio::net::TcpStream;
use tracing::debug;

use crate::config::BackendConfig;

/// Point-in-time reachability of one backend. Recomputed on every probe,
/// never stored.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealth {
    pub service_name: String,
    pub host: String,
    pub port: u16,
    pub reachable: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub checked_at: OffsetDateTime,
}

/// Probes the configured backend set.
#[derive(Debug)]
pub struct HealthProbe {
    backends: Vec<BackendConfig>,
    timeout: Duration,
}

impl HealthProbe {
    pub fn new(backends: Vec<BackendConfig>, timeout: Duration) -> Self {
        Self { backends, timeout }
    }

    /// Single bounded TCP connect attempt. Never errors — a failed or
    /// timed-out connect is a `reachable = false` result, not a fault.
    pub async fn check(&self, service_name: &str, host: &str, port: u16) -> ServiceHealth {
        let addr = format!("{host}:{port}");
        let reachable = matches!(
            tokio::time::timeout(self.timeout, TcpStream::connect(&addr)).await,
            Ok(Ok(_))
        );
        debug!("Probe {service_name} ({addr}): reachable={reachable}");

        ServiceHealth {
            service_name: service_name.to_string(),
            host: host.to_string(),
            port,
            reachable,
            checked_at: OffsetDateTime::now_utc(),
        }
    }

    /// Probe every configured backend concurrently and collect the results
    /// by name. One slow backend cannot block the others beyond its own
    /// timeout.
    pub async fn check_all(&self) -> HashMap<String, ServiceHealth> {
        let probes = self
            .backends
            .iter()
            .map(|b| self.check(&b.name, &b.host, b.port));

        join_all(probes)
            .await
            .into_iter()
            .map(|h| (h.service_name.clone(), h))
            .collect()
    }
}

//! Shared application state passed to every handler via Axum's `State`
//! extractor and to each console session by reference.

use std::sync::Arc;
use std::time::Instant;

use crate::auth::CredentialStore;
use crate::config::Config;
use crate::probe::HealthProbe;
use crate::submission::SubmissionLog;

/// Shared application state for the gateway, constructed once at startup.
/// No component reaches for globals — everything it needs arrives through
/// this context.
#[derive(Clone)]
pub struct AppState {
    /// Immutable configuration loaded at startup.
    pub config: Arc<Config>,
    /// Monotonic instant when the server started (for uptime calculation).
    pub start_time: Instant,
    /// Credential store shared by the HTTP facade and the console.
    pub credentials: Arc<CredentialStore>,
    /// Append-only submission log.
    pub submissions: SubmissionLog,
    /// Backend reachability probe.
    pub probe: Arc<HealthProbe>,
}

impl AppState {
    pub fn new(config: Config, credentials: CredentialStore) -> Self {
        let config = Arc::new(config);
        let credentials = Arc::new(credentials);
        let probe = Arc::new(HealthProbe::new(
            config.backends.clone(),
            std::time::Duration::from_millis(config.server.probe_timeout_ms),
        ));
        Self {
            start_time: Instant::now(),
            credentials: Arc::clone(&credentials),
            submissions: SubmissionLog::new(credentials),
            probe,
            config,
        }
    }
}

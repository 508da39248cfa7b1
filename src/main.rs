#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # smsgw
//!
//! Minimal SMS gateway facade: authenticates and acknowledges outbound
//! message submissions over HTTP, serves a jcli-style admin console over
//! TCP, and reports backend reachability. Delivery itself is out of scope —
//! the delivery daemon, broker, and cache are external services this
//! gateway only health-checks.
//!
//! ## API surface
//!
//! | Method | Path      | Auth         | Description                        |
//! |--------|-----------|--------------|------------------------------------|
//! | GET    | `/ping`   | No           | Liveness probe (`pong`)            |
//! | GET    | `/status` | No           | Service status JSON                |
//! | GET    | `/send`   | Query params | Submit an outbound message         |
//! | GET    | `/health` | No           | Backend reachability map           |
//!
//! The admin console listens separately (default port 8990):
//! username/password login, then `help` / `status` / `quit`.
//!
//! ## Architecture
//!
//! ```text
//! main.rs          — entry point, clap subcommands, router setup, graceful shutdown
//! auth.rs          — credential store, constant-time comparison
//! config.rs        — TOML + env-var configuration
//! console.rs       — jcli-style line protocol, session state machine
//! error.rs         — error taxonomy → HTTP status mapping
//! probe.rs         — bounded TCP connect checks, concurrent fan-out
//! state.rs         — shared application state
//! submission.rs    — append-only in-memory submission log
//! routes/
//!   status.rs      — GET /ping, GET /status
//!   send.rs        — GET /send
//!   health.rs      — GET /health
//! ```

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use smsgw::{console, routes, AppState, Config, CredentialStore};

/// Minimal SMS gateway facade.
#[derive(Parser)]
#[command(name = "smsgw", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the gateway (default when no subcommand given).
    Serve {
        /// Path to TOML config file.
        #[arg(long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { config }) => {
            run_server(config.as_deref()).await;
        }
        None => {
            // Backward compat: no subcommand but --config may be passed
            let args: Vec<String> = std::env::args().collect();
            let config_path = args
                .windows(2)
                .find(|w| w[0] == "--config")
                .map(|w| w[1].clone());
            run_server(config_path.as_deref()).await;
        }
    }
}

async fn run_server(config_path: Option<&str>) {
    let config = Config::load(config_path);

    // Initialize tracing
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| config.logging.level.clone());
    tracing_subscriber::fmt().with_env_filter(log_filter).init();

    info!("smsgw v{} starting", env!("CARGO_PKG_VERSION"));
    info!("HTTP API listening on {}", config.server.http_listen);
    info!("Console listening on {}", config.server.console_listen);

    if config.has_default_credentials() {
        warn!("Using default admin credentials — configure [[users]] before exposing this gateway");
    }

    let credentials = CredentialStore::from_config(&config.users)
        .unwrap_or_else(|e| panic!("Invalid [[users]] config: {e}"));

    let state = AppState::new(config, credentials);

    // Console server runs beside the HTTP facade for the life of the process.
    let console_listener = TcpListener::bind(&state.config.server.console_listen)
        .await
        .expect("Failed to bind console listener");
    let console_task = tokio::spawn(console::serve(console_listener, state.clone()));

    let app = routes::router(state.clone())
        .layer(TraceLayer::new_for_http())
        // The dashboard calls this API cross-origin.
        .layer(CorsLayer::permissive());

    let listener = TcpListener::bind(&state.config.server.http_listen)
        .await
        .expect("Failed to bind");

    info!("Server ready");

    // Graceful shutdown
    let shutdown = async {
        let ctrl_c = tokio::signal::ctrl_c();
        #[cfg(unix)]
        {
            let mut sigterm =
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                    .expect("Failed to register SIGTERM");
            tokio::select! {
                _ = ctrl_c => info!("Received SIGINT"),
                _ = sigterm.recv() => info!("Received SIGTERM"),
            }
        }
        #[cfg(not(unix))]
        {
            ctrl_c.await.ok();
            info!("Received SIGINT");
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .expect("Server error");

    // Cleanup
    info!("Shutting down...");
    console_task.abort();
    info!("Goodbye");
}

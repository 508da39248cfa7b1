//! jcli-style administrative console.
//!
//! A line-oriented, stateful text protocol over plain TCP:
//!
//! | State            | Input           | Next             | Output                          |
//! |------------------|-----------------|------------------|---------------------------------|
//! | AwaitingUsername | any line        | AwaitingPassword | `Password: `                    |
//! | AwaitingPassword | any line        | Authenticated    | welcome banner + `jcli : `      |
//! |                  |                 | Closed (bad auth)| `Authentication failed.`        |
//! | Authenticated    | `quit` / `exit` | Closed           | —                               |
//! | Authenticated    | `help`          | Authenticated    | command list + `jcli : `        |
//! | Authenticated    | `status`        | Authenticated    | one-line summary + `jcli : `    |
//! | Authenticated    | anything else   | Authenticated    | `Unknown command.` + `jcli : `  |
//!
//! Command keywords are trimmed and case-insensitive; in the two auth states
//! every line is literal field input, so `quit` typed as a username is a
//! username. Prompts end without a trailing newline; all other output is
//! `\r\n`-terminated.
//!
//! Credentials travel in plaintext over the unencrypted socket; keep the
//! console off untrusted networks. Passwords are never echoed into logs.
//!
//! ## Concurrency
//!
//! One task per accepted connection. A semaphore caps concurrent sessions at
//! `max_console_sessions`; the accept loop waits for a free permit, so a
//! connection flood queues in the kernel backlog instead of exhausting the
//! process. Every read carries the configured idle timeout. Sessions share
//! nothing mutable beyond read-only access to the credential store and the
//! submission counters.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::state::AppState;

const PROMPT: &str = "jcli : ";
const GREETING: &str = "Authentication required.\r\nUsername: ";
const HELP: &str = "Available commands: help, quit, status\r\n";
const UNKNOWN: &str = "Unknown command. Type 'help' for available commands.\r\n";
const AUTH_FAILED: &str = "Authentication failed.\r\n";

/// What the session writes back after a line, and whether it stays open.
#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    /// Write the text and keep reading.
    Continue(String),
    /// Write the text (possibly empty) and close the connection.
    Close(String),
}

/// Per-connection authentication progress.
#[derive(Debug)]
enum SessionState {
    AwaitingUsername,
    AwaitingPassword { username: String },
    Authenticated,
    Closed,
}

/// One console session's state machine. Owned exclusively by its connection
/// task; the transition logic is synchronous and socket-free so it can be
/// tested line by line.
pub struct ConsoleSession {
    state: SessionState,
    app: AppState,
}

impl ConsoleSession {
    pub fn new(app: AppState) -> Self {
        Self {
            state: SessionState::AwaitingUsername,
            app,
        }
    }

    /// Sent once on connect, before any input is read.
    #[must_use]
    pub fn greeting() -> &'static str {
        GREETING
    }

    /// Advance the state machine by one input line.
    pub fn handle_line(&mut self, raw: &str) -> Reply {
        let line = raw.trim();
        match std::mem::replace(&mut self.state, SessionState::Closed) {
            SessionState::AwaitingUsername => {
                self.state = SessionState::AwaitingPassword {
                    username: line.to_string(),
                };
                Reply::Continue("Password: ".to_string())
            }
            SessionState::AwaitingPassword { username } => {
                if self.app.credentials.authenticate(&username, line) {
                    info!("Console: authenticated as {username}");
                    self.state = SessionState::Authenticated;
                    Reply::Continue(format!(
                        "Welcome to smsgw {} console\r\nType quit to exit\r\n{PROMPT}",
                        env!("CARGO_PKG_VERSION")
                    ))
                } else {
                    info!("Console: authentication failed for {username}");
                    Reply::Close(AUTH_FAILED.to_string())
                }
            }
            SessionState::Authenticated => match line.to_ascii_lowercase().as_str() {
                "quit" | "exit" => Reply::Close(String::new()),
                "help" => {
                    self.state = SessionState::Authenticated;
                    Reply::Continue(format!("{HELP}{PROMPT}"))
                }
                "status" => {
                    self.state = SessionState::Authenticated;
                    Reply::Continue(format!("{}{PROMPT}", self.status_line()))
                }
                _ => {
                    self.state = SessionState::Authenticated;
                    Reply::Continue(format!("{UNKNOWN}{PROMPT}"))
                }
            },
            SessionState::Closed => Reply::Close(String::new()),
        }
    }

    fn status_line(&self) -> String {
        format!(
            "{} is running - uptime {}s, {} message(s) accepted\r\n",
            self.app.config.server.service_name,
            self.app.start_time.elapsed().as_secs(),
            self.app.submissions.accepted_count()
        )
    }
}

/// Accept console connections until the listener fails or the task is
/// dropped. Bound to the configured session cap.
pub async fn serve(listener: TcpListener, state: AppState) {
    let idle_timeout = Duration::from_secs(state.config.server.console_idle_timeout_secs);
    let semaphore = Arc::new(Semaphore::new(state.config.server.max_console_sessions));

    loop {
        let permit = match Arc::clone(&semaphore).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => return,
        };

        match listener.accept().await {
            Ok((stream, peer)) => {
                let state = state.clone();
                tokio::spawn(async move {
                    info!("Console session from {peer} opened");
                    if let Err(e) = handle_session(stream, state, idle_timeout).await {
                        debug!("Console session from {peer} ended: {e}");
                    }
                    info!("Console session from {peer} closed");
                    drop(permit);
                });
            }
            Err(e) => {
                debug!("Console accept failed: {e}");
                drop(permit);
            }
        }
    }
}

/// Drive one connection through the state machine until it closes.
///
/// A read timeout, EOF, or non-UTF-8 input tears the session down; nothing
/// here can affect other sessions or the accept loop.
async fn handle_session(stream: TcpStream, state: AppState, idle_timeout: Duration) -> Result<()> {
    let (read_half, mut writer) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut session = ConsoleSession::new(state);

    if writer
        .write_all(ConsoleSession::greeting().as_bytes())
        .await
        .is_err()
    {
        return Ok(());
    }

    let mut line = String::new();
    loop {
        line.clear();
        let read = tokio::time::timeout(idle_timeout, reader.read_line(&mut line))
            .await
            .map_err(|_| Error::Timeout)?
            .map_err(|e| Error::ProtocolViolation(e.to_string()))?;

        if read == 0 {
            // Client closed the connection.
            return Ok(());
        }

        match session.handle_line(&line) {
            Reply::Continue(text) => {
                if writer.write_all(text.as_bytes()).await.is_err() {
                    return Ok(());
                }
            }
            Reply::Close(text) => {
                if !text.is_empty() {
                    let _ = writer.write_all(text.as_bytes()).await;
                }
                return Ok(());
            }
        }
    }
}

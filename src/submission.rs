//! Message submission service.
//!
//! Accepts validated outbound message requests, assigns each a UUID, and
//! records it in an append-only in-memory log held for the lifetime of the
//! process. "Submission" is acknowledgement of acceptance only — no delivery
//! semantics are modeled; the delivery daemon is a black box behind the
//! health probe.
//!
//! ## Design
//!
//! - **Append-only log**: `Vec<SubmissionRecord>` behind a `RwLock`. Appends
//!   go through the single write lock, preserving insertion order; records
//!   are never mutated after insertion and never persisted.
//! - **Validation before authentication**: empty `destination`/`content`
//!   fails with `InvalidRequest` regardless of credential validity and
//!   appends nothing.
//! - **Rejected submissions are recorded**: a failed authentication appends
//!   a `Rejected` record before the call fails with `Unauthorized`.
//! - **One log line per submission** — destination, truncated content
//!   preview, assigned id. Passwords never reach the log.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::auth::CredentialStore;
use crate::error::{Error, Result};
use crate::util::truncate_str;

/// Max chars of message content echoed into the log line.
const PREVIEW_CHARS: usize = 40;

/// Outcome of a submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Accepted,
    Rejected,
}

/// One outbound message request, built per call and discarded afterwards.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    pub username: String,
    pub password: String,
    pub destination: String,
    pub content: String,
}

/// One entry in the submission log.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionRecord {
    pub message_id: Uuid,
    pub destination: String,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: OffsetDateTime,
    pub status: SubmissionStatus,
}

/// Append-only in-memory log of submissions, shared across handlers.
///
/// Cloneable handle — all clones share the same inner log.
#[derive(Debug, Clone)]
pub struct SubmissionLog {
    records: Arc<RwLock<Vec<SubmissionRecord>>>,
    accepted: Arc<AtomicU64>,
    credentials: Arc<CredentialStore>,
}

impl SubmissionLog {
    pub fn new(credentials: Arc<CredentialStore>) -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            accepted: Arc::new(AtomicU64::new(0)),
            credentials,
        }
    }

    /// Process one submission request.
    ///
    /// Validates required fields, authenticates, assigns a fresh message id,
    /// and appends the record. Authentication failure is immediately
    /// terminal — no retry.
    pub async fn submit(&self, request: &SubmissionRequest) -> Result<SubmissionRecord> {
        if request.destination.is_empty() {
            return Err(Error::InvalidRequest("Missing required field: to".to_string()));
        }
        if request.content.is_empty() {
            return Err(Error::InvalidRequest(
                "Missing required field: content".to_string(),
            ));
        }

        let authenticated = self
            .credentials
            .authenticate(&request.username, &request.password);

        let record = SubmissionRecord {
            message_id: Uuid::new_v4(),
            destination: request.destination.clone(),
            content: request.content.clone(),
            submitted_at: OffsetDateTime::now_utc(),
            status: if authenticated {
                SubmissionStatus::Accepted
            } else {
                SubmissionStatus::Rejected
            },
        };

        let preview = truncate_str(&record.content, PREVIEW_CHARS);
        match record.status {
            SubmissionStatus::Accepted => {
                info!(
                    "Submission {} accepted: to={} content=\"{preview}\"",
                    record.message_id, record.destination
                );
            }
            SubmissionStatus::Rejected => {
                info!(
                    "Submission {} rejected (auth): to={} content=\"{preview}\"",
                    record.message_id, record.destination
                );
            }
        }

        {
            let mut records = self.records.write().await;
            records.push(record.clone());
        }

        if authenticated {
            self.accepted.fetch_add(1, Ordering::Relaxed);
            Ok(record)
        } else {
            Err(Error::Unauthorized)
        }
    }

    /// Total records appended this process lifetime (accepted and rejected).
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Number of accepted submissions this process lifetime.
    #[must_use]
    pub fn accepted_count(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    /// Most recent `n` records, oldest first.
    pub async fn recent(&self, n: usize) -> Vec<SubmissionRecord> {
        let records = self.records.read().await;
        let start = records.len().saturating_sub(n);
        records[start..].to_vec()
    }
}

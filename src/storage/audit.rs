// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Audit logging for encrypt/decrypt attempts.
//!
//! Every attempt, successful or not, produces exactly one immutable
//! [`LogRecord`] keyed by client address and timestamp.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::log_store::{LogSink, LogStoreError};

/// Longest `data` kept verbatim, in characters.
pub const MAX_LOG_DATA_CHARS: usize = 2048;

/// Appended after the kept prefix when `data` was cut.
pub const TRUNCATION_MARKER: &str = "...[truncated]";

/// An audit log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LogRecord {
    /// Unique, server-generated identifier.
    pub id: String,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    /// Client address that made the request.
    pub ip: String,
    /// Outcome text, at most 2048 characters plus the truncation marker.
    pub data: String,
}

impl LogRecord {
    /// Create a record stamped with a fresh id and the current time.
    pub fn new(ip: impl Into<String>, outcome: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now().timestamp(),
            ip: ip.into(),
            data: bounded_log_data(outcome),
        }
    }
}

/// Cut `text` to at most `limit` characters. The flag reports whether anything
/// was dropped.
fn truncate_chars(text: &str, limit: usize) -> (&str, bool) {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => (&text[..byte_idx], true),
        None => (text, false),
    }
}

/// Apply the log length bound. The marker goes after the kept 2048 characters,
/// so a truncated value is `MAX_LOG_DATA_CHARS + TRUNCATION_MARKER.len()` long.
pub fn bounded_log_data(text: &str) -> String {
    let (kept, truncated) = truncate_chars(text, MAX_LOG_DATA_CHARS);
    if truncated {
        format!("{kept}{TRUNCATION_MARKER}")
    } else {
        kept.to_owned()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("Audit log is unavailable. The request was not completed.")]
    LogWriteFailed(#[source] LogStoreError),
}

/// Writes one record per attempt to the configured sink.
#[derive(Clone)]
pub struct AuditLogger {
    sink: Arc<dyn LogSink>,
}

impl AuditLogger {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// Record an attempt and wait for the write to commit.
    ///
    /// The write runs on the blocking pool and is a single store transaction;
    /// dropping this future early never leaves a partial record.
    pub async fn record_attempt(&self, ip: &str, outcome: &str) -> Result<LogRecord, AuditError> {
        let record = LogRecord::new(ip, outcome);
        let sink = Arc::clone(&self.sink);
        let to_write = record.clone();

        tokio::task::spawn_blocking(move || sink.append(&to_write))
            .await
            .map_err(|e| AuditError::LogWriteFailed(LogStoreError::Task(e.to_string())))?
            .map_err(AuditError::LogWriteFailed)?;

        Ok(record)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::storage::log_store::{LogStore, LogStoreResult, Page};

    /// Sink whose backend is always unavailable.
    pub(crate) struct UnavailableSink;

    impl LogSink for UnavailableSink {
        fn append(&self, _record: &LogRecord) -> LogStoreResult<()> {
            Err(LogStoreError::Io(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "store offline",
            )))
        }
    }

    #[test]
    fn new_record_has_unique_id_and_current_time() {
        let before = Utc::now().timestamp();
        let a = LogRecord::new("192.168.1.1", "encrypt ok");
        let b = LogRecord::new("192.168.1.1", "encrypt ok");
        let after = Utc::now().timestamp();

        assert_ne!(a.id, b.id);
        assert!((before..=after).contains(&a.timestamp));
        assert_eq!(a.ip, "192.168.1.1");
        assert_eq!(a.data, "encrypt ok");
    }

    #[test]
    fn data_at_limit_is_kept_verbatim() {
        let text = "x".repeat(MAX_LOG_DATA_CHARS);
        assert_eq!(bounded_log_data(&text), text);
    }

    #[test]
    fn marker_is_appended_beyond_limit() {
        let text = "x".repeat(MAX_LOG_DATA_CHARS + 1);
        let bounded = bounded_log_data(&text);

        assert!(bounded.ends_with(TRUNCATION_MARKER));
        assert_eq!(
            bounded.chars().count(),
            MAX_LOG_DATA_CHARS + TRUNCATION_MARKER.chars().count()
        );
        assert_eq!(
            &bounded[..MAX_LOG_DATA_CHARS],
            &text[..MAX_LOG_DATA_CHARS]
        );
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "ü".repeat(MAX_LOG_DATA_CHARS + 10);
        let bounded = bounded_log_data(&text);

        let kept = bounded.strip_suffix(TRUNCATION_MARKER).unwrap();
        assert_eq!(kept.chars().count(), MAX_LOG_DATA_CHARS);
        assert!(kept.chars().all(|c| c == 'ü'));
    }

    #[tokio::test]
    async fn record_attempt_persists_one_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = LogStore::open(&dir.path().join("audit.redb")).unwrap();
        let logger = AuditLogger::new(Arc::new(store.clone()));

        let record = logger.record_attempt("10.1.2.3", "decrypt ok").await.unwrap();

        let stored = store.list(Page::new(0, 10).unwrap()).unwrap();
        assert_eq!(stored, vec![record]);
    }

    #[tokio::test]
    async fn unavailable_backend_is_log_write_failed() {
        let logger = AuditLogger::new(Arc::new(UnavailableSink));
        let err = logger.record_attempt("10.1.2.3", "encrypt ok").await.unwrap_err();

        assert!(matches!(err, AuditError::LogWriteFailed(_)));
        assert!(!err.to_string().contains("offline"));
    }
}

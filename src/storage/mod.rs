// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Audit Storage Module
//!
//! The only shared state in the service: one flat log relation held in an
//! embedded redb database under `DATA_DIR`.
//!
//! ## Storage Layout
//!
//! ```text
//! $DATA_DIR/
//!   audit.redb
//!     logs          # id -> LogRecord (JSON)
//!     logs_by_time  # (!timestamp, !seq) -> id
//!     log_meta      # insertion sequence counter
//! ```
//!
//! The store handle is constructed once at startup and passed explicitly to
//! the audit logger and the log endpoints.

pub mod audit;
pub mod log_store;

pub use audit::{AuditError, AuditLogger, LogRecord, MAX_LOG_DATA_CHARS, TRUNCATION_MARKER};
pub use log_store::{
    run_blocking, LogSink, LogStore, LogStoreError, LogStoreResult, Page, PageError,
    MAX_PAGE_SIZE,
};

/// File name of the audit database inside the data directory.
pub const AUDIT_DB_FILE: &str = "audit.redb";

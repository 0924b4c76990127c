// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded audit log database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `logs`: id → serialized LogRecord
//! - `logs_by_time`: composite key (!timestamp|!seq) → id
//! - `log_meta`: key → u64 (insertion sequence counter)
//!
//! Every mutation is a single write transaction: a record is either fully
//! visible (row + index entry) or absent.

use std::path::Path;
use std::sync::Arc;

use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition,
};

use super::audit::LogRecord;

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: id → serialized LogRecord (JSON bytes).
const LOGS: TableDefinition<&str, &[u8]> = TableDefinition::new("logs");

/// Index: composite key → id.
/// Key format: `!timestamp_be | !seq_be` for newest-first forward scans.
const LOG_TIME_INDEX: TableDefinition<&[u8], &str> = TableDefinition::new("logs_by_time");

/// Store metadata: key → u64.
const LOG_META: TableDefinition<&str, u64> = TableDefinition::new("log_meta");

const NEXT_SEQ_KEY: &str = "next_seq";

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: usize = 100;

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum LogStoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("duplicate log id: {0}")]
    DuplicateId(String),

    #[error("storage task failed: {0}")]
    Task(String),
}

pub type LogStoreResult<T> = Result<T, LogStoreError>;

// =============================================================================
// Pagination
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("size must be between 1 and {MAX_PAGE_SIZE}")]
pub struct PageError;

/// Validated offset/size window over the newest-first log sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    offset: usize,
    size: usize,
}

impl Page {
    pub fn new(offset: usize, size: usize) -> Result<Self, PageError> {
        if (1..=MAX_PAGE_SIZE).contains(&size) {
            Ok(Self { offset, size })
        } else {
            Err(PageError)
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

// =============================================================================
// Index Key Helpers
// =============================================================================

/// Build a composite key for the logs_by_time table.
///
/// Both halves are inverted so a forward scan yields the newest timestamp
/// first and, within one timestamp, the latest insertion first.
fn make_index_key(timestamp: i64, seq: u64) -> [u8; 16] {
    // Flip the sign bit so signed timestamps sort as unsigned.
    let ordered = (timestamp as u64) ^ (1 << 63);
    let mut key = [0u8; 16];
    key[..8].copy_from_slice(&(!ordered).to_be_bytes());
    key[8..].copy_from_slice(&(!seq).to_be_bytes());
    key
}

// =============================================================================
// Sink seam
// =============================================================================

/// Append-only destination for audit records.
///
/// [`LogStore`] is the production implementation; the seam exists so the
/// audit path can be exercised against an unavailable backend.
pub trait LogSink: Send + Sync {
    fn append(&self, record: &LogRecord) -> LogStoreResult<()>;
}

// =============================================================================
// LogStore
// =============================================================================

/// Handle to the audit log database. Cheap to clone.
#[derive(Clone)]
pub struct LogStore {
    db: Arc<Database>,
}

impl LogStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> LogStoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(LOGS)?;
            let _ = write_txn.open_table(LOG_TIME_INDEX)?;
            let _ = write_txn.open_table(LOG_META)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Insert a record and its index entry in one transaction.
    ///
    /// Fails with [`LogStoreError::DuplicateId`] if the id is already present;
    /// nothing is written in that case.
    pub fn append(&self, record: &LogRecord) -> LogStoreResult<()> {
        let json = serde_json::to_vec(record)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut logs = write_txn.open_table(LOGS)?;
            if logs.get(record.id.as_str())?.is_some() {
                return Err(LogStoreError::DuplicateId(record.id.clone()));
            }

            let mut meta = write_txn.open_table(LOG_META)?;
            let seq = meta.get(NEXT_SEQ_KEY)?.map(|v| v.value()).unwrap_or(0);
            meta.insert(NEXT_SEQ_KEY, seq + 1)?;

            logs.insert(record.id.as_str(), json.as_slice())?;

            let mut index = write_txn.open_table(LOG_TIME_INDEX)?;
            let key = make_index_key(record.timestamp, seq);
            index.insert(key.as_slice(), record.id.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Newest-first page of records.
    pub fn list(&self, page: Page) -> LogStoreResult<Vec<LogRecord>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(LOG_TIME_INDEX)?;
        let logs = read_txn.open_table(LOGS)?;

        let mut records = Vec::with_capacity(page.size());
        for entry in index.iter()?.skip(page.offset()).take(page.size()) {
            let (_, id) = entry?;
            if let Some(value) = logs.get(id.value())? {
                records.push(serde_json::from_slice(value.value())?);
            }
        }

        Ok(records)
    }

    /// Number of stored records.
    pub fn count(&self) -> LogStoreResult<u64> {
        let read_txn = self.db.begin_read()?;
        let logs = read_txn.open_table(LOGS)?;
        Ok(logs.len()?)
    }

    /// Delete every record. Returns how many were removed.
    ///
    /// Both tables are dropped and recreated inside one write transaction, so
    /// readers see either the full log or an empty one.
    pub fn clear(&self) -> LogStoreResult<u64> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let logs = write_txn.open_table(LOGS)?;
            logs.len()?
        };
        write_txn.delete_table(LOGS)?;
        write_txn.delete_table(LOG_TIME_INDEX)?;
        {
            let _ = write_txn.open_table(LOGS)?;
            let _ = write_txn.open_table(LOG_TIME_INDEX)?;
        }
        write_txn.commit()?;
        Ok(removed)
    }
}

impl LogSink for LogStore {
    fn append(&self, record: &LogRecord) -> LogStoreResult<()> {
        LogStore::append(self, record)
    }
}

/// Run a blocking store operation off the async executor.
pub async fn run_blocking<T, F>(op: F) -> LogStoreResult<T>
where
    F: FnOnce() -> LogStoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| LogStoreError::Task(e.to_string()))?
}

// =============================================================================
// Tests
// =============================================================================

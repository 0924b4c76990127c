// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::gateway::CryptoGateway;
use crate::storage::{AuditLogger, LogStore};

#[derive(Clone)]
pub struct AppState {
    pub gateway: CryptoGateway,
    pub logs: LogStore,
}

impl AppState {
    /// Wire the audit logger and log endpoints to the same store handle.
    pub fn new(logs: LogStore) -> Self {
        let audit = AuditLogger::new(Arc::new(logs.clone()));
        Self {
            gateway: CryptoGateway::new(audit),
            logs,
        }
    }
}

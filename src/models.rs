// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies for the REST API. All types derive serde and
//! `ToSchema` for JSON handling and OpenAPI documentation.
//!
//! ## Model Categories
//!
//! - **Transforms**: encrypt/decrypt requests and the shared `{data}` response
//! - **Keys**: key inspection
//! - **Logs**: audit log pages and clearing

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::storage::LogRecord;

// =============================================================================
// Transform Models
// =============================================================================

/// Request to encrypt UTF-8 text with an RSA public key.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EncryptRequest {
    /// PEM-encoded RSA public key (SPKI or PKCS#1).
    pub key: String,
    /// UTF-8 plaintext.
    pub data: String,
}

/// Request to decrypt base64 ciphertext with an RSA private key.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DecryptRequest {
    /// PEM-encoded RSA private key (PKCS#8 or PKCS#1, unencrypted).
    pub key: String,
    /// Standard base64 ciphertext, padded, no whitespace.
    pub data: String,
}

/// Result of an encrypt (base64) or decrypt (UTF-8) call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DataResponse {
    pub data: String,
}

/// Reject empty fields before the pipeline runs.
fn require(field: &str, value: &str) -> Result<(), ApiError> {
    if value.is_empty() {
        Err(ApiError::unprocessable(format!("{field} is required")))
    } else {
        Ok(())
    }
}

impl EncryptRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require("key", &self.key)?;
        require("data", &self.data)
    }
}

impl DecryptRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require("key", &self.key)?;
        require("data", &self.data)
    }
}

// =============================================================================
// Key Models
// =============================================================================

/// Request to inspect a PEM key without using it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InspectKeyRequest {
    /// PEM-encoded RSA public or private key.
    pub key: String,
}

/// Summary of a parsed key. Never includes key material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct KeyInfo {
    /// `public` or `private`.
    pub kind: String,
    /// Modulus size in bits.
    pub bits: usize,
    /// Largest plaintext, in bytes, that one encrypt call accepts.
    pub max_plaintext_bytes: usize,
    /// SHA-256 fingerprint of the public key, `SHA256:<base64>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

// =============================================================================
// Log Models
// =============================================================================

fn default_page_size() -> usize {
    10
}

/// Pagination query for the audit log.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LogsQuery {
    /// Page size, 1 to 100.
    #[serde(default = "default_page_size")]
    #[param(default = 10, minimum = 1, maximum = 100)]
    pub size: usize,
    /// Number of newest records to skip.
    #[serde(default)]
    #[param(default = 0, minimum = 0)]
    pub offset: usize,
}

/// One page of audit records, newest first.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LogsResponse {
    pub items: Vec<LogRecord>,
}

/// Result of clearing the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ClearLogsResponse {
    pub cleared: bool,
    /// Number of records removed.
    pub removed: u64,
}

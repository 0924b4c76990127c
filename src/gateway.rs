// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request pipeline: key loading, transform, then exactly one audit write.
//!
//! The audit write always happens before a result is handed back, whether the
//! transform succeeded or not. If the write fails the caller gets
//! [`GatewayError::Audit`] instead of the transform outcome, so a response is
//! never observed without its record.

use crate::crypto::{self, CryptoError, DecryptFailure};
use crate::storage::{AuditError, AuditLogger};

/// The two audited operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Encrypt,
    Decrypt,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Encrypt => "encrypt",
            Operation::Decrypt => "decrypt",
        }
    }

    /// Audit text for an outcome: `"<op> ok"` or `"<op> error: <message>"`,
    /// where the message is exactly what the caller receives.
    pub fn outcome_text(&self, result: &Result<String, CryptoError>) -> String {
        match result {
            Ok(_) => format!("{} ok", self.as_str()),
            Err(err) => format!("{} error: {}", self.as_str(), err),
        }
    }

    fn aborted(&self) -> CryptoError {
        match self {
            Operation::Encrypt => CryptoError::EncryptionFailed,
            Operation::Decrypt => CryptoError::DecryptionFailed(DecryptFailure::Aborted),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Audit(#[from] AuditError),
}

/// Encrypt/decrypt entry point used by the API layer.
#[derive(Clone)]
pub struct CryptoGateway {
    audit: AuditLogger,
}

impl CryptoGateway {
    pub fn new(audit: AuditLogger) -> Self {
        Self { audit }
    }

    /// Encrypt `plaintext` under the RSA public key in `key_pem`.
    pub async fn encrypt(
        &self,
        ip: &str,
        key_pem: String,
        plaintext: String,
    ) -> Result<String, GatewayError> {
        let op = Operation::Encrypt;
        let result = tokio::task::spawn_blocking(move || {
            let key = crypto::load_public_key(&key_pem)?;
            crypto::encrypt(&key, &plaintext)
        })
        .await
        .unwrap_or_else(|_| Err(op.aborted()));

        self.finish(op, ip, result).await
    }

    /// Decrypt base64 `ciphertext` with the RSA private key in `key_pem`.
    pub async fn decrypt(
        &self,
        ip: &str,
        key_pem: String,
        ciphertext: String,
    ) -> Result<String, GatewayError> {
        let op = Operation::Decrypt;
        let result = tokio::task::spawn_blocking(move || {
            let key = crypto::load_private_key(&key_pem)?;
            crypto::decrypt(&key, &ciphertext)
        })
        .await
        .unwrap_or_else(|_| Err(op.aborted()));

        self.finish(op, ip, result).await
    }

    async fn finish(
        &self,
        op: Operation,
        ip: &str,
        result: Result<String, CryptoError>,
    ) -> Result<String, GatewayError> {
        if let Err(err) = &result {
            tracing::info!(
                operation = op.as_str(),
                error_code = err.error_code(),
                cause = err.diagnostic().as_deref().unwrap_or("-"),
                "Crypto transform rejected"
            );
        }

        let outcome = op.outcome_text(&result);
        match self.audit.record_attempt(ip, &outcome).await {
            Ok(record) => {
                tracing::debug!(operation = op.as_str(), log_id = %record.id, "Audit record written");
            }
            Err(err) => {
                tracing::error!(
                    operation = op.as_str(),
                    error = ?std::error::Error::source(&err),
                    "Audit write failed, withholding result"
                );
                return Err(err.into());
            }
        }

        result.map_err(GatewayError::from)
    }
}

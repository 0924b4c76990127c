// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Crypto error taxonomy.
//!
//! Every variant renders a fixed, caller-safe message. Parser output, padding
//! details and the like never reach `Display`; the fields that carry them are
//! for operator diagnostics only.

use std::fmt;

/// Which kind of key the caller was expected to supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Public,
    Private,
    /// Either kind was acceptable (key inspection).
    Any,
}

impl KeyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyKind::Public => "public",
            KeyKind::Private => "private",
            KeyKind::Any => "any",
        }
    }
}

/// Why a key was rejected. Diagnostic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRejection {
    /// Not PEM, wrong label, wrong algorithm or malformed DER.
    Unparsable,
    /// Parsed, but the private key components are inconsistent.
    Inconsistent,
}

/// Why a decryption failed. Diagnostic only, never shown to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecryptFailure {
    /// Ciphertext length differs from the modulus size.
    LengthMismatch,
    /// OAEP unpadding failed (wrong key or corrupted ciphertext).
    Unpad,
    /// Recovered plaintext is not valid UTF-8.
    NotUtf8,
    /// The blocking worker running the transform did not complete.
    Aborted,
}

impl fmt::Display for DecryptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cause = match self {
            DecryptFailure::LengthMismatch => "ciphertext_length_mismatch",
            DecryptFailure::Unpad => "oaep_unpad",
            DecryptFailure::NotUtf8 => "plaintext_not_utf8",
            DecryptFailure::Aborted => "worker_aborted",
        };
        f.write_str(cause)
    }
}

/// Closed set of outcomes for a failed key load or transform.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    #[error("{}", invalid_key_message(.kind))]
    InvalidKey { kind: KeyKind, reason: KeyRejection },

    #[error("Encryption failed. Your payload may be too large for this RSA key.")]
    PayloadTooLarge { len: usize, max: usize },

    #[error("Encryption failed.")]
    EncryptionFailed,

    #[error("Ciphertext is not valid base64.")]
    InvalidCiphertextEncoding,

    #[error("Decryption failed. Check that the key matches and the ciphertext is valid.")]
    DecryptionFailed(DecryptFailure),
}

fn invalid_key_message(kind: &KeyKind) -> &'static str {
    match kind {
        KeyKind::Public => "Invalid public key. Provide a PEM-formatted RSA public key.",
        KeyKind::Private => "Invalid private key. Provide a PEM-formatted RSA private key.",
        KeyKind::Any => "Invalid key. Provide a PEM-formatted RSA key.",
    }
}

impl CryptoError {
    pub(crate) fn invalid_key(kind: KeyKind, reason: KeyRejection) -> Self {
        CryptoError::InvalidKey { kind, reason }
    }

    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            CryptoError::InvalidKey { .. } => "invalid_key",
            CryptoError::PayloadTooLarge { .. } => "payload_too_large",
            CryptoError::EncryptionFailed => "encryption_failed",
            CryptoError::InvalidCiphertextEncoding => "invalid_ciphertext_encoding",
            CryptoError::DecryptionFailed(_) => "decryption_failed",
        }
    }

    /// Internal cause for operator logs. `None` when the code says it all.
    pub fn diagnostic(&self) -> Option<String> {
        match self {
            CryptoError::InvalidKey { reason, .. } => Some(format!("{reason:?}")),
            CryptoError::PayloadTooLarge { len, max } => {
                Some(format!("payload {len} bytes exceeds capacity {max} bytes"))
            }
            CryptoError::DecryptionFailed(cause) => Some(cause.to_string()),
            CryptoError::EncryptionFailed | CryptoError::InvalidCiphertextEncoding => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decrypt_failures_render_identically() {
        let messages: Vec<String> = [
            DecryptFailure::LengthMismatch,
            DecryptFailure::Unpad,
            DecryptFailure::NotUtf8,
            DecryptFailure::Aborted,
        ]
        .into_iter()
        .map(|cause| CryptoError::DecryptionFailed(cause).to_string())
        .collect();

        assert!(messages.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(
            messages[0],
            "Decryption failed. Check that the key matches and the ciphertext is valid."
        );
    }

    #[test]
    fn invalid_key_message_depends_only_on_kind() {
        let unparsable = CryptoError::invalid_key(KeyKind::Private, KeyRejection::Unparsable);
        let inconsistent = CryptoError::invalid_key(KeyKind::Private, KeyRejection::Inconsistent);
        assert_eq!(unparsable.to_string(), inconsistent.to_string());
        assert_eq!(
            CryptoError::invalid_key(KeyKind::Any, KeyRejection::Unparsable).to_string(),
            "Invalid key. Provide a PEM-formatted RSA key."
        );
    }

    #[test]
    fn payload_too_large_hides_sizes() {
        let err = CryptoError::PayloadTooLarge { len: 300, max: 190 };
        assert!(!err.to_string().contains("300"));
        assert!(err.diagnostic().unwrap().contains("190"));
        assert_eq!(err.error_code(), "payload_too_large");
    }
}

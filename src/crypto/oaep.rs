// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! RSA-OAEP transforms.
//!
//! Padding is OAEP with SHA-256 as both the label hash and the MGF1 hash, and
//! an empty label. Ciphertext travels as standard padded base64.
//!
//! These functions are pure and never log; the caller decides what to record.

use base64ct::{Base64, Encoding};
use rand::rngs::OsRng;
use rsa::Oaep;
use sha2::Sha256;

use super::error::{CryptoError, DecryptFailure};
use super::keys::{PrivateKeyHandle, PublicKeyHandle};

/// SHA-256 output length.
pub const HASH_LEN: usize = 32;

fn padding() -> Oaep {
    Oaep::new::<Sha256>()
}

/// Largest plaintext, in bytes, that fits in one OAEP block for `key`.
pub fn max_plaintext_len(key: &PublicKeyHandle) -> usize {
    key.size_bytes().saturating_sub(2 * HASH_LEN + 2)
}

/// Encrypt UTF-8 text and return base64 ciphertext of exactly one block.
pub fn encrypt(key: &PublicKeyHandle, plaintext: &str) -> Result<String, CryptoError> {
    let message = plaintext.as_bytes();
    let max = max_plaintext_len(key);
    if message.len() > max {
        return Err(CryptoError::PayloadTooLarge {
            len: message.len(),
            max,
        });
    }

    let ciphertext = key
        .as_rsa()
        .encrypt(&mut OsRng, padding(), message)
        .map_err(|_| CryptoError::EncryptionFailed)?;

    Ok(Base64::encode_string(&ciphertext))
}

/// Decrypt base64 ciphertext back to UTF-8 text.
///
/// Base64 must be canonical: padding present, no whitespace. Every failure
/// after decoding collapses into [`CryptoError::DecryptionFailed`]; the
/// [`DecryptFailure`] it carries is for operator logs only.
pub fn decrypt(key: &PrivateKeyHandle, ciphertext_b64: &str) -> Result<String, CryptoError> {
    let ciphertext =
        Base64::decode_vec(ciphertext_b64).map_err(|_| CryptoError::InvalidCiphertextEncoding)?;

    if ciphertext.len() != key.size_bytes() {
        return Err(CryptoError::DecryptionFailed(DecryptFailure::LengthMismatch));
    }

    let plaintext = key
        .as_rsa()
        .decrypt_blinded(&mut OsRng, padding(), &ciphertext)
        .map_err(|_| CryptoError::DecryptionFailed(DecryptFailure::Unpad))?;

    String::from_utf8(plaintext)
        .map_err(|_| CryptoError::DecryptionFailed(DecryptFailure::NotUtf8))
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # RSA-OAEP Key Loading and Transforms
//!
//! - `keys` - parse untrusted PEM text into typed, validated key handles
//! - `oaep` - RSA-OAEP (SHA-256) encrypt/decrypt with base64 ciphertext
//! - `error` - the closed error taxonomy shared by both
//!
//! Nothing in this module logs or touches shared state; callers may run it
//! concurrently without coordination.

pub mod error;
pub mod keys;
pub mod oaep;

#[cfg(test)]
pub(crate) mod test_keys;

pub use error::{CryptoError, DecryptFailure, KeyKind, KeyRejection};
pub use keys::{load_key, load_private_key, load_public_key, KeyHandle, PrivateKeyHandle, PublicKeyHandle};
pub use oaep::{decrypt, encrypt, max_plaintext_len};

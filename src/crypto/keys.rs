// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! PEM key loading.
//!
//! Keys arrive as untrusted text on every request. Public keys are accepted as
//! SPKI (`BEGIN PUBLIC KEY`) or PKCS#1 (`BEGIN RSA PUBLIC KEY`); private keys as
//! PKCS#8 (`BEGIN PRIVATE KEY`) or PKCS#1 (`BEGIN RSA PRIVATE KEY`). Anything
//! else, including non-RSA SPKI/PKCS#8 documents and encrypted private keys,
//! is rejected with [`CryptoError::InvalidKey`].
//!
//! Handles live for a single request and are never persisted.
//!
//! Moduli up to [`MAX_MODULUS_BITS`] are accepted for both kinds.

use base64ct::{Base64Unpadded, Encoding};
use rsa::{
    pkcs1::{self, der::Decode, DecodeRsaPrivateKey},
    pkcs8::{
        der::Document,
        spki::{ObjectIdentifier, SubjectPublicKeyInfoRef},
        DecodePrivateKey, EncodePublicKey,
    },
    traits::PublicKeyParts,
    BigUint, RsaPrivateKey, RsaPublicKey,
};
use sha2::{Digest, Sha256};

use super::error::{CryptoError, KeyKind, KeyRejection};

/// Largest accepted modulus, in bits, for public and private keys alike.
pub const MAX_MODULUS_BITS: usize = 16384;

/// `rsaEncryption` algorithm identifier.
const RSA_ENCRYPTION_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

/// Validated RSA public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyHandle(RsaPublicKey);

/// Validated RSA private key.
#[derive(Debug, Clone)]
pub struct PrivateKeyHandle(RsaPrivateKey);

/// Either kind of validated RSA key.
#[derive(Debug, Clone)]
pub enum KeyHandle {
    Public(PublicKeyHandle),
    Private(PrivateKeyHandle),
}

impl PublicKeyHandle {
    /// Modulus size in bytes (the RSA block size).
    pub fn size_bytes(&self) -> usize {
        self.0.size()
    }

    pub fn bits(&self) -> usize {
        self.0.n().bits() as usize
    }

    /// OpenSSH-style fingerprint of the SubjectPublicKeyInfo DER:
    /// `SHA256:<unpadded base64>`.
    pub fn fingerprint(&self) -> Option<String> {
        let der = self.0.to_public_key_der().ok()?;
        let digest = Sha256::digest(der.as_bytes());
        Some(format!("SHA256:{}", Base64Unpadded::encode_string(&digest)))
    }

    pub(crate) fn as_rsa(&self) -> &RsaPublicKey {
        &self.0
    }
}

impl From<RsaPublicKey> for PublicKeyHandle {
    fn from(key: RsaPublicKey) -> Self {
        PublicKeyHandle(key)
    }
}

impl PrivateKeyHandle {
    pub fn size_bytes(&self) -> usize {
        self.0.size()
    }

    pub fn public_key(&self) -> PublicKeyHandle {
        PublicKeyHandle(self.0.to_public_key())
    }

    pub(crate) fn as_rsa(&self) -> &RsaPrivateKey {
        &self.0
    }
}

impl KeyHandle {
    pub fn kind(&self) -> KeyKind {
        match self {
            KeyHandle::Public(_) => KeyKind::Public,
            KeyHandle::Private(_) => KeyKind::Private,
        }
    }

    pub fn public_key(&self) -> PublicKeyHandle {
        match self {
            KeyHandle::Public(key) => key.clone(),
            KeyHandle::Private(key) => key.public_key(),
        }
    }
}

/// Strip a leading BOM, carriage returns and surrounding whitespace.
///
/// Browsers and clipboard tools routinely add all three.
pub(crate) fn normalize_pem(pem_text: &str) -> String {
    pem_text
        .trim_start_matches('\u{feff}')
        .replace('\r', "")
        .trim()
        .to_owned()
}

/// Parse PEM text as an RSA public key.
pub fn load_public_key(pem_text: &str) -> Result<PublicKeyHandle, CryptoError> {
    decode_public_key(&normalize_pem(pem_text))
        .map(PublicKeyHandle)
        .ok_or_else(|| CryptoError::invalid_key(KeyKind::Public, KeyRejection::Unparsable))
}

/// Decode SPKI or PKCS#1 PEM into a public key, honouring [`MAX_MODULUS_BITS`]
/// rather than the `rsa` crate's 4096-bit default.
fn decode_public_key(pem: &str) -> Option<RsaPublicKey> {
    let (label, document) = Document::from_pem(pem).ok()?;

    let spki;
    let pkcs1_der = match label {
        "PUBLIC KEY" => {
            spki = SubjectPublicKeyInfoRef::try_from(document.as_bytes()).ok()?;
            if spki.algorithm.oid != RSA_ENCRYPTION_OID {
                return None;
            }
            spki.subject_public_key.as_bytes()?
        }
        "RSA PUBLIC KEY" => document.as_bytes(),
        _ => return None,
    };

    let key = pkcs1::RsaPublicKey::from_der(pkcs1_der).ok()?;
    RsaPublicKey::new_with_max_size(
        BigUint::from_bytes_be(key.modulus.as_bytes()),
        BigUint::from_bytes_be(key.public_exponent.as_bytes()),
        MAX_MODULUS_BITS,
    )
    .ok()
}

/// Parse PEM text as an unencrypted RSA private key and check its consistency.
pub fn load_private_key(pem_text: &str) -> Result<PrivateKeyHandle, CryptoError> {
    let pem = normalize_pem(pem_text);
    let key = RsaPrivateKey::from_pkcs8_pem(&pem)
        .or_else(|_| RsaPrivateKey::from_pkcs1_pem(&pem))
        .map_err(|_| CryptoError::invalid_key(KeyKind::Private, KeyRejection::Unparsable))?;

    if (key.n().bits() as usize) > MAX_MODULUS_BITS {
        return Err(CryptoError::invalid_key(KeyKind::Private, KeyRejection::Unparsable));
    }

    key.validate()
        .map_err(|_| CryptoError::invalid_key(KeyKind::Private, KeyRejection::Inconsistent))?;

    Ok(PrivateKeyHandle(key))
}

/// Parse PEM text as whichever kind of RSA key it holds.
pub fn load_key(pem_text: &str) -> Result<KeyHandle, CryptoError> {
    if let Ok(public) = load_public_key(pem_text) {
        return Ok(KeyHandle::Public(public));
    }

    load_private_key(pem_text)
        .map(KeyHandle::Private)
        .map_err(|err| match err {
            CryptoError::InvalidKey { reason, .. } => CryptoError::invalid_key(KeyKind::Any, reason),
            other => other,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::test_keys::{
        pkcs1_private_pem, pkcs1_public_pem, private_pem, public_pem, EC_PRIVATE_PEM,
        EC_PUBLIC_PEM, ENCRYPTED_PRIVATE_PEM, PRIMARY,
    };
    use crate::crypto::{encrypt, max_plaintext_len};
    use rsa::{pkcs1::EncodeRsaPublicKey, pkcs8::LineEnding};

    /// Public key with an odd `bits`-wide modulus. Not a real key pair, but
    /// encoding and public-key encryption only need `n` and `e`.
    fn wide_public_key(bits: usize) -> RsaPublicKey {
        let n = (BigUint::from(1u32) << (bits - 1)) + BigUint::from(1u32);
        RsaPublicKey::new_unchecked(n, BigUint::from(65537u32))
    }

    fn assert_invalid(result: Result<impl std::fmt::Debug, CryptoError>, expected: KeyKind) {
        match result {
            Err(CryptoError::InvalidKey { kind, .. }) => assert_eq!(kind, expected),
            other => panic!("expected InvalidKey({expected:?}), got {other:?}"),
        }
    }

    #[test]
    fn loads_spki_and_pkcs1_public_keys() {
        let spki = load_public_key(&public_pem(&PRIMARY)).unwrap();
        let pkcs1 = load_public_key(&pkcs1_public_pem(&PRIMARY)).unwrap();
        assert_eq!(spki, pkcs1);
        assert_eq!(spki.size_bytes(), 256);
        assert_eq!(spki.bits(), 2048);
    }

    #[test]
    fn loads_pkcs8_and_pkcs1_private_keys() {
        let pkcs8 = load_private_key(&private_pem(&PRIMARY)).unwrap();
        let pkcs1 = load_private_key(&pkcs1_private_pem(&PRIMARY)).unwrap();
        assert_eq!(pkcs8.public_key(), pkcs1.public_key());
        assert_eq!(pkcs8.size_bytes(), 256);
    }

    #[test]
    fn tolerates_bom_crlf_and_padding_whitespace() {
        let pem = format!(
            "\u{feff}\n  {}\n\n",
            public_pem(&PRIMARY).replace('\n', "\r\n")
        );
        assert!(load_public_key(&pem).is_ok());
    }

    #[test]
    fn rejects_garbage_as_invalid_key() {
        assert_invalid(load_public_key("not a key"), KeyKind::Public);
        assert_invalid(load_private_key(""), KeyKind::Private);
        assert_invalid(
            load_public_key("-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PUBLIC KEY-----"),
            KeyKind::Public,
        );
    }

    #[test]
    fn rejects_wrong_kind() {
        assert_invalid(load_public_key(&private_pem(&PRIMARY)), KeyKind::Public);
        assert_invalid(load_private_key(&public_pem(&PRIMARY)), KeyKind::Private);
    }

    #[test]
    fn rejects_encrypted_private_keys() {
        assert_invalid(load_private_key(ENCRYPTED_PRIVATE_PEM), KeyKind::Private);
        assert_invalid(load_key(ENCRYPTED_PRIVATE_PEM), KeyKind::Any);
    }

    #[test]
    fn accepts_public_keys_beyond_4096_bits() {
        let key = wide_public_key(8192);
        let spki = key.to_public_key_pem(LineEnding::LF).unwrap();
        let pkcs1 = key.to_pkcs1_pem(LineEnding::LF).unwrap();

        let handle = load_public_key(&spki).unwrap();
        assert_eq!(handle, load_public_key(&pkcs1).unwrap());
        assert_eq!(handle.bits(), 8192);
        assert_eq!(handle.size_bytes(), 1024);
        assert_eq!(max_plaintext_len(&handle), 1024 - 2 * 32 - 2);

        let ciphertext = encrypt(&handle, "hello").unwrap();
        assert_eq!(ciphertext.len(), 1368);
    }

    #[test]
    fn rejects_moduli_above_the_cap() {
        let at_cap = wide_public_key(MAX_MODULUS_BITS);
        assert!(load_public_key(&at_cap.to_public_key_pem(LineEnding::LF).unwrap()).is_ok());

        let over = wide_public_key(MAX_MODULUS_BITS + 8);
        assert_invalid(
            load_public_key(&over.to_public_key_pem(LineEnding::LF).unwrap()),
            KeyKind::Public,
        );
        assert_invalid(
            load_public_key(&over.to_pkcs1_pem(LineEnding::LF).unwrap()),
            KeyKind::Public,
        );
    }

    #[test]
    fn rejects_non_rsa_keys() {
        assert_invalid(load_public_key(EC_PUBLIC_PEM), KeyKind::Public);
        assert_invalid(load_private_key(EC_PRIVATE_PEM), KeyKind::Private);
        assert_invalid(load_key(EC_PUBLIC_PEM), KeyKind::Any);
    }

    #[test]
    fn error_message_never_contains_parser_detail() {
        let err = load_public_key("-----BEGIN PUBLIC KEY-----\n!!!\n-----END PUBLIC KEY-----")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid public key. Provide a PEM-formatted RSA public key."
        );
    }

    #[test]
    fn load_key_detects_kind() {
        let public = load_key(&public_pem(&PRIMARY)).unwrap();
        let private = load_key(&private_pem(&PRIMARY)).unwrap();
        assert_eq!(public.kind(), KeyKind::Public);
        assert_eq!(private.kind(), KeyKind::Private);
        assert_eq!(public.public_key(), private.public_key());
    }

    #[test]
    fn fingerprint_is_stable_across_encodings() {
        let from_public = load_public_key(&public_pem(&PRIMARY)).unwrap();
        let from_private = load_private_key(&private_pem(&PRIMARY)).unwrap().public_key();

        let fingerprint = from_public.fingerprint().unwrap();
        assert!(fingerprint.starts_with("SHA256:"));
        assert_eq!(fingerprint.len(), "SHA256:".len() + 43);
        assert_eq!(Some(fingerprint), from_private.fingerprint());
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Encrypt, decrypt and key inspection endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use super::client_ip::ClientIp;
use crate::{
    crypto::{self, KeyHandle},
    error::{ApiError, ErrorBody},
    models::{DataResponse, DecryptRequest, EncryptRequest, InspectKeyRequest, KeyInfo},
    state::AppState,
};

/// Fixed message for unreadable request bodies. The parser's own text is
/// only traced.
const INVALID_BODY_MESSAGE: &str = "Request body must be a JSON object with string fields.";

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            tracing::debug!(status = %rejection.status(), reason = %rejection.body_text(), "Rejected request body");
            Err(ApiError::unprocessable(INVALID_BODY_MESSAGE))
        }
    }
}

/// Encrypt UTF-8 text with an RSA public key (OAEP, SHA-256).
///
/// Every call is recorded in the audit log before the response is sent.
#[utoipa::path(
    post,
    path = "/api/v1/encrypt",
    request_body = EncryptRequest,
    tag = "Crypto",
    responses(
        (status = 200, description = "Base64 ciphertext", body = DataResponse),
        (status = 400, description = "Invalid key or payload too large", body = ErrorBody),
        (status = 422, description = "Missing key or data, or unreadable body", body = ErrorBody),
        (status = 503, description = "Audit log unavailable", body = ErrorBody)
    )
)]
pub async fn encrypt(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    body: Result<Json<EncryptRequest>, JsonRejection>,
) -> Result<Json<DataResponse>, ApiError> {
    let request = json_body(body)?;
    request.validate()?;
    let data = state.gateway.encrypt(&ip, request.key, request.data).await?;
    Ok(Json(DataResponse { data }))
}

/// Decrypt base64 ciphertext with an RSA private key (OAEP, SHA-256).
///
/// Padding, key-mismatch and encoding failures after base64 decoding all
/// produce the same response.
#[utoipa::path(
    post,
    path = "/api/v1/decrypt",
    request_body = DecryptRequest,
    tag = "Crypto",
    responses(
        (status = 200, description = "UTF-8 plaintext", body = DataResponse),
        (status = 400, description = "Invalid key, invalid base64 or decryption failed", body = ErrorBody),
        (status = 422, description = "Missing key or data, or unreadable body", body = ErrorBody),
        (status = 503, description = "Audit log unavailable", body = ErrorBody)
    )
)]
pub async fn decrypt(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    body: Result<Json<DecryptRequest>, JsonRejection>,
) -> Result<Json<DataResponse>, ApiError> {
    let request = json_body(body)?;
    request.validate()?;
    let data = state.gateway.decrypt(&ip, request.key, request.data).await?;
    Ok(Json(DataResponse { data }))
}

/// Report the kind, size and fingerprint of a PEM key. Not audited.
#[utoipa::path(
    post,
    path = "/api/v1/keys/inspect",
    request_body = InspectKeyRequest,
    tag = "Keys",
    responses(
        (status = 200, description = "Key summary", body = KeyInfo),
        (status = 400, description = "Not a PEM-formatted RSA key", body = ErrorBody),
        (status = 422, description = "Unreadable request body", body = ErrorBody)
    )
)]
pub async fn inspect_key(
    body: Result<Json<InspectKeyRequest>, JsonRejection>,
) -> Result<Json<KeyInfo>, ApiError> {
    let request = json_body(body)?;
    let key: KeyHandle = crypto::load_key(&request.key)?;
    let public = key.public_key();
    let fingerprint = public.fingerprint();
    if fingerprint.is_none() {
        tracing::debug!(kind = key.kind().as_str(), "Key fingerprint unavailable: DER encoding failed");
    }

    Ok(Json(KeyInfo {
        kind: key.kind().as_str().to_string(),
        bits: public.bits(),
        max_plaintext_bytes: crypto::max_plaintext_len(&public),
        fingerprint,
    }))
}

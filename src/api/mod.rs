// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::ErrorBody,
    models::{
        ClearLogsResponse, DataResponse, DecryptRequest, EncryptRequest, InspectKeyRequest,
        KeyInfo, LogsResponse,
    },
    state::AppState,
    storage::LogRecord,
};

pub mod client_ip;
pub mod crypto;
pub mod health;
pub mod logs;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/encrypt", post(crypto::encrypt))
        .route("/decrypt", post(crypto::decrypt))
        .route("/keys/inspect", post(crypto::inspect_key))
        .route("/logs", get(logs::list_logs).delete(logs::clear_logs));

    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .nest("/api/v1", v1_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        health::readiness,
        crypto::encrypt,
        crypto::decrypt,
        crypto::inspect_key,
        logs::list_logs,
        logs::clear_logs
    ),
    components(
        schemas(
            EncryptRequest,
            DecryptRequest,
            DataResponse,
            InspectKeyRequest,
            KeyInfo,
            LogRecord,
            LogsResponse,
            ClearLogsResponse,
            ErrorBody,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Crypto", description = "RSA-OAEP encryption and decryption"),
        (name = "Keys", description = "Key inspection"),
        (name = "Logs", description = "Audit log access")
    )
)]
struct ApiDoc;

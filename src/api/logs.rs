// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Audit log endpoints.
//!
//! Reading and clearing are unauthenticated, matching the rest of the API.
//! Neither operation writes an audit record.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

use crate::{
    error::{ApiError, ErrorBody},
    models::{ClearLogsResponse, LogsQuery, LogsResponse},
    state::AppState,
    storage::{run_blocking, Page},
};

/// List audit records, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/logs",
    tag = "Logs",
    params(LogsQuery),
    responses(
        (status = 200, description = "One page of audit records", body = LogsResponse),
        (status = 422, description = "Page size or offset out of range", body = ErrorBody),
        (status = 503, description = "Audit log unavailable", body = ErrorBody)
    )
)]
pub async fn list_logs(
    State(state): State<AppState>,
    query: Result<Query<LogsQuery>, QueryRejection>,
) -> Result<Json<LogsResponse>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::unprocessable(rejection.body_text()))?;
    let page = Page::new(query.offset, query.size)?;
    let store = state.logs.clone();
    let items = run_blocking(move || store.list(page)).await?;
    Ok(Json(LogsResponse { items }))
}

/// Remove every audit record in one atomic step.
#[utoipa::path(
    delete,
    path = "/api/v1/logs",
    tag = "Logs",
    responses(
        (status = 200, description = "Log cleared", body = ClearLogsResponse),
        (status = 503, description = "Audit log unavailable", body = ErrorBody)
    )
)]
pub async fn clear_logs(State(state): State<AppState>) -> Result<Json<ClearLogsResponse>, ApiError> {
    let store = state.logs.clone();
    let removed = run_blocking(move || store.clear()).await?;
    tracing::info!(removed, "Audit log cleared");

    Ok(Json(ClearLogsResponse {
        cleared: true,
        removed,
    }))
}

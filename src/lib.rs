// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! RSA Gateway - RSA-OAEP Encryption Service with Audit Log
//!
//! This crate provides an HTTP service that encrypts and decrypts short UTF-8
//! payloads with caller-supplied RSA keys and records every attempt in an
//! embedded audit log.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `crypto` - PEM key loading and RSA-OAEP (SHA-256) transforms
//! - `gateway` - request pipeline tying transforms to audit writes
//! - `storage` - audit log (redb)
//! - `config` / `telemetry` - startup configuration and tracing

pub mod api;
pub mod config;
pub mod crypto;
pub mod error;
pub mod gateway;
pub mod models;
pub mod state;
pub mod storage;
pub mod telemetry;

// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! HTTP routes.
//!
//! Everything except `/health` lives under `/api` behind
//! [`require_user`](crate::auth::require_user). Mutations answer `{"ok": true}`;
//! updates and deletes that match nothing still succeed.

use std::sync::Arc;

use axum::extract::{FromRequest, FromRequestParts};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router, middleware};
use daystreak_core::{Clock, Persistence, SystemClock};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{AllowList, require_user};
use crate::error::ApiError;

pub mod days;
pub mod reminders;
pub mod stats;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// Storage backend.
    pub persistence: Arc<dyn Persistence>,
    /// Source of "now" and "today".
    pub clock: Arc<dyn Clock>,
    /// Users permitted to call `/api`.
    pub allowed_users: AllowList,
}

impl AppState {
    /// State with the system clock and an open allow-list.
    pub fn new(persistence: Arc<dyn Persistence>) -> Self {
        Self {
            persistence,
            clock: Arc::new(SystemClock),
            allowed_users: AllowList::default(),
        }
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Restrict `/api` to the given users; an empty list keeps it open.
    pub fn with_allowed_users(mut self, ids: impl IntoIterator<Item = String>) -> Self {
        self.allowed_users = AllowList::new(ids);
        self
    }
}

/// JSON body extractor answering 400 `{error}` on malformed input.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path extractor answering 400 `{error}` on malformed input.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Query extractor answering 400 `{error}` on malformed input.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/days", get(days::list_days))
        .route("/days/{date}", get(days::get_day))
        .route("/days/{date}/blocks", post(days::add_block))
        .route(
            "/days/{date}/blocks/{block_id}",
            patch(days::rename_block).delete(days::delete_block),
        )
        .route("/days/{date}/blocks/{block_id}/tasks", post(days::add_task))
        .route(
            "/days/{date}/tasks/{task_id}",
            patch(days::update_task).delete(days::delete_task),
        )
        .route(
            "/reminders",
            get(reminders::list_reminders).post(reminders::add_reminder),
        )
        .route("/reminders/{reminder_id}", delete(reminders::delete_reminder))
        .route("/stats", get(stats::get_stats))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "ok".
    pub status: &'static str,
    /// Server version.
    pub version: &'static str,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

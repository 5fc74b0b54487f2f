// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Common test infrastructure for daystreak-server integration tests.
//!
//! Provides TestContext wrapping an in-memory database, a manual clock and
//! the router, plus helpers for sending JSON requests through it.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use chrono::{NaiveDate, TimeZone, Utc};
use daystreak_core::{ManualClock, SqlitePersistence};
use daystreak_server::routes::{AppState, router};
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

pub const USER: &str = "alice";

/// 2024-01-15 09:00:00 UTC.
pub fn start_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub async fn test_persistence() -> Arc<SqlitePersistence> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory pool");
    daystreak_core::migrations::run_sqlite(&pool)
        .await
        .expect("Failed to run migrations");
    Arc::new(SqlitePersistence::new(pool))
}

/// Router under test with its storage and clock.
pub struct TestContext {
    pub app: Router,
    pub persistence: Arc<SqlitePersistence>,
    pub clock: Arc<ManualClock>,
}

impl TestContext {
    /// Open router, clock frozen at [`start_time`].
    pub async fn new() -> Self {
        Self::with_allowed_users(Vec::new()).await
    }

    /// Router restricted to `users`.
    pub async fn with_allowed_users(users: Vec<&str>) -> Self {
        let persistence = test_persistence().await;
        let clock = Arc::new(ManualClock::new(start_time()));
        let state = AppState::new(persistence.clone())
            .with_clock(clock.clone())
            .with_allowed_users(users.into_iter().map(String::from));
        Self {
            app: router(state),
            persistence,
            clock,
        }
    }

    /// Send a request as [`USER`].
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.request_as(Some(USER), method, uri, body).await
    }

    /// Send a request with an optional `x-user-id`.
    pub async fn request_as(
        &self,
        user: Option<&str>,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("x-user-id", user);
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    /// Send a prepared request.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }
}

// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration for the daystreak client.

use std::time::Duration;

use crate::error::{ClientError, Result};

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:3001";

/// Configuration for [`DaystreakClient`](crate::DaystreakClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL, without the `/api` suffix.
    pub base_url: String,
    /// Identity sent in the `x-user-id` header.
    pub user_id: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Configuration for `user_id` against the default server.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            user_id: user_id.into(),
            request_timeout: Duration::from_secs(10),
        }
    }

    /// Create a configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DAYSTREAK_API_URL`: Server base URL (default: "http://localhost:3001")
    /// - `DAYSTREAK_USER_ID`: User identity (required)
    /// - `DAYSTREAK_REQUEST_TIMEOUT_MS`: Request timeout in milliseconds (default: 10000)
    pub fn from_env() -> Result<Self> {
        let user_id = std::env::var("DAYSTREAK_USER_ID")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| ClientError::Config("DAYSTREAK_USER_ID is required".to_string()))?;

        let base_url =
            std::env::var("DAYSTREAK_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let request_timeout_ms: u64 = std::env::var("DAYSTREAK_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "10000".to_string())
            .parse()
            .map_err(|e| {
                ClientError::Config(format!("invalid DAYSTREAK_REQUEST_TIMEOUT_MS: {}", e))
            })?;

        Ok(Self::new(user_id)
            .with_base_url(base_url)
            .with_request_timeout(Duration::from_millis(request_timeout_ms)))
    }

    /// Set the server base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

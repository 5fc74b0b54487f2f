// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Daystreak Client
//!
//! Request layer and application state for a daystreak server.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────────┐  HTTP + x-user-id  ┌──────────────────┐
//! │ daystreak-ctl│────►│ AppStore         │───────────────────►│ daystreak-server │
//! │ (or any app) │     │ days · reminders │   TrackerApi       │ /api/...         │
//! └──────────────┘     │ local medals     │                    └──────────────────┘
//!                      └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use daystreak_client::{AppStore, ClientConfig, DaystreakClient};
//!
//! let client = DaystreakClient::new(ClientConfig::new("alice"))?;
//! let mut store = AppStore::new(client);
//! store.init().await?;
//!
//! let block = store.add_block("Morning").await?;
//! let task = store.add_task(&block, "Run").await?;
//! store.toggle_task(&task).await?;
//!
//! println!("streak: {}", store.streak());
//! ```

#![deny(missing_docs)]

/// Request surface the store depends on.
pub mod api;

/// HTTP implementation of the request surface.
pub mod client;

/// Client configuration.
pub mod config;

/// Error types.
pub mod error;

/// Application state store.
pub mod store;

pub use api::TrackerApi;
pub use client::{DaystreakClient, HealthStatus};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use store::{AppStore, local_timestamp_ms};

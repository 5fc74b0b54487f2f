// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Daystreak Server - HTTP API and Reminder Dispatch
//!
//! An axum server responsible for:
//! - Day, block and task CRUD under `/api`, scoped by the `x-user-id` header
//! - Reminder CRUD and period statistics
//! - A background dispatcher that delivers due reminders through Telegram
//!
//! # Embedding
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use daystreak_core::SqlitePersistence;
//! use daystreak_server::runtime::ServerRuntime;
//!
//! let persistence = Arc::new(SqlitePersistence::from_path(".data/daystreak.db").await?);
//! let runtime = ServerRuntime::builder()
//!     .persistence(persistence)
//!     .bind_addr("127.0.0.1:3001".parse()?)
//!     .build()?
//!     .start()
//!     .await?;
//!
//! runtime.shutdown().await?;
//! ```
//!
//! # Modules
//!
//! - [`auth`]: `x-user-id` identity and allow-list middleware
//! - [`config`]: Environment configuration
//! - [`dispatcher`]: Reminder dispatch loop
//! - [`error`]: API error type and JSON error bodies
//! - [`notifier`]: Message delivery seam and the Telegram backend
//! - [`routes`]: REST handlers and router
//! - [`runtime`]: Embeddable runtime owning the server and dispatcher tasks

#![deny(missing_docs)]

/// Request identity and allow-list check.
pub mod auth;

/// Configuration loaded from environment variables.
pub mod config;

/// Background reminder dispatcher.
pub mod dispatcher;

/// API error type.
pub mod error;

/// Outbound message delivery.
pub mod notifier;

/// HTTP routes.
pub mod routes;

/// Embeddable runtime.
pub mod runtime;

pub use config::Config;
pub use dispatcher::{DispatchReport, DispatcherConfig, ReminderDispatcher};
pub use error::ApiError;
pub use routes::{AppState, router};
pub use runtime::ServerRuntime;

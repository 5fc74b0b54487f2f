// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Embeddable runtime for daystreak-server.
//!
//! [`ServerRuntime`] owns the HTTP server task and, when a notifier and at
//! least one recipient are configured, the reminder dispatcher task.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use daystreak_core::SqlitePersistence;
//! use daystreak_server::notifier::TelegramNotifier;
//! use daystreak_server::runtime::ServerRuntime;
//!
//! let persistence = Arc::new(SqlitePersistence::from_path(".data/daystreak.db").await?);
//! let notifier = Arc::new(TelegramNotifier::new(token, DEFAULT_TELEGRAM_API_URL, timeout)?);
//!
//! let runtime = ServerRuntime::builder()
//!     .persistence(persistence)
//!     .notifier(notifier)
//!     .dispatcher_config(DispatcherConfig {
//!         recipients: vec!["123456".to_string()],
//!         ..DispatcherConfig::default()
//!     })
//!     .build()?
//!     .start()
//!     .await?;
//!
//! runtime.shutdown().await?;
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use daystreak_core::{Clock, Persistence, SystemClock};
use tokio::net::TcpListener;
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::dispatcher::{DispatcherConfig, ReminderDispatcher};
use crate::notifier::Notifier;
use crate::routes::{AppState, router};

/// Builder for creating a [`ServerRuntime`].
pub struct ServerRuntimeBuilder {
    persistence: Option<Arc<dyn Persistence>>,
    notifier: Option<Arc<dyn Notifier>>,
    clock: Arc<dyn Clock>,
    bind_addr: SocketAddr,
    allowed_users: Vec<String>,
    dispatcher_config: DispatcherConfig,
}

impl Default for ServerRuntimeBuilder {
    fn default() -> Self {
        Self {
            persistence: None,
            notifier: None,
            clock: Arc::new(SystemClock),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3001)),
            allowed_users: Vec::new(),
            dispatcher_config: DispatcherConfig::default(),
        }
    }
}

impl ServerRuntimeBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the persistence layer (required).
    pub fn persistence(mut self, persistence: Arc<dyn Persistence>) -> Self {
        self.persistence = Some(persistence);
        self
    }

    /// Set the notifier used for reminders.
    ///
    /// Without one the dispatcher is not started.
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Set the clock shared by handlers and the dispatcher.
    ///
    /// Default: [`SystemClock`]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Set the HTTP bind address.
    ///
    /// Default: `0.0.0.0:3001`
    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Restrict `/api` to these user ids. An empty list leaves it open.
    pub fn allowed_users(mut self, ids: impl IntoIterator<Item = String>) -> Self {
        self.allowed_users = ids.into_iter().collect();
        self
    }

    /// Set the dispatcher configuration.
    pub fn dispatcher_config(mut self, config: DispatcherConfig) -> Self {
        self.dispatcher_config = config;
        self
    }

    /// Build the runtime configuration.
    ///
    /// Returns an error if required fields are missing.
    pub fn build(self) -> Result<ServerRuntimeConfig> {
        let persistence = self
            .persistence
            .ok_or_else(|| anyhow::anyhow!("persistence is required"))?;

        Ok(ServerRuntimeConfig {
            persistence,
            notifier: self.notifier,
            clock: self.clock,
            bind_addr: self.bind_addr,
            allowed_users: self.allowed_users,
            dispatcher_config: self.dispatcher_config,
        })
    }
}

/// Configuration for a [`ServerRuntime`].
pub struct ServerRuntimeConfig {
    persistence: Arc<dyn Persistence>,
    notifier: Option<Arc<dyn Notifier>>,
    clock: Arc<dyn Clock>,
    bind_addr: SocketAddr,
    allowed_users: Vec<String>,
    dispatcher_config: DispatcherConfig,
}

impl ServerRuntimeConfig {
    /// Bind the listener and spawn the server and dispatcher tasks.
    pub async fn start(self) -> Result<ServerRuntime> {
        let state = AppState::new(self.persistence.clone())
            .with_clock(self.clock.clone())
            .with_allowed_users(self.allowed_users);

        if state.allowed_users.is_open() {
            warn!("No allowed users configured; any x-user-id is accepted");
        }

        let dispatcher = match self.notifier {
            Some(notifier) if !self.dispatcher_config.recipients.is_empty() => {
                let dispatcher = ReminderDispatcher::new(
                    self.persistence.clone(),
                    notifier,
                    self.dispatcher_config,
                )
                .with_clock(self.clock.clone());
                let shutdown = dispatcher.shutdown_handle();
                let handle = tokio::spawn(async move {
                    dispatcher.run().await;
                });
                Some((handle, shutdown))
            }
            Some(_) => {
                warn!("Notifier configured without recipients; reminders will not be sent");
                None
            }
            None => None,
        };

        let listener = TcpListener::bind(self.bind_addr).await?;
        let local_addr = listener.local_addr()?;

        let (server_shutdown_tx, server_shutdown_rx) = watch::channel(false);
        let app = router(state);
        let server_handle = tokio::spawn(run_http_server(listener, app, server_shutdown_rx));

        info!(
            addr = %local_addr,
            reminders = dispatcher.is_some(),
            "ServerRuntime started"
        );

        let (dispatcher_handle, dispatcher_shutdown) = dispatcher.unzip();

        Ok(ServerRuntime {
            server_handle,
            dispatcher_handle,
            server_shutdown_tx,
            dispatcher_shutdown,
            local_addr,
        })
    }
}

/// A running daystreak server that can be embedded in an application.
///
/// Call [`shutdown`](Self::shutdown) for graceful termination.
pub struct ServerRuntime {
    server_handle: JoinHandle<Result<()>>,
    dispatcher_handle: Option<JoinHandle<()>>,
    server_shutdown_tx: watch::Sender<bool>,
    dispatcher_shutdown: Option<Arc<Notify>>,
    local_addr: SocketAddr,
}

impl ServerRuntime {
    /// Create a new builder for configuring the runtime.
    pub fn builder() -> ServerRuntimeBuilder {
        ServerRuntimeBuilder::new()
    }

    /// Address the HTTP server is listening on.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Whether the reminder dispatcher was started.
    pub fn reminders_enabled(&self) -> bool {
        self.dispatcher_handle.is_some()
    }

    /// Gracefully shut down the runtime.
    ///
    /// Stops the dispatcher after its current tick, then lets the HTTP server
    /// finish in-flight requests.
    pub async fn shutdown(self) -> Result<()> {
        info!("ServerRuntime shutting down...");

        let _ = self.server_shutdown_tx.send(true);

        if let Some(shutdown) = &self.dispatcher_shutdown {
            shutdown.notify_one();
        }

        if let Some(handle) = self.dispatcher_handle
            && let Err(e) = handle.await
        {
            error!("Reminder dispatcher task panicked: {}", e);
        }

        match self.server_handle.await {
            Ok(Ok(())) => {
                info!("ServerRuntime shutdown complete");
                Ok(())
            }
            Ok(Err(e)) => {
                error!("HTTP server error during shutdown: {}", e);
                Err(e)
            }
            Err(e) => {
                error!("HTTP server task panicked: {}", e);
                Err(anyhow::anyhow!("server task panicked: {}", e))
            }
        }
    }

    /// Check if the runtime is still running.
    pub fn is_running(&self) -> bool {
        let dispatcher_running = self
            .dispatcher_handle
            .as_ref()
            .is_none_or(|h| !h.is_finished());

        !self.server_handle.is_finished() && dispatcher_running
    }
}

async fn run_http_server(
    listener: TcpListener,
    app: axum::Router,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            while shutdown_rx.changed().await.is_ok() {
                if *shutdown_rx.borrow() {
                    break;
                }
            }
            info!("HTTP server received shutdown signal");
        })
        .await?;
    Ok(())
}

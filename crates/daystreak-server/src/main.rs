// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Daystreak Server - Day Planner API and Reminder Dispatch
//!
//! An HTTP server responsible for:
//! - Per-user days, blocks and tasks with derived medals
//! - Reminders delivered through the Telegram Bot API
//! - Completion statistics and streaks

use std::sync::Arc;
use tracing::{info, warn};

use daystreak_core::SqlitePersistence;
use daystreak_server::config::Config;
use daystreak_server::notifier::{Notifier, TelegramNotifier};
use daystreak_server::runtime::ServerRuntime;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "daystreak_server=info,tower_http=info".into()),
        )
        .init();

    // Load .env file if present
    if let Err(e) = dotenvy::dotenv() {
        warn!("No .env file loaded: {}", e);
    }

    let config = Config::from_env()?;

    info!(
        http_addr = %config.http_addr,
        database_path = %config.database_path.display(),
        allowed_users = config.allowed_user_ids.len(),
        "Starting Daystreak server"
    );

    let persistence = Arc::new(SqlitePersistence::from_path(&config.database_path).await?);
    info!("Database ready");

    let mut builder = ServerRuntime::builder()
        .persistence(persistence)
        .bind_addr(config.http_addr)
        .allowed_users(config.allowed_user_ids.clone())
        .dispatcher_config(config.dispatcher.clone());

    if config.reminders_enabled() {
        if let Some(notifier) = TelegramNotifier::from_settings(&config.telegram)? {
            info!(
                notifier = notifier.notifier_type(),
                recipients = config.dispatcher.recipients.len(),
                "Reminder delivery enabled"
            );
            builder = builder.notifier(Arc::new(notifier));
        }
    } else {
        info!("Telegram not configured; reminders will not be sent");
    }

    let runtime = builder.build()?.start().await?;

    info!(addr = %runtime.local_addr(), "Daystreak server ready");

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    runtime.shutdown().await?;

    info!("Daystreak server shut down");

    Ok(())
}

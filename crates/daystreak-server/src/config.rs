// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration loading from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::dispatcher::DispatcherConfig;

/// Default Telegram Bot API base URL.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Daystreak server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file
    pub database_path: PathBuf,
    /// HTTP server address
    pub http_addr: SocketAddr,
    /// Users allowed to call the API; empty means anyone
    pub allowed_user_ids: Vec<String>,
    /// Telegram Bot API settings
    pub telegram: TelegramSettings,
    /// Reminder dispatch loop settings, including recipients
    pub dispatcher: DispatcherConfig,
}

/// Telegram Bot API settings.
#[derive(Debug, Clone)]
pub struct TelegramSettings {
    /// Bot token; `None` disables reminder delivery
    pub bot_token: Option<String>,
    /// API base URL
    pub api_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional (with defaults):
    /// - `DAYSTREAK_DATABASE_PATH`: SQLite file (default: .data/daystreak.db)
    /// - `DAYSTREAK_PORT`: HTTP port (default: 3001)
    /// - `DAYSTREAK_ALLOWED_USER_IDS`: comma-separated allow-list (default: open)
    /// - `DAYSTREAK_TELEGRAM_BOT_TOKEN`: bot token (default: unset, reminders disabled)
    /// - `DAYSTREAK_TELEGRAM_CHAT_IDS`: comma-separated recipients (default: none)
    /// - `DAYSTREAK_TELEGRAM_API_URL`: API base (default: https://api.telegram.org)
    /// - `DAYSTREAK_TELEGRAM_TIMEOUT_MS`: request timeout (default: 30000)
    /// - `DAYSTREAK_REMINDER_POLL_SECS`: dispatch interval, 1-60 (default: 10)
    /// - `DAYSTREAK_REMINDER_BATCH_SIZE`: reminders per tick (default: 50)
    /// - `DAYSTREAK_REMINDER_HEADER`: first line of every message (default: "🔔 Reminder")
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_path = std::env::var("DAYSTREAK_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".data/daystreak.db"));

        let port: u16 = std::env::var("DAYSTREAK_PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("DAYSTREAK_PORT", "must be a valid port number"))?;

        let allowed_user_ids =
            parse_list(&std::env::var("DAYSTREAK_ALLOWED_USER_IDS").unwrap_or_default());

        let bot_token = std::env::var("DAYSTREAK_TELEGRAM_BOT_TOKEN")
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let recipients =
            parse_list(&std::env::var("DAYSTREAK_TELEGRAM_CHAT_IDS").unwrap_or_default());

        let api_url = std::env::var("DAYSTREAK_TELEGRAM_API_URL")
            .unwrap_or_else(|_| DEFAULT_TELEGRAM_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout_ms: u64 = std::env::var("DAYSTREAK_TELEGRAM_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".to_string())
            .parse()
            .ok()
            .filter(|ms| *ms > 0)
            .ok_or(ConfigError::Invalid(
                "DAYSTREAK_TELEGRAM_TIMEOUT_MS",
                "must be a positive number of milliseconds",
            ))?;

        let poll_secs: u64 = std::env::var("DAYSTREAK_REMINDER_POLL_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .ok()
            .filter(|secs| (1..=60).contains(secs))
            .ok_or(ConfigError::Invalid(
                "DAYSTREAK_REMINDER_POLL_SECS",
                "must be between 1 and 60 seconds",
            ))?;

        let batch_size: u32 = std::env::var("DAYSTREAK_REMINDER_BATCH_SIZE")
            .unwrap_or_else(|_| "50".to_string())
            .parse()
            .ok()
            .filter(|size| *size > 0)
            .ok_or(ConfigError::Invalid(
                "DAYSTREAK_REMINDER_BATCH_SIZE",
                "must be a positive integer",
            ))?;

        let mut dispatcher = DispatcherConfig {
            poll_interval: Duration::from_secs(poll_secs),
            batch_size,
            recipients,
            ..DispatcherConfig::default()
        };
        if let Ok(header) = std::env::var("DAYSTREAK_REMINDER_HEADER") {
            dispatcher.header = header;
        }

        Ok(Self {
            database_path,
            http_addr: SocketAddr::from(([0, 0, 0, 0], port)),
            allowed_user_ids,
            telegram: TelegramSettings {
                bot_token,
                api_url,
                timeout: Duration::from_millis(timeout_ms),
            },
            dispatcher,
        })
    }

    /// Whether reminders can be delivered: a bot token and at least one recipient.
    pub fn reminders_enabled(&self) -> bool {
        self.telegram.bot_token.is_some() && !self.dispatcher.recipients.is_empty()
    }
}

/// Split a comma-separated list, dropping blanks.
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, &'static str),
}

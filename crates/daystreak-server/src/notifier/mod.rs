// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Notifier module - outbound message delivery backends.
//!
//! The dispatcher only knows the [`Notifier`] trait. [`TelegramNotifier`]
//! talks to the Telegram Bot API; [`MockNotifier`] records deliveries for
//! tests.

pub mod mock;
pub mod telegram;

pub use mock::{Delivery, MockNotifier};
pub use telegram::TelegramNotifier;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from notifier operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NotifyError {
    /// The request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// The messaging API answered but refused the message.
    #[error("API error (status {status}): {description}")]
    Api {
        /// HTTP status of the response.
        status: u16,
        /// Reason reported by the API.
        description: String,
    },

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL embeds the bot token.
        Self::Http(err.without_url())
    }
}

/// Result type for notifier operations.
pub type Result<T> = std::result::Result<T, NotifyError>;

/// Delivers a text message to a single recipient.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short name used in logs.
    fn notifier_type(&self) -> &'static str;

    /// Send `text` to `recipient`.
    async fn send(&self, recipient: &str, text: &str) -> Result<()>;
}

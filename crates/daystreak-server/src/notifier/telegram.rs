// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Telegram Bot API notifier.
//!
//! Sends `POST {api_url}/bot{token}/sendMessage` with `{chat_id, text}`. The
//! API reports success in the boolean `ok` field of the response body, not
//! only through the status code, so both are checked.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{Notifier, NotifyError, Result};
use crate::config::TelegramSettings;

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Notifier backed by the Telegram Bot API.
pub struct TelegramNotifier {
    client: reqwest::Client,
    api_url: String,
    bot_token: String,
}

impl TelegramNotifier {
    /// Create a notifier for `bot_token` against `api_url`.
    pub fn new(
        bot_token: impl Into<String>,
        api_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
        })
    }

    /// Create from settings; `None` when no bot token is configured.
    pub fn from_settings(settings: &TelegramSettings) -> Result<Option<Self>> {
        settings
            .bot_token
            .as_deref()
            .map(|token| Self::new(token, &settings.api_url, settings.timeout))
            .transpose()
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_url, self.bot_token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn notifier_type(&self) -> &'static str {
        "telegram"
    }

    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn send(&self, recipient: &str, text: &str) -> Result<()> {
        let response = self
            .client
            .post(self.send_message_url())
            .json(&SendMessage {
                chat_id: recipient,
                text,
            })
            .send()
            .await?;

        let status = response.status();
        let body: ApiResponse = response.json().await.map_err(|e| NotifyError::Api {
            status: status.as_u16(),
            description: format!("unreadable response: {}", e.without_url()),
        })?;

        if !body.ok {
            return Err(NotifyError::Api {
                status: status.as_u16(),
                description: body
                    .description
                    .unwrap_or_else(|| "Telegram API error".to_string()),
            });
        }

        debug!("Telegram message delivered");
        Ok(())
    }
}

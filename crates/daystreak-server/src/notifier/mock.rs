// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Mock notifier for testing.
//!
//! Records every delivered message and fails on demand for selected
//! recipients, without any network access.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Notifier, NotifyError, Result};

/// A message the mock accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Recipient the message was addressed to.
    pub recipient: String,
    /// Message text.
    pub text: String,
}

/// Mock notifier for testing.
#[derive(Debug, Clone, Default)]
pub struct MockNotifier {
    deliveries: Arc<Mutex<Vec<Delivery>>>,
    failing: Arc<Mutex<HashSet<String>>>,
    attempts: Arc<Mutex<usize>>,
}

impl MockNotifier {
    /// Create a mock that accepts every message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that rejects messages to the given recipients.
    pub fn failing_for<I, S>(recipients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            failing: Arc::new(Mutex::new(recipients.into_iter().map(Into::into).collect())),
            ..Self::default()
        }
    }

    /// Start rejecting messages to `recipient`.
    pub async fn fail_recipient(&self, recipient: &str) {
        self.failing.lock().await.insert(recipient.to_string());
    }

    /// Stop rejecting messages to `recipient`.
    pub async fn recover_recipient(&self, recipient: &str) {
        self.failing.lock().await.remove(recipient);
    }

    /// Messages accepted so far, in order.
    pub async fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().await.clone()
    }

    /// Number of send attempts, failed ones included.
    pub async fn attempts(&self) -> usize {
        *self.attempts.lock().await
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    fn notifier_type(&self) -> &'static str {
        "mock"
    }

    async fn send(&self, recipient: &str, text: &str) -> Result<()> {
        *self.attempts.lock().await += 1;

        if self.failing.lock().await.contains(recipient) {
            return Err(NotifyError::Other(format!(
                "mock delivery to {} failed",
                recipient
            )));
        }

        self.deliveries.lock().await.push(Delivery {
            recipient: recipient.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }
}

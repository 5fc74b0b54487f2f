// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Reminder dispatcher.
//!
//! Periodically polls for due reminders and delivers each one to every
//! configured recipient. A reminder is marked sent only when all recipients
//! accepted it; otherwise it stays pending and the next tick retries it for
//! every recipient, including those that already received it.
//!
//! Ticks run once at startup and then after every poll interval. A tick
//! always finishes before the next sleep starts, so ticks never overlap.

use std::sync::Arc;
use std::time::Duration;

use daystreak_core::{Clock, CoreError, DueReminder, Persistence, SystemClock};
use tokio::sync::Notify;
use tracing::{debug, error, info, warn};

use crate::notifier::Notifier;

/// Default first line of every reminder message.
pub const DEFAULT_HEADER: &str = "🔔 Reminder";

/// Dispatcher configuration.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// How often to poll for due reminders
    pub poll_interval: Duration,
    /// Maximum reminders to process per poll
    pub batch_size: u32,
    /// Header line placed above the reminder text
    pub header: String,
    /// Chat ids every reminder is sent to
    pub recipients: Vec<String>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            batch_size: 50,
            header: DEFAULT_HEADER.to_string(),
            recipients: Vec::new(),
        }
    }
}

/// A failed delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
    /// Recipient that rejected the message; `None` when marking it sent failed.
    pub recipient: Option<String>,
    /// Error message.
    pub error: String,
}

/// A due reminder left pending by a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReminder {
    /// Owner of the reminder.
    pub user_id: String,
    /// Reminder id.
    pub reminder_id: String,
    /// Why it was not marked sent.
    pub failures: Vec<DeliveryFailure>,
}

/// Outcome of one dispatch tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Reminders found due.
    pub due: usize,
    /// Reminders delivered to every recipient and marked sent.
    pub sent: usize,
    /// Reminders left pending for the next tick.
    pub pending: Vec<PendingReminder>,
}

/// Reminder dispatcher that runs as a background task.
pub struct ReminderDispatcher {
    persistence: Arc<dyn Persistence>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    config: DispatcherConfig,
    shutdown: Arc<Notify>,
}

impl ReminderDispatcher {
    /// Create a new dispatcher using the system clock.
    pub fn new(
        persistence: Arc<dyn Persistence>,
        notifier: Arc<dyn Notifier>,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            persistence,
            notifier,
            clock: Arc::new(SystemClock),
            config,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Replace the clock used to decide what is due.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Get a handle to signal shutdown.
    pub fn shutdown_handle(&self) -> Arc<Notify> {
        self.shutdown.clone()
    }

    /// Text sent for a reminder.
    pub fn format_message(&self, text: &str) -> String {
        format!("{}\n\n{}", self.config.header, text)
    }

    /// Run the dispatch loop until shutdown is signalled.
    pub async fn run(self) {
        info!(
            poll_interval_secs = self.config.poll_interval.as_secs(),
            batch_size = self.config.batch_size,
            recipients = self.config.recipients.len(),
            notifier = self.notifier.notifier_type(),
            "Reminder dispatcher started"
        );

        self.run_tick().await;

        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.notified() => {
                    info!("Reminder dispatcher shutting down");
                    break;
                }
                _ = tokio::time::sleep(self.config.poll_interval) => {
                    self.run_tick().await;
                }
            }
        }
    }

    async fn run_tick(&self) {
        match self.tick().await {
            Ok(report) if report.due == 0 => {
                debug!("No reminders due");
            }
            Ok(report) => {
                info!(
                    due = report.due,
                    sent = report.sent,
                    pending = report.pending.len(),
                    "Reminder dispatch tick complete"
                );
            }
            Err(e) => {
                error!(error = %e, "Failed to query due reminders");
            }
        }
    }

    /// Process one batch of due reminders.
    ///
    /// Only the due query can fail the tick; delivery and bookkeeping errors
    /// are reported per reminder.
    pub async fn tick(&self) -> Result<DispatchReport, CoreError> {
        if self.config.recipients.is_empty() {
            warn!("No reminder recipients configured; skipping dispatch");
            return Ok(DispatchReport::default());
        }

        let due = self
            .persistence
            .due_reminders(self.clock.now_ms(), self.config.batch_size)
            .await?;

        let mut report = DispatchReport {
            due: due.len(),
            ..DispatchReport::default()
        };

        for reminder in due {
            match self.dispatch(&reminder).await {
                Ok(()) => report.sent += 1,
                Err(failures) => report.pending.push(PendingReminder {
                    user_id: reminder.user_id,
                    reminder_id: reminder.reminder_id,
                    failures,
                }),
            }
        }

        Ok(report)
    }

    /// Deliver one reminder to every recipient, then mark it sent.
    async fn dispatch(&self, reminder: &DueReminder) -> Result<(), Vec<DeliveryFailure>> {
        let text = self.format_message(&reminder.text);
        let mut failures = Vec::new();

        for recipient in &self.config.recipients {
            if let Err(e) = self.notifier.send(recipient, &text).await {
                warn!(
                    user_id = %reminder.user_id,
                    reminder_id = %reminder.reminder_id,
                    recipient = %recipient,
                    error = %e,
                    "Failed to deliver reminder"
                );
                failures.push(DeliveryFailure {
                    recipient: Some(recipient.clone()),
                    error: e.to_string(),
                });
            }
        }

        if !failures.is_empty() {
            return Err(failures);
        }

        match self
            .persistence
            .mark_reminder_sent(&reminder.user_id, &reminder.reminder_id, self.clock.now_ms())
            .await
        {
            Ok(marked) => {
                info!(
                    user_id = %reminder.user_id,
                    reminder_id = %reminder.reminder_id,
                    scheduled_at_ms = reminder.scheduled_at_ms,
                    marked,
                    "Reminder sent"
                );
                Ok(())
            }
            Err(e) => {
                error!(
                    user_id = %reminder.user_id,
                    reminder_id = %reminder.reminder_id,
                    error = %e,
                    "Failed to mark reminder sent"
                );
                Err(vec![DeliveryFailure {
                    recipient: None,
                    error: e.to_string(),
                }])
            }
        }
    }
}

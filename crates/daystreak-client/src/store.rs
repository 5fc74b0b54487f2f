// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Application state store.
//!
//! [`AppStore`] mirrors the server's data for one user: the days loaded so
//! far, the reminders and the currently selected date. Every mutation goes
//! to the server first; local state is patched only after the request
//! succeeds, and medals are recomputed locally against the store's clock.
//!
//! ```text
//!   caller ──► AppStore ──► TrackerApi (HTTP) ──► server
//!                 │
//!                 └── patch days / reminders, refresh medals
//! ```

use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveTime, TimeZone};
use daystreak_core::model::{DayRange, NewBlock, NewReminder, NewTask, TaskPatch};
use daystreak_core::{
    Block, Clock, Day, DayMap, Reminder, Stats, StatsPeriod, SystemClock, Task, medals,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::api::TrackerApi;
use crate::error::{ClientError, Result};

/// Convert a local calendar date and wall time to milliseconds since the epoch.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant; times
/// skipped by a DST jump are rejected.
pub fn local_timestamp_ms(date: NaiveDate, time: NaiveTime) -> Result<i64> {
    Local
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .ok_or_else(|| {
            ClientError::InvalidInput(format!("{} {} does not exist locally", date, time))
        })
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn require_text(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ClientError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(value.to_string())
}

/// Client-side state for one user.
pub struct AppStore<A> {
    api: A,
    clock: Arc<dyn Clock>,
    days: DayMap,
    reminders: Vec<Reminder>,
    selected_date: NaiveDate,
}

impl<A: TrackerApi> AppStore<A> {
    /// Store backed by `api`, using the system clock.
    pub fn new(api: A) -> Self {
        Self::with_clock(api, Arc::new(SystemClock))
    }

    /// Store backed by `api` with an explicit clock; today is selected.
    pub fn with_clock(api: A, clock: Arc<dyn Clock>) -> Self {
        let selected_date = clock.today();
        Self {
            api,
            clock,
            days: DayMap::new(),
            reminders: Vec::new(),
            selected_date,
        }
    }

    /// The request layer.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Every day loaded so far.
    pub fn days(&self) -> &DayMap {
        &self.days
    }

    /// Reminders, soonest first.
    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    /// Date the day operations act on.
    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    /// Today according to the store's clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// The selected day; empty when nothing is recorded for it.
    pub fn selected_day(&self) -> Day {
        self.days
            .get(&self.selected_date)
            .cloned()
            .unwrap_or_else(|| Day::empty(self.selected_date))
    }

    /// Load the whole history and the reminders.
    pub async fn init(&mut self) -> Result<()> {
        self.days = self.api.list_days(DayRange::all()).await?;
        self.reminders = self.api.list_reminders().await?;
        self.refresh_medals();
        info!(
            days = self.days.len(),
            reminders = self.reminders.len(),
            "Store initialized"
        );
        Ok(())
    }

    /// Load the days in `range`, replacing what is cached for those dates.
    pub async fn load_days(&mut self, range: DayRange) -> Result<()> {
        let loaded = self.api.list_days(range).await?;
        self.days.retain(|date, _| !range.contains(*date));
        self.days.extend(loaded);
        self.refresh_medals();
        Ok(())
    }

    /// Select `date` and fetch it from the server.
    pub async fn select_date(&mut self, date: NaiveDate) -> Result<Day> {
        let mut day = self.api.get_day(date).await?;
        self.selected_date = date;
        day.has_medal = medals::has_medal(&day, self.today());
        if day.blocks.is_empty() {
            self.days.remove(&date);
        } else {
            self.days.insert(date, day.clone());
        }
        Ok(day)
    }

    /// Recompute `hasMedal` of every loaded day against today.
    pub fn refresh_medals(&mut self) {
        let today = self.today();
        medals::refresh_medals(&mut self.days, today);
    }

    // =========================================================================
    // Blocks
    // =========================================================================

    /// Append a block to the selected day; returns its id.
    pub async fn add_block(&mut self, name: &str) -> Result<String> {
        let block = NewBlock {
            id: new_id(),
            name: require_text("block name", name)?,
        };
        let date = self.selected_date;
        self.api.add_block(date, &block).await?;

        let day = self.days.entry(date).or_insert_with(|| Day::empty(date));
        let position = day.blocks.iter().map(|b| b.position + 1).max().unwrap_or(0);
        day.blocks.push(Block {
            id: block.id.clone(),
            name: block.name,
            position,
            tasks: Vec::new(),
        });
        self.refresh_day(date);
        debug!(block_id = %block.id, %date, "Added block");
        Ok(block.id)
    }

    /// Rename a block of the selected day.
    pub async fn rename_block(&mut self, block_id: &str, name: &str) -> Result<()> {
        let name = require_text("block name", name)?;
        let date = self.selected_date;
        self.api.rename_block(date, block_id, &name).await?;

        if let Some(block) = self.days.get_mut(&date).and_then(|d| d.block_mut(block_id)) {
            block.name = name;
        }
        Ok(())
    }

    /// Delete a block of the selected day together with its tasks.
    pub async fn delete_block(&mut self, block_id: &str) -> Result<()> {
        let date = self.selected_date;
        self.api.delete_block(date, block_id).await?;

        if let Some(day) = self.days.get_mut(&date) {
            day.blocks.retain(|b| b.id != block_id);
            if day.blocks.is_empty() {
                self.days.remove(&date);
            }
        }
        self.refresh_day(date);
        Ok(())
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    /// Append a task to a block of the selected day; returns its id.
    pub async fn add_task(&mut self, block_id: &str, text: &str) -> Result<String> {
        let date = self.selected_date;
        if self.days.get(&date).and_then(|d| d.block(block_id)).is_none() {
            return Err(ClientError::NotFound(format!("block {}", block_id)));
        }

        let created_at = self.clock.now();
        let task = NewTask {
            id: new_id(),
            text: require_text("task text", text)?,
            created_at: Some(created_at),
        };
        self.api.add_task(date, block_id, &task).await?;

        if let Some(block) = self.days.get_mut(&date).and_then(|d| d.block_mut(block_id)) {
            let position = block.tasks.iter().map(|t| t.position + 1).max().unwrap_or(0);
            block.tasks.push(Task {
                id: task.id.clone(),
                text: task.text,
                completed: false,
                created_at,
                position,
            });
        }
        self.refresh_day(date);
        Ok(task.id)
    }

    /// Change a task of the selected day.
    pub async fn update_task(&mut self, task_id: &str, patch: TaskPatch) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }
        if let Some(text) = &patch.text {
            require_text("task text", text)?;
        }
        let date = self.selected_date;
        self.api.update_task(date, task_id, &patch).await?;

        if let Some(task) = self.days.get_mut(&date).and_then(|d| d.task_mut(task_id)) {
            patch.apply(task);
        }
        self.refresh_day(date);
        Ok(())
    }

    /// Flip a task's completion; returns the new state.
    pub async fn toggle_task(&mut self, task_id: &str) -> Result<bool> {
        let completed = self
            .days
            .get(&self.selected_date)
            .and_then(|d| d.tasks().find(|t| t.id == task_id))
            .map(|t| !t.completed)
            .ok_or_else(|| ClientError::NotFound(format!("task {}", task_id)))?;

        self.update_task(task_id, TaskPatch::completed(completed))
            .await?;
        Ok(completed)
    }

    /// Delete a task of the selected day.
    pub async fn delete_task(&mut self, task_id: &str) -> Result<()> {
        let date = self.selected_date;
        self.api.delete_task(date, task_id).await?;

        if let Some(day) = self.days.get_mut(&date) {
            for block in &mut day.blocks {
                block.tasks.retain(|t| t.id != task_id);
            }
        }
        self.refresh_day(date);
        Ok(())
    }

    // =========================================================================
    // Reminders
    // =========================================================================

    /// Reload reminders from the server.
    pub async fn load_reminders(&mut self) -> Result<()> {
        self.reminders = self.api.list_reminders().await?;
        Ok(())
    }

    /// Schedule a reminder at a local date and time; returns its id.
    pub async fn add_reminder(
        &mut self,
        text: &str,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<String> {
        let scheduled_at = local_timestamp_ms(date, time)?;
        self.add_reminder_at(text, scheduled_at).await
    }

    /// Schedule a reminder at `scheduled_at` (ms since epoch); returns its id.
    pub async fn add_reminder_at(&mut self, text: &str, scheduled_at: i64) -> Result<String> {
        let reminder = NewReminder {
            id: new_id(),
            text: require_text("reminder text", text)?,
            scheduled_at,
        };
        self.api.add_reminder(&reminder).await?;

        let position = self
            .reminders
            .partition_point(|r| r.scheduled_at <= reminder.scheduled_at);
        self.reminders.insert(
            position,
            Reminder {
                id: reminder.id.clone(),
                text: reminder.text,
                scheduled_at,
                sent: false,
                created_at: self.clock.now_ms(),
                sent_at: None,
            },
        );
        Ok(reminder.id)
    }

    /// Delete a reminder.
    pub async fn delete_reminder(&mut self, reminder_id: &str) -> Result<()> {
        self.api.delete_reminder(reminder_id).await?;
        self.reminders.retain(|r| r.id != reminder_id);
        Ok(())
    }

    // =========================================================================
    // Stats
    // =========================================================================

    /// Statistics over the loaded days.
    pub fn stats(&self, period: StatsPeriod) -> Stats {
        medals::stats(&self.days, period, self.today())
    }

    /// Current streak over the loaded days.
    pub fn streak(&self) -> u32 {
        medals::streak(&self.days, self.today())
    }

    fn refresh_day(&mut self, date: NaiveDate) {
        let today = self.today();
        if let Some(day) = self.days.get_mut(&date) {
            day.has_medal = medals::has_medal(day, today);
        }
    }
}

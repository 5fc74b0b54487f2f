// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The request surface the store depends on.

use async_trait::async_trait;
use chrono::NaiveDate;
use daystreak_core::model::{DayRange, NewBlock, NewReminder, NewTask, TaskPatch};
use daystreak_core::{Day, DayMap, Reminder, Stats, StatsPeriod};

use crate::error::Result;

/// Operations of the daystreak REST API for one user.
///
/// [`DaystreakClient`](crate::DaystreakClient) implements this over HTTP;
/// tests substitute an in-memory implementation.
#[async_trait]
pub trait TrackerApi: Send + Sync {
    /// Fetch one day; unknown dates come back empty.
    async fn get_day(&self, date: NaiveDate) -> Result<Day>;

    /// Fetch every recorded day in `range`.
    async fn list_days(&self, range: DayRange) -> Result<DayMap>;

    /// Append a block to `date`.
    async fn add_block(&self, date: NaiveDate, block: &NewBlock) -> Result<()>;

    /// Rename a block.
    async fn rename_block(&self, date: NaiveDate, block_id: &str, name: &str) -> Result<()>;

    /// Delete a block and its tasks.
    async fn delete_block(&self, date: NaiveDate, block_id: &str) -> Result<()>;

    /// Append a task to a block.
    async fn add_task(&self, date: NaiveDate, block_id: &str, task: &NewTask) -> Result<()>;

    /// Change a task's text and/or completion.
    async fn update_task(&self, date: NaiveDate, task_id: &str, patch: &TaskPatch) -> Result<()>;

    /// Delete a task.
    async fn delete_task(&self, date: NaiveDate, task_id: &str) -> Result<()>;

    /// All reminders, soonest first.
    async fn list_reminders(&self) -> Result<Vec<Reminder>>;

    /// Schedule a reminder.
    async fn add_reminder(&self, reminder: &NewReminder) -> Result<()>;

    /// Delete a reminder.
    async fn delete_reminder(&self, reminder_id: &str) -> Result<()>;

    /// Server-side statistics over `period`.
    async fn stats(&self, period: StatsPeriod) -> Result<Stats>;
}

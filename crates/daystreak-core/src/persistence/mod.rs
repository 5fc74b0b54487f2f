// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Persistence interfaces and backends for daystreak-core.
//!
//! This module defines the persistence abstraction and the SQLite backend.
//! Every day and reminder operation is scoped by the caller's user id; only
//! the dispatcher's due scan crosses users.
//!
//! Updates and deletes that match nothing succeed silently. Medal flags are
//! never stored, so reads take the calendar date to derive them against.

pub mod sqlite;

pub use self::sqlite::SqlitePersistence;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::CoreError;
use crate::model::{Day, DayMap, DayRange, NewBlock, NewReminder, NewTask, Reminder, TaskPatch};

/// Pending reminder picked up by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct DueReminder {
    /// Owner of the reminder.
    pub user_id: String,
    /// Reminder id, unique per user.
    pub reminder_id: String,
    /// Message body.
    pub text: String,
    /// Due time (ms since epoch).
    pub scheduled_at_ms: i64,
}

/// Persistence interface used by the HTTP handlers and the reminder dispatcher.
#[allow(missing_docs)]
#[async_trait]
pub trait Persistence: Send + Sync {
    /// Load one day; a date without blocks yields an empty day.
    async fn get_day(
        &self,
        user_id: &str,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<Day, CoreError>;

    /// Load every day with at least one block inside `range`.
    async fn list_days(
        &self,
        user_id: &str,
        range: DayRange,
        today: NaiveDate,
    ) -> Result<DayMap, CoreError>;

    /// Append a block after the existing blocks of the day.
    async fn add_block(
        &self,
        user_id: &str,
        date: NaiveDate,
        block: &NewBlock,
    ) -> Result<(), CoreError>;

    async fn rename_block(
        &self,
        user_id: &str,
        date: NaiveDate,
        block_id: &str,
        name: &str,
    ) -> Result<(), CoreError>;

    /// Remove a block together with all of its tasks.
    async fn delete_block(
        &self,
        user_id: &str,
        date: NaiveDate,
        block_id: &str,
    ) -> Result<(), CoreError>;

    /// Append a task after the existing tasks of the block, not completed.
    ///
    /// `created_at` is stored when the task carries no creation time. Nothing
    /// is stored when the block does not exist.
    async fn add_task(
        &self,
        user_id: &str,
        date: NaiveDate,
        block_id: &str,
        task: &NewTask,
        created_at: DateTime<Utc>,
    ) -> Result<(), CoreError>;

    /// Change only the fields present in `patch`.
    async fn update_task(
        &self,
        user_id: &str,
        date: NaiveDate,
        task_id: &str,
        patch: &TaskPatch,
    ) -> Result<(), CoreError>;

    async fn delete_task(
        &self,
        user_id: &str,
        date: NaiveDate,
        task_id: &str,
    ) -> Result<(), CoreError>;

    /// All reminders of the user ordered by due time.
    async fn list_reminders(&self, user_id: &str) -> Result<Vec<Reminder>, CoreError>;

    async fn add_reminder(
        &self,
        user_id: &str,
        reminder: &NewReminder,
        created_at_ms: i64,
    ) -> Result<(), CoreError>;

    async fn delete_reminder(&self, user_id: &str, reminder_id: &str) -> Result<(), CoreError>;

    /// Unsent reminders due at `now_ms`, oldest first, across all users.
    async fn due_reminders(&self, now_ms: i64, limit: u32)
    -> Result<Vec<DueReminder>, CoreError>;

    /// Flip a reminder to sent. Returns false if it was already sent or is gone.
    async fn mark_reminder_sent(
        &self,
        user_id: &str,
        reminder_id: &str,
        sent_at_ms: i64,
    ) -> Result<bool, CoreError>;
}

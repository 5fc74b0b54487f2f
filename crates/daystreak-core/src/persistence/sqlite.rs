// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! SQLite-backed persistence implementation.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tracing::debug;

use crate::days::{self, BlockRow, TaskRow};
use crate::error::CoreError;
use crate::migrations::SQLITE as MIGRATOR;
use crate::model::{Day, DayMap, DayRange, NewBlock, NewReminder, NewTask, Reminder, TaskPatch};

use super::{DueReminder, Persistence};

/// SQLite-backed persistence provider.
#[derive(Clone)]
pub struct SqlitePersistence {
    pool: SqlitePool,
}

impl SqlitePersistence {
    /// Create a new SQLite persistence provider from an existing, migrated pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create and initialize a new SQLite persistence from a file path.
    ///
    /// This convenience constructor handles all setup:
    /// - Creates parent directories if they don't exist
    /// - Creates the database file if it doesn't exist
    /// - Connects to the database with sensible defaults
    /// - Runs all migrations
    ///
    /// # Example
    ///
    /// ```ignore
    /// let persistence = SqlitePersistence::from_path(".data/daystreak.db").await?;
    /// ```
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| CoreError::DatabaseError {
                operation: "create_dir".to_string(),
                details: format!("Failed to create directory {:?}: {}", parent, e),
            })?;
        }

        let url = format!("sqlite:{}?mode=rwc", path.to_string_lossy());

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await
            .map_err(|e| CoreError::DatabaseError {
                operation: "connect".to_string(),
                details: format!("Failed to connect to SQLite at {:?}: {}", path, e),
            })?;

        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| CoreError::DatabaseError {
                operation: "migrate".to_string(),
                details: format!("Failed to run migrations: {}", e),
            })?;

        debug!(path = %path.display(), "SQLite database ready");

        Ok(Self { pool })
    }

    /// The underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn fetch_rows(
        &self,
        user_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<(Vec<BlockRow>, Vec<TaskRow>), CoreError> {
        let blocks = sqlx::query_as::<_, BlockRow>(
            r#"
            SELECT date, block_id, name, position
            FROM day_blocks
            WHERE user_id = ?1
              AND (?2 IS NULL OR date >= ?2)
              AND (?3 IS NULL OR date <= ?3)
            ORDER BY date ASC, position ASC
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        let tasks = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT date, block_id, task_id, text, completed, created_at, position
            FROM day_tasks
            WHERE user_id = ?1
              AND (?2 IS NULL OR date >= ?2)
              AND (?3 IS NULL OR date <= ?3)
            ORDER BY date ASC, block_id ASC, position ASC
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok((blocks, tasks))
    }
}

#[async_trait::async_trait]
impl Persistence for SqlitePersistence {
    async fn get_day(
        &self,
        user_id: &str,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<Day, CoreError> {
        let (blocks, tasks) = self.fetch_rows(user_id, Some(date), Some(date)).await?;
        Ok(days::assemble_day(date, blocks, tasks, today))
    }

    async fn list_days(
        &self,
        user_id: &str,
        range: DayRange,
        today: NaiveDate,
    ) -> Result<DayMap, CoreError> {
        let (blocks, tasks) = self.fetch_rows(user_id, range.from, range.to).await?;
        Ok(days::assemble_days(blocks, tasks, today))
    }

    async fn add_block(
        &self,
        user_id: &str,
        date: NaiveDate,
        block: &NewBlock,
    ) -> Result<(), CoreError> {
        sqlx::query(
            r#"
            INSERT INTO day_blocks (user_id, date, block_id, name, position)
            SELECT ?1, ?2, ?3, ?4, COALESCE(MAX(position), -1) + 1
            FROM day_blocks
            WHERE user_id = ?1 AND date = ?2
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(&block.id)
        .bind(&block.name)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn rename_block(
        &self,
        user_id: &str,
        date: NaiveDate,
        block_id: &str,
        name: &str,
    ) -> Result<(), CoreError> {
        sqlx::query(
            r#"
            UPDATE day_blocks
            SET name = ?1
            WHERE user_id = ?2 AND date = ?3 AND block_id = ?4
            "#,
        )
        .bind(name)
        .bind(user_id)
        .bind(date)
        .bind(block_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_block(
        &self,
        user_id: &str,
        date: NaiveDate,
        block_id: &str,
    ) -> Result<(), CoreError> {
        let mut tx = self.pool.begin().await?;

        let tasks = sqlx::query(
            r#"
            DELETE FROM day_tasks
            WHERE user_id = ?1 AND date = ?2 AND block_id = ?3
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(block_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            DELETE FROM day_blocks
            WHERE user_id = ?1 AND date = ?2 AND block_id = ?3
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(block_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(
            user_id = %user_id,
            block_id = %block_id,
            tasks_removed = tasks.rows_affected(),
            "Deleted block"
        );
        Ok(())
    }

    async fn add_task(
        &self,
        user_id: &str,
        date: NaiveDate,
        block_id: &str,
        task: &NewTask,
        created_at: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        // Selecting from the owning block makes a missing block insert nothing.
        let result = sqlx::query(
            r#"
            INSERT INTO day_tasks
                (user_id, date, block_id, task_id, text, completed, created_at, position)
            SELECT ?1, ?2, ?3, ?4, ?5, 0, ?6,
                (SELECT COALESCE(MAX(position), -1) + 1
                 FROM day_tasks
                 WHERE user_id = ?1 AND date = ?2 AND block_id = ?3)
            FROM day_blocks
            WHERE user_id = ?1 AND date = ?2 AND block_id = ?3
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(block_id)
        .bind(&task.id)
        .bind(&task.text)
        .bind(task.created_at.unwrap_or(created_at))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            debug!(
                user_id = %user_id,
                block_id = %block_id,
                task_id = %task.id,
                "Block not found; task not added"
            );
        }

        Ok(())
    }

    async fn update_task(
        &self,
        user_id: &str,
        date: NaiveDate,
        task_id: &str,
        patch: &TaskPatch,
    ) -> Result<(), CoreError> {
        if patch.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            UPDATE day_tasks
            SET text = COALESCE(?1, text),
                completed = COALESCE(?2, completed)
            WHERE user_id = ?3 AND date = ?4 AND task_id = ?5
            "#,
        )
        .bind(patch.text.as_deref())
        .bind(patch.completed)
        .bind(user_id)
        .bind(date)
        .bind(task_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_task(
        &self,
        user_id: &str,
        date: NaiveDate,
        task_id: &str,
    ) -> Result<(), CoreError> {
        sqlx::query(
            r#"
            DELETE FROM day_tasks
            WHERE user_id = ?1 AND date = ?2 AND task_id = ?3
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(task_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_reminders(&self, user_id: &str) -> Result<Vec<Reminder>, CoreError> {
        let reminders = sqlx::query_as::<_, Reminder>(
            r#"
            SELECT reminder_id AS id, text, scheduled_at_ms AS scheduled_at, sent,
                   created_at_ms AS created_at, sent_at_ms AS sent_at
            FROM reminders
            WHERE user_id = ?1
            ORDER BY scheduled_at_ms ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reminders)
    }

    async fn add_reminder(
        &self,
        user_id: &str,
        reminder: &NewReminder,
        created_at_ms: i64,
    ) -> Result<(), CoreError> {
        sqlx::query(
            r#"
            INSERT INTO reminders
                (user_id, reminder_id, text, scheduled_at_ms, sent, created_at_ms, sent_at_ms)
            VALUES (?1, ?2, ?3, ?4, 0, ?5, NULL)
            "#,
        )
        .bind(user_id)
        .bind(&reminder.id)
        .bind(&reminder.text)
        .bind(reminder.scheduled_at)
        .bind(created_at_ms)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_reminder(&self, user_id: &str, reminder_id: &str) -> Result<(), CoreError> {
        sqlx::query(
            r#"
            DELETE FROM reminders
            WHERE user_id = ?1 AND reminder_id = ?2
            "#,
        )
        .bind(user_id)
        .bind(reminder_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn due_reminders(
        &self,
        now_ms: i64,
        limit: u32,
    ) -> Result<Vec<DueReminder>, CoreError> {
        let due = sqlx::query_as::<_, DueReminder>(
            r#"
            SELECT user_id, reminder_id, text, scheduled_at_ms
            FROM reminders
            WHERE sent = 0 AND scheduled_at_ms <= ?1
            ORDER BY scheduled_at_ms ASC
            LIMIT ?2
            "#,
        )
        .bind(now_ms)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(due)
    }

    async fn mark_reminder_sent(
        &self,
        user_id: &str,
        reminder_id: &str,
        sent_at_ms: i64,
    ) -> Result<bool, CoreError> {
        let result = sqlx::query(
            r#"
            UPDATE reminders
            SET sent = 1, sent_at_ms = ?1
            WHERE user_id = ?2 AND reminder_id = ?3 AND sent = 0
            "#,
        )
        .bind(sent_at_ms)
        .bind(user_id)
        .bind(reminder_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

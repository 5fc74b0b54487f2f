// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Day aggregation.
//!
//! Blocks and tasks are stored as flat rows keyed by (user, date). This
//! module folds them into the nested [`Day`] shape: tasks grouped under their
//! owning block, both levels ordered by position, `hasMedal` derived against
//! the supplied "today". A date with no block rows never appears here; point
//! lookups turn that absence into [`Day::empty`].

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::medals;
use crate::model::{Block, Day, DayMap, Task};

/// Block row as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlite", derive(sqlx::FromRow))]
pub struct BlockRow {
    /// Calendar date the block belongs to.
    pub date: NaiveDate,
    /// Block id.
    pub block_id: String,
    /// Display name.
    pub name: String,
    /// Insertion order within the day.
    pub position: i64,
}

/// Task row as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlite", derive(sqlx::FromRow))]
pub struct TaskRow {
    /// Calendar date the task belongs to.
    pub date: NaiveDate,
    /// Owning block id.
    pub block_id: String,
    /// Task id.
    pub task_id: String,
    /// Task text.
    pub text: String,
    /// Completion flag.
    pub completed: bool,
    /// Client-side creation time.
    pub created_at: DateTime<Utc>,
    /// Insertion order within the block.
    pub position: i64,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task {
            id: row.task_id,
            text: row.text,
            completed: row.completed,
            created_at: row.created_at,
            position: row.position,
        }
    }
}

/// Fold block and task rows into days.
///
/// Rows may arrive in any order. Tasks whose block is not among `blocks` are
/// dropped.
pub fn assemble_days(blocks: Vec<BlockRow>, tasks: Vec<TaskRow>, today: NaiveDate) -> DayMap {
    let mut tasks_by_block: HashMap<(NaiveDate, String), Vec<Task>> = HashMap::new();
    for row in tasks {
        tasks_by_block
            .entry((row.date, row.block_id.clone()))
            .or_default()
            .push(row.into());
    }

    let mut days = DayMap::new();
    for row in blocks {
        let mut block_tasks = tasks_by_block
            .remove(&(row.date, row.block_id.clone()))
            .unwrap_or_default();
        block_tasks.sort_by_key(|t| t.position);

        days.entry(row.date)
            .or_insert_with(|| Day::empty(row.date))
            .blocks
            .push(Block {
                id: row.block_id,
                name: row.name,
                position: row.position,
                tasks: block_tasks,
            });
    }

    for day in days.values_mut() {
        day.blocks.sort_by_key(|b| b.position);
    }
    medals::refresh_medals(&mut days, today);
    days
}

/// Assemble a single day; no rows yields an empty day.
pub fn assemble_day(
    date: NaiveDate,
    blocks: Vec<BlockRow>,
    tasks: Vec<TaskRow>,
    today: NaiveDate,
) -> Day {
    assemble_days(blocks, tasks, today)
        .remove(&date)
        .unwrap_or_else(|| Day::empty(date))
}

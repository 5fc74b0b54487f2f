// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Data model shared by the server, the client and the medal engine.
//!
//! All wire types use `camelCase` field names. Dates are calendar keys in
//! `YYYY-MM-DD` form, reminder timestamps are milliseconds since the epoch.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Format of a calendar day key.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Days keyed by calendar date, oldest first.
pub type DayMap = BTreeMap<NaiveDate, Day>;

/// A single to-do item inside a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Client-assigned identifier, unique per (user, date).
    pub id: String,
    /// Task text.
    pub text: String,
    /// Whether the task has been done.
    pub completed: bool,
    /// When the task was created, as reported by the client.
    pub created_at: DateTime<Utc>,
    /// Insertion order within the owning block.
    #[serde(default)]
    pub position: i64,
}

/// A named group of tasks within a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Client-assigned identifier, unique per (user, date).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Insertion order within the day.
    #[serde(default)]
    pub position: i64,
    /// Tasks ordered by position.
    pub tasks: Vec<Task>,
}

/// Everything recorded for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    /// Calendar date of this day.
    pub date: NaiveDate,
    /// Blocks ordered by position.
    pub blocks: Vec<Block>,
    /// Derived medal flag; recomputed on every read.
    #[serde(default)]
    pub has_medal: bool,
}

impl Day {
    /// A day with no blocks.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            blocks: Vec::new(),
            has_medal: false,
        }
    }

    /// All tasks of the day across blocks, in display order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.blocks.iter().flat_map(|b| b.tasks.iter())
    }

    /// Returns `(completed, total)` task counts.
    pub fn task_counts(&self) -> (u32, u32) {
        self.tasks().fold((0, 0), |(done, total), task| {
            (done + u32::from(task.completed), total + 1)
        })
    }

    /// Find a block by id.
    pub fn block(&self, block_id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == block_id)
    }

    /// Find a block by id for modification.
    pub fn block_mut(&mut self, block_id: &str) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| b.id == block_id)
    }

    /// Find a task anywhere in the day for modification.
    pub fn task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.blocks
            .iter_mut()
            .flat_map(|b| b.tasks.iter_mut())
            .find(|t| t.id == task_id)
    }
}

/// A timed message delivered through the messaging API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlite", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    /// Client-assigned identifier, unique per user.
    pub id: String,
    /// Message body.
    pub text: String,
    /// Due time (ms since epoch).
    pub scheduled_at: i64,
    /// Whether delivery succeeded for every recipient.
    pub sent: bool,
    /// Creation time (ms since epoch).
    pub created_at: i64,
    /// Delivery time (ms since epoch), set once with `sent`.
    pub sent_at: Option<i64>,
}

/// Body of `POST /days/{date}/blocks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBlock {
    /// Block id.
    pub id: String,
    /// Block name.
    pub name: String,
}

/// Body of `PATCH /days/{date}/blocks/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameBlock {
    /// New block name.
    pub name: String,
}

/// Body of `POST /days/{date}/blocks/{id}/tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    /// Task id.
    pub id: String,
    /// Task text.
    pub text: String,
    /// Client-side creation time; the server clock fills it in when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of `PATCH /days/{date}/tasks/{id}`; absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    /// Replacement text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Replacement completion flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    /// Patch that only changes the text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            completed: None,
        }
    }

    /// Patch that only changes the completion flag.
    pub fn completed(completed: bool) -> Self {
        Self {
            text: None,
            completed: Some(completed),
        }
    }

    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.completed.is_none()
    }

    /// Apply the patch to a task in memory.
    pub fn apply(&self, task: &mut Task) {
        if let Some(text) = &self.text {
            task.text = text.clone();
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
    }
}

/// Body of `POST /reminders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReminder {
    /// Reminder id.
    pub id: String,
    /// Message body.
    pub text: String,
    /// Due time (ms since epoch).
    pub scheduled_at: i64,
}

/// Inclusive date range for multi-day queries; open ends are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRange {
    /// First date to include.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    /// Last date to include.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
}

impl DayRange {
    /// Range covering every date.
    pub fn all() -> Self {
        Self::default()
    }

    /// Range between two dates, both inclusive.
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Whether `date` falls inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

/// Acknowledgement returned by every mutating endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OkResponse {
    /// Always true.
    pub ok: bool,
}

impl OkResponse {
    /// The `{ok: true}` body.
    pub const OK: Self = Self { ok: true };
}

/// Body of `GET /days`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaysResponse {
    /// Days keyed by date.
    pub days: DayMap,
}

/// Body of `GET /reminders`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemindersResponse {
    /// Reminders ordered by due time.
    pub reminders: Vec<Reminder>,
}

/// Parse a `YYYY-MM-DD` day key.
pub fn parse_date_key(value: &str) -> Result<NaiveDate> {
    if value.len() != 10 {
        return Err(CoreError::invalid_date(value));
    }
    NaiveDate::parse_from_str(value, DATE_KEY_FORMAT).map_err(|_| CoreError::invalid_date(value))
}

/// Format a date as a `YYYY-MM-DD` day key.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Common test infrastructure for daystreak-client tests.
//!
//! Provides an in-memory [`TrackerApi`] that records calls and can be told
//! to fail, so store behavior can be checked without a server.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use daystreak_client::{ClientError, Result, TrackerApi};
use daystreak_core::model::{DayRange, NewBlock, NewReminder, NewTask, TaskPatch};
use daystreak_core::{
    Block, Day, DayMap, ManualClock, Reminder, Stats, StatsPeriod, Task, medals,
};
use tokio::sync::Mutex;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Clock frozen at 2024-01-15 09:00 UTC.
pub fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap(),
    ))
}

#[derive(Default)]
struct FakeState {
    days: DayMap,
    reminders: Vec<Reminder>,
    calls: Vec<String>,
    fail: bool,
}

/// In-memory API with server semantics, minus medals.
#[derive(Clone, Default)]
pub struct FakeApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a day with one block holding `(task_id, completed)` tasks.
    pub async fn seed_day(&self, date: NaiveDate, block_id: &str, tasks: &[(&str, bool)]) {
        let mut state = self.state.lock().await;
        let day = state.days.entry(date).or_insert_with(|| Day::empty(date));
        day.blocks.push(Block {
            id: block_id.to_string(),
            name: block_id.to_string(),
            position: day.blocks.len() as i64,
            tasks: tasks
                .iter()
                .enumerate()
                .map(|(i, (id, completed))| Task {
                    id: id.to_string(),
                    text: id.to_string(),
                    completed: *completed,
                    created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                    position: i as i64,
                })
                .collect(),
        });
    }

    /// Fail every following call until cleared.
    pub async fn set_failing(&self, fail: bool) {
        self.state.lock().await.fail = fail;
    }

    /// Names of the calls made so far.
    pub async fn calls(&self) -> Vec<String> {
        self.state.lock().await.calls.clone()
    }

    pub async fn server_day(&self, date: NaiveDate) -> Option<Day> {
        self.state.lock().await.days.get(&date).cloned()
    }

    pub async fn server_reminders(&self) -> Vec<Reminder> {
        self.state.lock().await.reminders.clone()
    }

    async fn enter(&self, call: &str) -> Result<tokio::sync::MutexGuard<'_, FakeState>> {
        let mut state = self.state.lock().await;
        state.calls.push(call.to_string());
        if state.fail {
            return Err(ClientError::Server {
                status: 500,
                message: "boom".to_string(),
            });
        }
        Ok(state)
    }
}

#[async_trait]
impl TrackerApi for FakeApi {
    async fn get_day(&self, date: NaiveDate) -> Result<Day> {
        let state = self.enter("get_day").await?;
        Ok(state
            .days
            .get(&date)
            .cloned()
            .unwrap_or_else(|| Day::empty(date)))
    }

    async fn list_days(&self, range: DayRange) -> Result<DayMap> {
        let state = self.enter("list_days").await?;
        Ok(state
            .days
            .iter()
            .filter(|(date, _)| range.contains(**date))
            .map(|(date, day)| (*date, day.clone()))
            .collect())
    }

    async fn add_block(&self, date: NaiveDate, block: &NewBlock) -> Result<()> {
        let mut state = self.enter("add_block").await?;
        let day = state.days.entry(date).or_insert_with(|| Day::empty(date));
        let position = day.blocks.iter().map(|b| b.position + 1).max().unwrap_or(0);
        day.blocks.push(Block {
            id: block.id.clone(),
            name: block.name.clone(),
            position,
            tasks: Vec::new(),
        });
        Ok(())
    }

    async fn rename_block(&self, date: NaiveDate, block_id: &str, name: &str) -> Result<()> {
        let mut state = self.enter("rename_block").await?;
        if let Some(block) = state.days.get_mut(&date).and_then(|d| d.block_mut(block_id)) {
            block.name = name.to_string();
        }
        Ok(())
    }

    async fn delete_block(&self, date: NaiveDate, block_id: &str) -> Result<()> {
        let mut state = self.enter("delete_block").await?;
        if let Some(day) = state.days.get_mut(&date) {
            day.blocks.retain(|b| b.id != block_id);
        }
        state.days.retain(|_, d| !d.blocks.is_empty());
        Ok(())
    }

    async fn add_task(&self, date: NaiveDate, block_id: &str, task: &NewTask) -> Result<()> {
        let mut state = self.enter("add_task").await?;
        if let Some(block) = state.days.get_mut(&date).and_then(|d| d.block_mut(block_id)) {
            let position = block.tasks.iter().map(|t| t.position + 1).max().unwrap_or(0);
            block.tasks.push(Task {
                id: task.id.clone(),
                text: task.text.clone(),
                completed: false,
                created_at: task.created_at.unwrap_or_else(Utc::now),
                position,
            });
        }
        Ok(())
    }

    async fn update_task(&self, date: NaiveDate, task_id: &str, patch: &TaskPatch) -> Result<()> {
        let mut state = self.enter("update_task").await?;
        if let Some(task) = state.days.get_mut(&date).and_then(|d| d.task_mut(task_id)) {
            patch.apply(task);
        }
        Ok(())
    }

    async fn delete_task(&self, date: NaiveDate, task_id: &str) -> Result<()> {
        let mut state = self.enter("delete_task").await?;
        if let Some(day) = state.days.get_mut(&date) {
            for block in &mut day.blocks {
                block.tasks.retain(|t| t.id != task_id);
            }
        }
        Ok(())
    }

    async fn list_reminders(&self) -> Result<Vec<Reminder>> {
        let state = self.enter("list_reminders").await?;
        Ok(state.reminders.clone())
    }

    async fn add_reminder(&self, reminder: &NewReminder) -> Result<()> {
        let mut state = self.enter("add_reminder").await?;
        state.reminders.push(Reminder {
            id: reminder.id.clone(),
            text: reminder.text.clone(),
            scheduled_at: reminder.scheduled_at,
            sent: false,
            created_at: 0,
            sent_at: None,
        });
        state.reminders.sort_by_key(|r| r.scheduled_at);
        Ok(())
    }

    async fn delete_reminder(&self, reminder_id: &str) -> Result<()> {
        let mut state = self.enter("delete_reminder").await?;
        state.reminders.retain(|r| r.id != reminder_id);
        Ok(())
    }

    async fn stats(&self, period: StatsPeriod) -> Result<Stats> {
        let state = self.enter("stats").await?;
        Ok(medals::stats(&state.days, period, date(2024, 1, 15)))
    }
}

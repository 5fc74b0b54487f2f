// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Daystreak Core - Daily Task Tracker Domain
//!
//! This crate holds everything about the tracker that does not depend on a
//! transport: the data model, day aggregation, the medal/streak engine and
//! (behind the `sqlite` feature) the persistence layer.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────┐        ┌──────────────────────────────┐
//! │     daystreak-client      │  HTTP  │       daystreak-server       │
//! │ (request layer, AppStore, │───────►│ (REST API, auth, reminder    │
//! │  daystreak-ctl)           │        │  dispatcher, Telegram)       │
//! └─────────────┬─────────────┘        └───────────────┬──────────────┘
//!               │ model + medals                       │ Persistence
//!               ▼                                      ▼
//!         ┌──────────────────────────────────────────────────┐
//!         │                  daystreak-core                   │
//!         │   model · days · medals · clock · persistence     │
//!         └──────────────────────────────────────────────────┘
//!                                  │
//!                                  ▼
//!                          ┌──────────────┐
//!                          │    SQLite    │
//!                          └──────────────┘
//! ```
//!
//! # Data Model
//!
//! | Entity | Key | Notes |
//! |--------|-----|-------|
//! | Block | (user, date, block_id) | Named group of tasks, ordered by `position` |
//! | Task | (user, date, task_id) | Owned by one block, ordered by `position` |
//! | Day | (user, date) | Derived: exists once a block exists for the date |
//! | Reminder | (user, reminder_id) | `Pending → Sent`, never reset |
//!
//! A day's `hasMedal` flag is derived on every read and never stored: a day
//! earns a medal when it lies strictly before today, has at least one task,
//! and every task is completed.
//!
//! # Reminder State Machine
//!
//! ```text
//!   ┌─────────┐   all recipients delivered   ┌──────┐
//!   │ PENDING │─────────────────────────────►│ SENT │
//!   └────┬────┘                              └──────┘
//!        │ any recipient failed
//!        └──► stays PENDING, retried next tick
//! ```
//!
//! # Modules
//!
//! - [`clock`]: Wall clock and calendar "today" abstraction
//! - [`days`]: Grouping of block/task rows into days
//! - [`error`]: Error types with stable error codes
//! - [`medals`]: Medal, streak and stats computation
//! - [`model`]: Wire/data types shared by server and client
//! - `migrations`: Embedded SQLite migrations (`sqlite` feature)
//! - `persistence`: Persistence trait and SQLite backend (`sqlite` feature)

#![deny(missing_docs)]

/// Wall clock and calendar date source.
pub mod clock;

/// Aggregation of block and task rows into days.
pub mod days;

/// Error types for core operations.
pub mod error;

/// Medal, streak and period statistics.
pub mod medals;

/// Data model for days, blocks, tasks and reminders.
pub mod model;

/// Embedded SQLite migrations.
#[cfg(feature = "sqlite")]
pub mod migrations;

/// Persistence interface and SQLite backend.
#[cfg(feature = "sqlite")]
pub mod persistence;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, Result};
pub use medals::{Stats, StatsPeriod};
pub use model::{Block, Day, DayMap, Reminder, Task};

#[cfg(feature = "sqlite")]
pub use persistence::{DueReminder, Persistence, SqlitePersistence};

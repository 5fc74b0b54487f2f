// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Daystreak Control CLI
//!
//! Command line front end for a daystreak server.
//!
//! Usage:
//!   daystreak-ctl --user <id> <command> [options]
//!
//! Examples:
//!   daystreak-ctl day
//!   daystreak-ctl add-block Morning --date 2024-01-15
//!   daystreak-ctl add-task <block_id> "Run"
//!   daystreak-ctl toggle <task_id>
//!   daystreak-ctl remind "Stretch" --date 2024-01-15 --time 18:30
//!   daystreak-ctl stats --period week

use std::time::Duration;

use anyhow::Context;
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use daystreak_client::config::DEFAULT_API_URL;
use daystreak_client::{AppStore, ClientConfig, DaystreakClient, TrackerApi};
use daystreak_core::model::{DayRange, TaskPatch, parse_date_key};
use daystreak_core::{Day, StatsPeriod};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(
    name = "daystreak-ctl",
    version,
    about = "Manage days, tasks and reminders on a daystreak server"
)]
struct Cli {
    /// Server base URL.
    #[arg(long, env = "DAYSTREAK_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// User identity sent as x-user-id.
    #[arg(short, long, env = "DAYSTREAK_USER_ID")]
    user: String,

    /// Request timeout in milliseconds.
    #[arg(long, env = "DAYSTREAK_REQUEST_TIMEOUT_MS", default_value_t = 10_000)]
    timeout_ms: u64,

    /// Print raw JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check server health
    Health,
    /// Show one day (default: today)
    Day {
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// List recorded days
    Days {
        #[arg(long, value_parser = parse_date)]
        from: Option<NaiveDate>,
        #[arg(long, value_parser = parse_date)]
        to: Option<NaiveDate>,
    },
    /// Add a block
    AddBlock {
        name: String,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Rename a block
    RenameBlock {
        block_id: String,
        name: String,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Delete a block and its tasks
    DeleteBlock {
        block_id: String,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Add a task to a block
    AddTask {
        block_id: String,
        text: String,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Change a task's text
    EditTask {
        task_id: String,
        text: String,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Flip a task between done and not done
    Toggle {
        task_id: String,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Delete a task
    DeleteTask {
        task_id: String,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// List reminders
    Reminders,
    /// Schedule a reminder at a local date and time
    Remind {
        text: String,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        /// HH:MM in local time
        #[arg(long, value_parser = parse_time)]
        time: NaiveTime,
    },
    /// Delete a reminder
    DeleteReminder { reminder_id: String },
    /// Completion statistics and streaks
    Stats {
        #[arg(long, default_value = "day")]
        period: StatsPeriod,
        /// Ask the server instead of computing locally
        #[arg(long)]
        remote: bool,
    },
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    parse_date_key(value).map_err(|e| e.to_string())
}

fn parse_time(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| format!("'{}' is not HH:MM", value))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_day(day: &Day) {
    let medal = if day.has_medal { " 🏅" } else { "" };
    println!("{}{}", day.date, medal);
    if day.blocks.is_empty() {
        println!("  (nothing planned)");
    }
    for block in &day.blocks {
        println!("  {} [{}]", block.name, block.id);
        for task in &block.tasks {
            let mark = if task.completed { "x" } else { " " };
            println!("    [{}] {} ({})", mark, task.text, task.id);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "daystreak_client=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = ClientConfig::new(&cli.user)
        .with_base_url(&cli.api_url)
        .with_request_timeout(Duration::from_millis(cli.timeout_ms));
    let client = DaystreakClient::new(config).context("failed to build HTTP client")?;

    let mut store = AppStore::new(client);
    let today = store.today();

    match cli.command {
        Commands::Health => {
            let health = store.api().health().await?;
            if cli.json {
                print_json(&health)?;
            } else {
                println!("{} (version {})", health.status, health.version);
            }
        }
        Commands::Day { date } => {
            let day = store.select_date(date.unwrap_or(today)).await?;
            if cli.json {
                print_json(&day)?;
            } else {
                print_day(&day);
            }
        }
        Commands::Days { from, to } => {
            store.load_days(DayRange { from, to }).await?;
            if cli.json {
                print_json(store.days())?;
            } else {
                for day in store.days().values() {
                    print_day(day);
                }
            }
        }
        Commands::AddBlock { name, date } => {
            store.select_date(date.unwrap_or(today)).await?;
            let id = store.add_block(&name).await?;
            println!("{}", id);
        }
        Commands::RenameBlock {
            block_id,
            name,
            date,
        } => {
            store.select_date(date.unwrap_or(today)).await?;
            store.rename_block(&block_id, &name).await?;
        }
        Commands::DeleteBlock { block_id, date } => {
            store.select_date(date.unwrap_or(today)).await?;
            store.delete_block(&block_id).await?;
        }
        Commands::AddTask {
            block_id,
            text,
            date,
        } => {
            store.select_date(date.unwrap_or(today)).await?;
            let id = store.add_task(&block_id, &text).await?;
            println!("{}", id);
        }
        Commands::EditTask {
            task_id,
            text,
            date,
        } => {
            store.select_date(date.unwrap_or(today)).await?;
            store.update_task(&task_id, TaskPatch::text(text)).await?;
        }
        Commands::Toggle { task_id, date } => {
            store.select_date(date.unwrap_or(today)).await?;
            let completed = store.toggle_task(&task_id).await?;
            println!("{}", if completed { "done" } else { "not done" });
        }
        Commands::DeleteTask { task_id, date } => {
            store.select_date(date.unwrap_or(today)).await?;
            store.delete_task(&task_id).await?;
        }
        Commands::Reminders => {
            store.load_reminders().await?;
            if cli.json {
                print_json(&store.reminders())?;
            } else {
                for r in store.reminders() {
                    let state = if r.sent { "sent" } else { "pending" };
                    let at = chrono::DateTime::from_timestamp_millis(r.scheduled_at)
                        .map(|dt| {
                            dt.with_timezone(&chrono::Local)
                                .format("%Y-%m-%d %H:%M")
                                .to_string()
                        })
                        .unwrap_or_else(|| r.scheduled_at.to_string());
                    println!("{}  {:<7}  {}  ({})", at, state, r.text, r.id);
                }
            }
        }
        Commands::Remind { text, date, time } => {
            let id = store
                .add_reminder(&text, date.unwrap_or(today), time)
                .await?;
            println!("{}", id);
        }
        Commands::DeleteReminder { reminder_id } => {
            store.delete_reminder(&reminder_id).await?;
        }
        Commands::Stats { period, remote } => {
            let stats = if remote {
                store.api().stats(period).await?
            } else {
                store.init().await?;
                store.stats(period)
            };
            if cli.json {
                print_json(&stats)?;
            } else {
                println!(
                    "{}: {}/{} tasks ({}%), {} medal(s), streak {}, longest {}",
                    stats.period,
                    stats.completed,
                    stats.total,
                    stats.completion_percent(),
                    stats.medals.len(),
                    stats.streak,
                    stats.longest_streak
                );
            }
        }
    }

    Ok(())
}

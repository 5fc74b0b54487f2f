// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! AppStore tests against the in-memory API.

mod common;

use chrono::NaiveTime;
use common::*;
use daystreak_client::{AppStore, ClientError, local_timestamp_ms};
use daystreak_core::StatsPeriod;
use daystreak_core::model::TaskPatch;

async fn store_with(api: &FakeApi) -> AppStore<FakeApi> {
    let mut store = AppStore::with_clock(api.clone(), clock());
    store.init().await.unwrap();
    store
}

#[tokio::test]
async fn test_init_loads_history_and_derives_medals() {
    let api = FakeApi::new();
    api.seed_day(date(2024, 1, 13), "b", &[("t1", true)]).await;
    api.seed_day(date(2024, 1, 14), "b", &[("t2", true), ("t3", false)])
        .await;
    api.seed_day(date(2024, 1, 15), "b", &[("t4", true)]).await;

    let store = store_with(&api).await;

    assert_eq!(store.days().len(), 3);
    assert!(store.days()[&date(2024, 1, 13)].has_medal);
    assert!(!store.days()[&date(2024, 1, 14)].has_medal);
    // Today never has a medal.
    assert!(!store.days()[&date(2024, 1, 15)].has_medal);
    assert_eq!(store.selected_date(), date(2024, 1, 15));
    assert_eq!(api.calls().await, vec!["list_days", "list_reminders"]);
}

#[tokio::test]
async fn test_blocks_and_tasks_patch_local_state() {
    let api = FakeApi::new();
    let mut store = store_with(&api).await;

    let block = store.add_block("  Morning ").await.unwrap();
    let run = store.add_task(&block, "Run").await.unwrap();
    let read = store.add_task(&block, "Read").await.unwrap();

    let day = store.selected_day();
    assert_eq!(day.blocks.len(), 1);
    assert_eq!(day.blocks[0].name, "Morning");
    assert_eq!(day.blocks[0].position, 0);
    let tasks: Vec<_> = day.blocks[0]
        .tasks
        .iter()
        .map(|t| (t.id.clone(), t.position))
        .collect();
    assert_eq!(tasks, vec![(run.clone(), 0), (read.clone(), 1)]);

    // Local state matches what the server holds.
    assert_eq!(api.server_day(date(2024, 1, 15)).await.unwrap(), day);

    store.rename_block(&block, "Early").await.unwrap();
    store
        .update_task(&read, TaskPatch::text("Read a book"))
        .await
        .unwrap();
    store.delete_task(&run).await.unwrap();

    let day = store.selected_day();
    assert_eq!(day.blocks[0].name, "Early");
    assert_eq!(day.blocks[0].tasks.len(), 1);
    assert_eq!(day.blocks[0].tasks[0].text, "Read a book");
    assert_eq!(day.blocks[0].tasks[0].position, 1);
}

#[tokio::test]
async fn test_toggle_task() {
    let api = FakeApi::new();
    let mut store = store_with(&api).await;
    let block = store.add_block("Morning").await.unwrap();
    let task = store.add_task(&block, "Run").await.unwrap();

    assert!(store.toggle_task(&task).await.unwrap());
    assert!(store.selected_day().blocks[0].tasks[0].completed);

    assert!(!store.toggle_task(&task).await.unwrap());
    assert!(!store.selected_day().blocks[0].tasks[0].completed);

    let err = store.toggle_task("missing").await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_block_drops_empty_day() {
    let api = FakeApi::new();
    let mut store = store_with(&api).await;
    let block = store.add_block("Morning").await.unwrap();
    store.add_task(&block, "Run").await.unwrap();

    store.delete_block(&block).await.unwrap();

    assert!(store.days().is_empty());
    assert!(store.selected_day().blocks.is_empty());
    assert!(api.server_day(date(2024, 1, 15)).await.is_none());
}

#[tokio::test]
async fn test_failed_request_leaves_state_untouched() {
    let api = FakeApi::new();
    let mut store = store_with(&api).await;
    let block = store.add_block("Morning").await.unwrap();
    let before = store.selected_day();

    api.set_failing(true).await;

    assert!(store.add_task(&block, "Run").await.is_err());
    assert!(store.rename_block(&block, "Evening").await.is_err());
    assert!(store.delete_block(&block).await.is_err());
    assert!(store.add_reminder_at("Stretch", 1_000).await.is_err());

    assert_eq!(store.selected_day(), before);
    assert!(store.reminders().is_empty());
}

#[tokio::test]
async fn test_validation_happens_before_requests() {
    let api = FakeApi::new();
    let mut store = store_with(&api).await;

    assert!(matches!(
        store.add_block("   ").await,
        Err(ClientError::InvalidInput(_))
    ));
    assert!(matches!(
        store.add_task("nope", "Run").await,
        Err(ClientError::NotFound(_))
    ));

    let calls_before = api.calls().await.len();
    store.update_task("t1", TaskPatch::default()).await.unwrap();
    assert_eq!(api.calls().await.len(), calls_before);
}

#[tokio::test]
async fn test_select_date_fetches_day() {
    let api = FakeApi::new();
    api.seed_day(date(2024, 1, 10), "b", &[("t1", true)]).await;
    let mut store = AppStore::with_clock(api.clone(), clock());

    let day = store.select_date(date(2024, 1, 10)).await.unwrap();

    assert_eq!(store.selected_date(), date(2024, 1, 10));
    assert!(day.has_medal);
    assert!(store.days().contains_key(&date(2024, 1, 10)));

    let empty = store.select_date(date(2024, 1, 11)).await.unwrap();
    assert!(empty.blocks.is_empty());
    assert!(!store.days().contains_key(&date(2024, 1, 11)));
}

#[tokio::test]
async fn test_completing_past_day_earns_medal() {
    let api = FakeApi::new();
    api.seed_day(date(2024, 1, 14), "b", &[("t1", false)]).await;
    let mut store = store_with(&api).await;
    assert_eq!(store.streak(), 0);

    store.select_date(date(2024, 1, 14)).await.unwrap();
    store.toggle_task("t1").await.unwrap();

    assert!(store.days()[&date(2024, 1, 14)].has_medal);
    assert_eq!(store.streak(), 1);
}

#[tokio::test]
async fn test_reminders_stay_ordered() {
    let api = FakeApi::new();
    let mut store = store_with(&api).await;

    let late = store.add_reminder_at("late", 3_000).await.unwrap();
    let early = store.add_reminder_at("early", 1_000).await.unwrap();
    store.add_reminder_at("middle", 2_000).await.unwrap();

    let texts: Vec<_> = store.reminders().iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, vec!["early", "middle", "late"]);
    assert!(store.reminders().iter().all(|r| !r.sent));

    store.delete_reminder(&early).await.unwrap();
    store.delete_reminder(&late).await.unwrap();
    assert_eq!(store.reminders().len(), 1);

    store.load_reminders().await.unwrap();
    assert_eq!(store.reminders()[0].text, "middle");
}

#[tokio::test]
async fn test_add_reminder_uses_local_time() {
    let api = FakeApi::new();
    let mut store = store_with(&api).await;
    let time = NaiveTime::from_hms_opt(18, 30, 0).unwrap();

    store
        .add_reminder("Stretch", date(2024, 1, 20), time)
        .await
        .unwrap();

    let expected = local_timestamp_ms(date(2024, 1, 20), time).unwrap();
    assert_eq!(api.server_reminders().await[0].scheduled_at, expected);
    assert_eq!(store.reminders()[0].scheduled_at, expected);
}

#[tokio::test]
async fn test_local_stats_match_server_stats() {
    let api = FakeApi::new();
    api.seed_day(date(2024, 1, 12), "b", &[("a", true)]).await;
    api.seed_day(date(2024, 1, 13), "b", &[("b", true), ("c", true)])
        .await;
    api.seed_day(date(2024, 1, 14), "b", &[("d", true)]).await;
    api.seed_day(date(2024, 1, 15), "b", &[("e", false)]).await;
    let store = store_with(&api).await;

    for period in [StatsPeriod::Day, StatsPeriod::Week, StatsPeriod::Month] {
        use daystreak_client::TrackerApi;
        assert_eq!(store.stats(period), api.stats(period).await.unwrap());
    }

    let week = store.stats(StatsPeriod::Week);
    assert_eq!(week.completed, 4);
    assert_eq!(week.total, 5);
    assert_eq!(week.streak, 3);
    assert_eq!(week.longest_streak, 3);
}

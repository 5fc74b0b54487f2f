// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Day, block and task handlers.

use axum::Json;
use axum::extract::State;
use chrono::NaiveDate;
use daystreak_core::Day;
use daystreak_core::model::{
    DayRange, DaysResponse, NewBlock, NewTask, OkResponse, RenameBlock, TaskPatch, parse_date_key,
};
use serde::Deserialize;
use tracing::debug;

use super::{ApiJson, ApiPath, ApiQuery, AppState};
use crate::auth::UserId;
use crate::error::ApiError;

/// Query of `GET /api/days`; empty values count as absent.
#[derive(Debug, Default, Deserialize)]
pub struct DaysQuery {
    /// First date, inclusive.
    pub from: Option<String>,
    /// Last date, inclusive.
    pub to: Option<String>,
}

impl DaysQuery {
    fn range(&self) -> Result<DayRange, ApiError> {
        Ok(DayRange {
            from: optional_date(self.from.as_deref())?,
            to: optional_date(self.to.as_deref())?,
        })
    }
}

fn optional_date(value: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => Ok(Some(parse_date_key(v)?)),
        None => Ok(None),
    }
}

/// GET /api/days/{date}
pub async fn get_day(
    State(state): State<AppState>,
    user: UserId,
    ApiPath(date): ApiPath<String>,
) -> Result<Json<Day>, ApiError> {
    let date = parse_date_key(&date)?;
    let day = state
        .persistence
        .get_day(user.as_str(), date, state.clock.today())
        .await?;
    Ok(Json(day))
}

/// GET /api/days?from=&to=
pub async fn list_days(
    State(state): State<AppState>,
    user: UserId,
    ApiQuery(query): ApiQuery<DaysQuery>,
) -> Result<Json<DaysResponse>, ApiError> {
    let range = query.range()?;
    let days = state
        .persistence
        .list_days(user.as_str(), range, state.clock.today())
        .await?;
    Ok(Json(DaysResponse { days }))
}

/// POST /api/days/{date}/blocks
pub async fn add_block(
    State(state): State<AppState>,
    user: UserId,
    ApiPath(date): ApiPath<String>,
    ApiJson(block): ApiJson<NewBlock>,
) -> Result<Json<OkResponse>, ApiError> {
    let date = parse_date_key(&date)?;
    state.persistence.add_block(user.as_str(), date, &block).await?;
    debug!(user_id = %user.as_str(), %date, block_id = %block.id, "Added block");
    Ok(Json(OkResponse::OK))
}

/// PATCH /api/days/{date}/blocks/{block_id}
pub async fn rename_block(
    State(state): State<AppState>,
    user: UserId,
    ApiPath((date, block_id)): ApiPath<(String, String)>,
    ApiJson(body): ApiJson<RenameBlock>,
) -> Result<Json<OkResponse>, ApiError> {
    let date = parse_date_key(&date)?;
    state
        .persistence
        .rename_block(user.as_str(), date, &block_id, &body.name)
        .await?;
    Ok(Json(OkResponse::OK))
}

/// DELETE /api/days/{date}/blocks/{block_id}
pub async fn delete_block(
    State(state): State<AppState>,
    user: UserId,
    ApiPath((date, block_id)): ApiPath<(String, String)>,
) -> Result<Json<OkResponse>, ApiError> {
    let date = parse_date_key(&date)?;
    state
        .persistence
        .delete_block(user.as_str(), date, &block_id)
        .await?;
    Ok(Json(OkResponse::OK))
}

/// POST /api/days/{date}/blocks/{block_id}/tasks
pub async fn add_task(
    State(state): State<AppState>,
    user: UserId,
    ApiPath((date, block_id)): ApiPath<(String, String)>,
    ApiJson(task): ApiJson<NewTask>,
) -> Result<Json<OkResponse>, ApiError> {
    let date = parse_date_key(&date)?;
    state
        .persistence
        .add_task(user.as_str(), date, &block_id, &task, state.clock.now())
        .await?;
    debug!(user_id = %user.as_str(), %date, %block_id, task_id = %task.id, "Added task");
    Ok(Json(OkResponse::OK))
}

/// PATCH /api/days/{date}/tasks/{task_id}
pub async fn update_task(
    State(state): State<AppState>,
    user: UserId,
    ApiPath((date, task_id)): ApiPath<(String, String)>,
    ApiJson(patch): ApiJson<TaskPatch>,
) -> Result<Json<OkResponse>, ApiError> {
    let date = parse_date_key(&date)?;
    state
        .persistence
        .update_task(user.as_str(), date, &task_id, &patch)
        .await?;
    Ok(Json(OkResponse::OK))
}

/// DELETE /api/days/{date}/tasks/{task_id}
pub async fn delete_task(
    State(state): State<AppState>,
    user: UserId,
    ApiPath((date, task_id)): ApiPath<(String, String)>,
) -> Result<Json<OkResponse>, ApiError> {
    let date = parse_date_key(&date)?;
    state
        .persistence
        .delete_task(user.as_str(), date, &task_id)
        .await?;
    Ok(Json(OkResponse::OK))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_query_range() {
        let query = DaysQuery {
            from: Some("2024-01-01".to_string()),
            to: Some(String::new()),
        };
        let range = query.range().unwrap();
        assert_eq!(range.from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(range.to, None);

        assert_eq!(DaysQuery::default().range().unwrap(), DayRange::all());
    }

    #[test]
    fn test_days_query_rejects_bad_date() {
        let query = DaysQuery {
            from: Some("last week".to_string()),
            to: None,
        };
        assert!(matches!(query.range(), Err(ApiError::Core(_))));
    }
}

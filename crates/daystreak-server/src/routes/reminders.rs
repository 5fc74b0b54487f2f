// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Reminder handlers.

use axum::Json;
use axum::extract::State;
use daystreak_core::model::{NewReminder, OkResponse, RemindersResponse};
use tracing::debug;

use super::{ApiJson, ApiPath, AppState};
use crate::auth::UserId;
use crate::error::ApiError;

/// GET /api/reminders
pub async fn list_reminders(
    State(state): State<AppState>,
    user: UserId,
) -> Result<Json<RemindersResponse>, ApiError> {
    let reminders = state.persistence.list_reminders(user.as_str()).await?;
    Ok(Json(RemindersResponse { reminders }))
}

/// POST /api/reminders
pub async fn add_reminder(
    State(state): State<AppState>,
    user: UserId,
    ApiJson(reminder): ApiJson<NewReminder>,
) -> Result<Json<OkResponse>, ApiError> {
    state
        .persistence
        .add_reminder(user.as_str(), &reminder, state.clock.now_ms())
        .await?;
    debug!(
        user_id = %user.as_str(),
        reminder_id = %reminder.id,
        scheduled_at_ms = reminder.scheduled_at,
        "Added reminder"
    );
    Ok(Json(OkResponse::OK))
}

/// DELETE /api/reminders/{reminder_id}
pub async fn delete_reminder(
    State(state): State<AppState>,
    user: UserId,
    ApiPath(reminder_id): ApiPath<String>,
) -> Result<Json<OkResponse>, ApiError> {
    state
        .persistence
        .delete_reminder(user.as_str(), &reminder_id)
        .await?;
    Ok(Json(OkResponse::OK))
}

// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Statistics handler.

use axum::Json;
use axum::extract::State;
use daystreak_core::model::DayRange;
use daystreak_core::{Stats, StatsPeriod, medals};
use serde::Deserialize;

use super::{ApiQuery, AppState};
use crate::auth::UserId;
use crate::error::ApiError;

/// Query of `GET /api/stats`.
#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    /// `day`, `week` or `month`; defaults to `day`.
    pub period: Option<String>,
}

/// GET /api/stats?period=
pub async fn get_stats(
    State(state): State<AppState>,
    user: UserId,
    ApiQuery(query): ApiQuery<StatsQuery>,
) -> Result<Json<Stats>, ApiError> {
    let period = match query.period.as_deref().filter(|p| !p.is_empty()) {
        Some(p) => p.parse::<StatsPeriod>()?,
        None => StatsPeriod::default(),
    };

    // Longest streak needs the whole history.
    let today = state.clock.today();
    let days = state
        .persistence
        .list_days(user.as_str(), DayRange::all(), today)
        .await?;

    Ok(Json(medals::stats(&days, period, today)))
}

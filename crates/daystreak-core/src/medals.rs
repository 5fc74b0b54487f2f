// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Medal, streak and period statistics.
//!
//! Everything here is a pure function of a [`DayMap`] and the calendar date
//! considered "today". Medals are only awarded in retrospect: today never
//! has one, however complete it is.
//!
//! A streak counts medal days walking backward from yesterday. The walk stops
//! at the first day without a medal, and a date with no recorded data counts
//! as such a day: a calendar gap ends the streak just like an unfinished day.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::{Day, DayMap};

/// Whether `day` earns a medal as seen from `today`.
pub fn has_medal(day: &Day, today: NaiveDate) -> bool {
    if day.date >= today {
        return false;
    }
    let (completed, total) = day.task_counts();
    total > 0 && completed == total
}

/// Recompute the `has_medal` flag of every day in the map.
pub fn refresh_medals(days: &mut DayMap, today: NaiveDate) {
    for day in days.values_mut() {
        day.has_medal = has_medal(day, today);
    }
}

/// Consecutive medal days ending yesterday.
pub fn streak(days: &DayMap, today: NaiveDate) -> u32 {
    let mut count = 0;
    let mut cursor = today.pred_opt();

    while let Some(date) = cursor {
        match days.get(&date) {
            Some(day) if has_medal(day, today) => {
                count += 1;
                cursor = date.pred_opt();
            }
            _ => break,
        }
    }

    count
}

/// Longest run of consecutive medal days anywhere in the history.
pub fn longest_streak(days: &DayMap, today: NaiveDate) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for (date, day) in days {
        if !has_medal(day, today) {
            run = 0;
            previous = None;
            continue;
        }
        run = match previous {
            Some(prev) if prev.succ_opt() == Some(*date) => run + 1,
            _ => 1,
        };
        previous = Some(*date);
        longest = longest.max(run);
    }

    longest
}

/// Trailing window for [`stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsPeriod {
    /// Today only.
    #[default]
    Day,
    /// Today and the six days before it.
    Week,
    /// Today and the 29 days before it.
    Month,
}

impl StatsPeriod {
    /// Number of calendar days in the window, today included.
    pub fn window_days(self) -> u64 {
        match self {
            Self::Day => 1,
            Self::Week => 7,
            Self::Month => 30,
        }
    }

    /// Dates in the window, most recent first.
    pub fn dates(self, today: NaiveDate) -> impl Iterator<Item = NaiveDate> {
        (0..self.window_days()).filter_map(move |offset| today.checked_sub_days(Days::new(offset)))
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

impl fmt::Display for StatsPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatsPeriod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(CoreError::ValidationError {
                field: "period".to_string(),
                message: format!("'{}' is not one of day, week, month", other),
            }),
        }
    }
}

/// Aggregate numbers for a trailing window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Window the counts were taken over.
    pub period: StatsPeriod,
    /// Completed tasks in the window.
    pub completed: u32,
    /// All tasks in the window.
    pub total: u32,
    /// Medal dates in the window, most recent first.
    pub medals: Vec<NaiveDate>,
    /// Current streak ending yesterday.
    pub streak: u32,
    /// Longest streak in the whole history.
    pub longest_streak: u32,
}

impl Stats {
    /// Completion ratio as a whole percentage, 0 when there are no tasks.
    pub fn completion_percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((f64::from(self.completed) / f64::from(self.total)) * 100.0).round() as u32
    }
}

/// Compute statistics for `period` ending today.
pub fn stats(days: &DayMap, period: StatsPeriod, today: NaiveDate) -> Stats {
    let mut completed = 0;
    let mut total = 0;
    let mut medals = Vec::new();

    for date in period.dates(today) {
        let Some(day) = days.get(&date) else {
            continue;
        };
        let (done, all) = day.task_counts();
        completed += done;
        total += all;
        if has_medal(day, today) {
            medals.push(date);
        }
    }

    Stats {
        period,
        completed,
        total,
        medals,
        streak: streak(days, today),
        longest_streak: longest_streak(days, today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, Task};
    use chrono::{TimeZone, Utc};

    const TODAY: (i32, u32, u32) = (2024, 3, 15);

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(TODAY.0, TODAY.1, TODAY.2).unwrap()
    }

    fn days_ago(n: u64) -> NaiveDate {
        today().checked_sub_days(Days::new(n)).unwrap()
    }

    /// A day whose tasks have the given completion flags.
    fn day(date: NaiveDate, flags: &[bool]) -> Day {
        let tasks = flags
            .iter()
            .enumerate()
            .map(|(i, &completed)| Task {
                id: format!("t{}", i),
                text: format!("task {}", i),
                completed,
                created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                position: i as i64,
            })
            .collect();
        Day {
            date,
            blocks: vec![Block {
                id: "b".to_string(),
                name: "Block".to_string(),
                position: 0,
                tasks,
            }],
            has_medal: false,
        }
    }

    fn history(entries: &[(u64, &[bool])]) -> DayMap {
        entries
            .iter()
            .map(|(ago, flags)| (days_ago(*ago), day(days_ago(*ago), flags)))
            .collect()
    }

    #[test]
    fn test_past_day_medal_iff_all_completed() {
        assert!(has_medal(&day(days_ago(1), &[true, true]), today()));
        assert!(!has_medal(&day(days_ago(1), &[true, false]), today()));
        assert!(!has_medal(&day(days_ago(1), &[false]), today()));
        assert!(has_medal(&day(days_ago(40), &[true]), today()));
    }

    #[test]
    fn test_empty_past_day_has_no_medal() {
        assert!(!has_medal(&day(days_ago(1), &[]), today()));
        assert!(!has_medal(&Day::empty(days_ago(1)), today()));
    }

    #[test]
    fn test_today_never_has_medal() {
        assert!(!has_medal(&day(today(), &[true, true, true]), today()));
        assert!(!has_medal(&day(today(), &[false]), today()));
    }

    #[test]
    fn test_future_day_never_has_medal() {
        let tomorrow = today().succ_opt().unwrap();
        assert!(!has_medal(&day(tomorrow, &[true]), today()));
    }

    #[test]
    fn test_streak_stops_at_first_broken_day() {
        // medal, medal, no-medal, medal - most recent first, starting yesterday
        let days = history(&[
            (1, &[true]),
            (2, &[true, true]),
            (3, &[true, false]),
            (4, &[true]),
        ]);
        assert_eq!(streak(&days, today()), 2);
    }

    #[test]
    fn test_streak_empty_history_is_zero() {
        assert_eq!(streak(&DayMap::new(), today()), 0);
    }

    #[test]
    fn test_streak_gap_breaks() {
        // Yesterday medal, two days ago missing, three days ago medal.
        let days = history(&[(1, &[true]), (3, &[true])]);
        assert_eq!(streak(&days, today()), 1);
    }

    #[test]
    fn test_streak_day_with_blocks_but_no_tasks_breaks() {
        let days = history(&[(1, &[true]), (2, &[]), (3, &[true])]);
        assert_eq!(streak(&days, today()), 1);
    }

    #[test]
    fn test_streak_ignores_today() {
        // Today complete but yesterday missing.
        let days = history(&[(0, &[true])]);
        assert_eq!(streak(&days, today()), 0);

        // Today incomplete does not break a streak ending yesterday.
        let days = history(&[(0, &[false]), (1, &[true]), (2, &[true])]);
        assert_eq!(streak(&days, today()), 2);
    }

    #[test]
    fn test_longest_streak() {
        let days = history(&[
            (1, &[true]),
            (3, &[true]),
            (4, &[true]),
            (5, &[true]),
            (6, &[false]),
            (7, &[true]),
        ]);
        assert_eq!(longest_streak(&days, today()), 3);
        assert_eq!(streak(&days, today()), 1);
    }

    #[test]
    fn test_longest_streak_empty() {
        assert_eq!(longest_streak(&DayMap::new(), today()), 0);
    }

    #[test]
    fn test_stats_week_window() {
        let days = history(&[
            (0, &[true, false]),
            (1, &[true, true]),
            (3, &[true, false, false]),
            (6, &[true]),
            // Outside the week window.
            (7, &[true, true]),
        ]);

        let s = stats(&days, StatsPeriod::Week, today());
        assert_eq!(s.completed, 1 + 2 + 1 + 1);
        assert_eq!(s.total, 2 + 2 + 3 + 1);
        assert_eq!(s.medals, vec![days_ago(1), days_ago(6)]);
        assert_eq!(s.streak, 1);
        assert_eq!(s.longest_streak, 2);
    }

    #[test]
    fn test_stats_day_window_excludes_today_medal() {
        let days = history(&[(0, &[true, true])]);
        let s = stats(&days, StatsPeriod::Day, today());
        assert_eq!((s.completed, s.total), (2, 2));
        assert!(s.medals.is_empty());
        assert_eq!(s.completion_percent(), 100);
    }

    #[test]
    fn test_stats_month_window_bounds() {
        let days = history(&[(29, &[true]), (30, &[true])]);
        let s = stats(&days, StatsPeriod::Month, today());
        assert_eq!(s.medals, vec![days_ago(29)]);
        assert_eq!(s.total, 1);
    }

    #[test]
    fn test_refresh_medals() {
        let mut days = history(&[(0, &[true]), (1, &[true]), (2, &[false])]);
        refresh_medals(&mut days, today());
        assert!(!days[&days_ago(0)].has_medal);
        assert!(days[&days_ago(1)].has_medal);
        assert!(!days[&days_ago(2)].has_medal);

        // Rolling the date forward awards the former "today".
        let tomorrow = today().succ_opt().unwrap();
        refresh_medals(&mut days, tomorrow);
        assert!(days[&days_ago(0)].has_medal);
    }

    #[test]
    fn test_period_parse_and_display() {
        assert_eq!("week".parse::<StatsPeriod>().unwrap(), StatsPeriod::Week);
        assert_eq!(StatsPeriod::Month.to_string(), "month");
        assert!("year".parse::<StatsPeriod>().is_err());
        assert_eq!(
            serde_json::to_string(&StatsPeriod::Day).unwrap(),
            r#""day""#
        );
    }

    #[test]
    fn test_period_dates_most_recent_first() {
        let dates: Vec<_> = StatsPeriod::Week.dates(today()).collect();
        assert_eq!(dates.len(), 7);
        assert_eq!(dates[0], today());
        assert_eq!(dates[6], days_ago(6));
    }

    #[test]
    fn test_completion_percent_rounding() {
        let s = Stats {
            period: StatsPeriod::Week,
            completed: 2,
            total: 3,
            medals: Vec::new(),
            streak: 0,
            longest_streak: 0,
        };
        assert_eq!(s.completion_percent(), 67);
    }
}

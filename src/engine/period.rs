// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::Serialize;

use crate::models::{PeriodMode, UiState, parse_day};

/// Inclusive calendar-date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Builds a range, swapping the bounds when they arrive reversed.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Self { from: a, to: b }
        } else {
            Self { from: b, to: a }
        }
    }

    pub fn contains(&self, d: NaiveDate) -> bool {
        self.from <= d && d <= self.to
    }

    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Period {
    pub mode: PeriodMode,
    /// `None` for all-time.
    pub range: Option<DateRange>,
    pub label: String,
}

impl Period {
    pub fn all_time() -> Self {
        Self {
            mode: PeriodMode::AllTime,
            range: None,
            label: "All time".to_string(),
        }
    }

    /// Malformed dates never match a bounded period.
    pub fn includes(&self, date: &str) -> bool {
        match self.range {
            None => true,
            Some(r) => parse_day(date).is_some_and(|d| r.contains(d)),
        }
    }

    pub fn filter<'a, T>(&self, items: &'a [T], date_of: impl Fn(&T) -> &str) -> Vec<&'a T> {
        items.iter().filter(|it| self.includes(date_of(it))).collect()
    }

    pub fn days(&self) -> Option<i64> {
        self.range.map(|r| r.days())
    }
}

fn first_of_month(d: NaiveDate) -> NaiveDate {
    d - Duration::days(i64::from(d.day0()))
}

/// First and last day of the calendar month containing `d`.
pub fn month_bounds(d: NaiveDate) -> DateRange {
    let first = first_of_month(d);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|n| n.pred_opt())
        .unwrap_or(first);
    DateRange { from: first, to: last }
}

fn bounded(mode: PeriodMode, title: &str, range: DateRange) -> Period {
    Period {
        mode,
        range: Some(range),
        label: format!("{} ({} to {})", title, range.from, range.to),
    }
}

/// Turns the stored period preference into concrete bounds for `today`.
pub fn resolve(ui: &UiState, today: NaiveDate) -> Period {
    match ui.period_mode {
        PeriodMode::AllTime => Period::all_time(),
        PeriodMode::ThisMonth => bounded(PeriodMode::ThisMonth, "This month", month_bounds(today)),
        PeriodMode::LastMonth => {
            let first = first_of_month(today);
            let prev = first.pred_opt().unwrap_or(first);
            bounded(PeriodMode::LastMonth, "Last month", month_bounds(prev))
        }
        PeriodMode::Last30 => bounded(
            PeriodMode::Last30,
            "Last 30 days",
            DateRange {
                from: today - Duration::days(29),
                to: today,
            },
        ),
        PeriodMode::Custom => match (parse_day(&ui.period_from), parse_day(&ui.period_to)) {
            (Some(f), Some(t)) => bounded(PeriodMode::Custom, "Custom", DateRange::new(f, t)),
            _ => {
                tracing::debug!(
                    from = %ui.period_from,
                    to = %ui.period_to,
                    "custom period incomplete, using this month"
                );
                bounded(PeriodMode::ThisMonth, "This month", month_bounds(today))
            }
        },
    }
}

//! Read-only views over the task log. Every report receives the full list of records, nothing is
//! cached between calls.

pub mod render;

use std::{collections::BTreeMap, sync::Arc};

use chrono::{Days, NaiveDate, NaiveTime};
use serde::Serialize;

use crate::storage::entities::TaskRecord;

/// Number of calendar days covered by the weekly report, including the last one.
pub const WEEK_DAYS: u64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyEntry {
    pub time: NaiveTime,
    pub text: Arc<str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub entries: Vec<DailyEntry>,
}

impl DailySummary {
    pub fn count(&self) -> usize {
        self.entries.len()
    }
}

/// Collects records logged on `date`, keeping their log order.
pub fn daily_summary(records: &[TaskRecord], date: NaiveDate) -> DailySummary {
    let entries = records
        .iter()
        .filter(|v| v.date == date)
        .map(|v| DailyEntry {
            time: v.time,
            text: v.text.clone(),
        })
        .collect();
    DailySummary { date, entries }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Task counts for the trailing week, ordered by date ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WeeklyCounts(Vec<DayCount>);

impl WeeklyCounts {
    pub fn days(&self) -> &[DayCount] {
        &self.0
    }

    pub fn total(&self) -> usize {
        self.0.iter().map(|v| v.count).sum()
    }

    pub fn max(&self) -> usize {
        self.0.iter().map(|v| v.count).max().unwrap_or(0)
    }
}

/// Buckets records into the [WEEK_DAYS] days ending at `end` (inclusive). Every day starts at zero
/// and records outside the range are ignored.
pub fn weekly_counts(records: &[TaskRecord], end: NaiveDate) -> WeeklyCounts {
    let mut buckets = (0..WEEK_DAYS)
        .filter_map(|offset| end.checked_sub_days(Days::new(offset)))
        .map(|day| (day, 0usize))
        .collect::<BTreeMap<_, _>>();

    for record in records {
        if let Some(count) = buckets.get_mut(&record.date) {
            *count += 1;
        }
    }

    WeeklyCounts(
        buckets
            .into_iter()
            .map(|(date, count)| DayCount { date, count })
            .collect(),
    )
}

use std::borrow::Borrow;
use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, TimeZone, Timelike};
use serde::Serialize;

use crate::models::Submission;

use super::window::local_date;

pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyBucket {
    pub date: NaiveDate,
    /// Short chart label, e.g. `Oct 16`.
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdayBucket {
    pub day: &'static str,
    pub count: usize,
}

/// Counts for the last 7 calendar days including today, oldest first.
pub fn daily<S, Tz>(records: &[S], now: &DateTime<Tz>) -> Vec<DailyBucket>
where
    S: Borrow<Submission>,
    Tz: TimeZone,
{
    let tz = now.timezone();
    let mut per_day: HashMap<NaiveDate, usize> = HashMap::new();
    for record in records {
        if let Some(date) = local_date(record.borrow(), &tz) {
            *per_day.entry(date).or_default() += 1;
        }
    }

    let today = now.date_naive();
    (0..7)
        .rev()
        .map(|days_ago| {
            let date = today - TimeDelta::days(days_ago);
            DailyBucket {
                date,
                label: date.format("%b %-d").to_string(),
                count: per_day.get(&date).copied().unwrap_or(0),
            }
        })
        .collect()
}

/// Counts per local day of week, Monday first and Sunday last.
pub fn weekdays<S, Tz>(records: &[S], tz: &Tz) -> [usize; 7]
where
    S: Borrow<Submission>,
    Tz: TimeZone,
{
    let mut buckets = [0usize; 7];
    for record in records {
        if let Some(t) = record.borrow().time_in(tz) {
            buckets[t.weekday().num_days_from_monday() as usize] += 1;
        }
    }
    buckets
}

pub fn weekday_buckets(counts: &[usize; 7]) -> Vec<WeekdayBucket> {
    WEEKDAY_LABELS
        .iter()
        .zip(counts)
        .map(|(&day, &count)| WeekdayBucket { day, count })
        .collect()
}

/// Counts per local hour of day.
pub fn hours<S, Tz>(records: &[S], tz: &Tz) -> [usize; 24]
where
    S: Borrow<Submission>,
    Tz: TimeZone,
{
    let mut buckets = [0usize; 24];
    for record in records {
        if let Some(t) = record.borrow().time_in(tz) {
            buckets[t.hour() as usize] += 1;
        }
    }
    buckets
}

/// Index of the first maximal bucket, or `None` when every bucket is empty.
pub fn first_max(buckets: &[usize]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (idx, &count) in buckets.iter().enumerate() {
        if count > best.map_or(0, |(_, c)| c) {
            best = Some((idx, count));
        }
    }
    best.map(|(idx, _)| idx)
}

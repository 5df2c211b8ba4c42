//! Derived dashboard values, recomputed from scratch for every snapshot.
//!
//! All functions are pure: they read a slice of submissions and an evaluation
//! instant. Calendar semantics ("today", weekday, hour) use the time zone of
//! that instant.

pub mod histogram;
pub mod insights;
pub mod ranking;
pub mod window;

use std::borrow::Borrow;

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::models::Submission;

use histogram::{DailyBucket, WeekdayBucket};
use insights::Insights;
use ranking::{RankedEntry, TOP_N};

pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub total: usize,
    pub today: usize,
    pub week: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub generated_at: String,
    pub counts: Counts,
    pub daily: Vec<DailyBucket>,
    pub weekdays: Vec<WeekdayBucket>,
    pub top_subjects: Vec<RankedEntry>,
    pub top_domains: Vec<RankedEntry>,
    pub insights: Insights,
    pub recent: Vec<Submission>,
}

pub fn counts<S, Tz>(records: &[S], now: &DateTime<Tz>) -> Counts
where
    S: Borrow<Submission>,
    Tz: TimeZone,
{
    let mut counts = Counts {
        total: records.len(),
        ..Counts::default()
    };
    for record in records {
        let record = record.borrow();
        if window::is_same_day(record, now) {
            counts.today += 1;
        }
        if window::within_trailing_days(record, now, 7) {
            counts.week += 1;
        }
    }
    counts
}

/// The last few records in insertion order, most recently inserted first.
pub fn recent<S: Borrow<Submission>>(records: &[S], limit: usize) -> Vec<Submission> {
    records
        .iter()
        .rev()
        .take(limit)
        .map(|r| r.borrow().clone())
        .collect()
}

pub fn build<S, Tz>(records: &[S], now: &DateTime<Tz>) -> DashboardReport
where
    S: Borrow<Submission>,
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let weekday_counts = histogram::weekdays(records, &now.timezone());

    DashboardReport {
        generated_at: now.to_rfc3339(),
        counts: counts(records, now),
        daily: histogram::daily(records, now),
        weekdays: histogram::weekday_buckets(&weekday_counts),
        top_subjects: ranking::top_subjects(records, TOP_N),
        top_domains: ranking::top_domains(records, TOP_N),
        insights: insights::compute(records, &weekday_counts, now),
        recent: recent(records, RECENT_LIMIT),
    }
}

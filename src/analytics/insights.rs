use std::borrow::Borrow;

use chrono::{DateTime, TimeZone, Weekday};
use serde::Serialize;

use crate::models::Submission;

use super::histogram::{first_max, hours};
use super::window::{between_trailing_days, within_trailing_days};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insights {
    /// Hour of day with the most submissions; first one wins ties.
    pub peak_hour: Option<u32>,
    pub average_message_length: u64,
    pub most_active_day: Option<Weekday>,
    pub this_week: usize,
    pub last_week: usize,
    pub growth_percent: i64,
    /// Human-readable summary lines.
    pub lines: Vec<String>,
}

pub fn compute<S, Tz>(records: &[S], weekday_counts: &[usize; 7], now: &DateTime<Tz>) -> Insights
where
    S: Borrow<Submission>,
    Tz: TimeZone,
{
    let peak_hour = first_max(&hours(records, &now.timezone())).map(|h| h as u32);
    let average_message_length = average_message_length(records);
    let most_active_day = first_max(weekday_counts)
        .and_then(|idx| Weekday::try_from(idx as u8).ok());

    let this_week = records
        .iter()
        .filter(|r| within_trailing_days((*r).borrow(), now, 7))
        .count();
    let last_week = records
        .iter()
        .filter(|r| between_trailing_days((*r).borrow(), now, 7, 14))
        .count();
    let growth_percent = growth_percent(this_week, last_week);

    let mut lines = Vec::with_capacity(4);
    if let Some(hour) = peak_hour {
        lines.push(format!(
            "Peak submission time is {hour}:00 - {}:00",
            hour + 1
        ));
    }
    lines.push(format!(
        "Average message length is {average_message_length} characters"
    ));
    if let Some(day) = most_active_day {
        lines.push(format!("Most active day is {}", weekday_name(day)));
    }
    let sign = if growth_percent > 0 { "+" } else { "" };
    lines.push(format!("Week-over-week growth: {sign}{growth_percent}%"));

    Insights {
        peak_hour,
        average_message_length,
        most_active_day,
        this_week,
        last_week,
        growth_percent,
        lines,
    }
}

/// Mean message length in characters, rounded. An empty set averages to 0.
pub fn average_message_length<S: Borrow<Submission>>(records: &[S]) -> u64 {
    if records.is_empty() {
        return 0;
    }
    let total: usize = records
        .iter()
        .map(|r| r.borrow().message.chars().count())
        .sum();
    round_half_up(total as f64 / records.len() as f64).max(0) as u64
}

/// `(this - last) / last × 100`, rounded. Without a prior-week baseline the
/// growth is reported as 0 rather than infinite.
pub fn growth_percent(this_week: usize, last_week: usize) -> i64 {
    if last_week == 0 {
        return 0;
    }
    let ratio = (this_week as f64 - last_week as f64) / last_week as f64 * 100.0;
    round_half_up(ratio)
}

/// Halves round toward positive infinity.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

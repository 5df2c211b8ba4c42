use chrono::{DateTime, NaiveDate, TimeZone};

use crate::models::Submission;

pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Local calendar day of the submission in `tz`.
pub fn local_date<Tz: TimeZone>(submission: &Submission, tz: &Tz) -> Option<NaiveDate> {
    submission.time_in(tz).map(|t| t.date_naive())
}

/// Calendar-day equality in `now`'s zone, not a rolling 24h window.
pub fn is_same_day<Tz: TimeZone>(submission: &Submission, now: &DateTime<Tz>) -> bool {
    local_date(submission, &now.timezone()) == Some(now.date_naive())
}

/// Strictly after `now - days × 24h`. Future timestamps are included.
pub fn within_trailing_days<Tz: TimeZone>(
    submission: &Submission,
    now: &DateTime<Tz>,
    days: i64,
) -> bool {
    submission.timestamp > now.timestamp_millis() - days * DAY_MS
}

/// In `(now - to_days × 24h, now - from_days × 24h]`.
pub fn between_trailing_days<Tz: TimeZone>(
    submission: &Submission,
    now: &DateTime<Tz>,
    from_days: i64,
    to_days: i64,
) -> bool {
    let now_ms = now.timestamp_millis();
    submission.timestamp <= now_ms - from_days * DAY_MS
        && submission.timestamp > now_ms - to_days * DAY_MS
}

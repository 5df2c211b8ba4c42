//! Non-destructive filtering, sorting and pagination over a snapshot.

use std::str::FromStr;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::analytics::window::{is_same_day, within_trailing_days};
use crate::models::Submission;

pub const DEFAULT_PER_PAGE: usize = 10;
pub const MAX_PER_PAGE: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeWindow {
    #[default]
    All,
    Today,
    Week,
    Month,
}

impl TimeWindow {
    pub fn matches<Tz: TimeZone>(self, submission: &Submission, now: &DateTime<Tz>) -> bool {
        match self {
            TimeWindow::All => true,
            TimeWindow::Today => is_same_day(submission, now),
            TimeWindow::Week => within_trailing_days(submission, now, 7),
            TimeWindow::Month => within_trailing_days(submission, now, 30),
        }
    }
}

impl FromStr for TimeWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(TimeWindow::All),
            "today" => Ok(TimeWindow::Today),
            "week" => Ok(TimeWindow::Week),
            "month" => Ok(TimeWindow::Month),
            other => Err(format!("Unknown time window: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Store insertion order.
    #[default]
    Inserted,
    Newest,
    Oldest,
}

/// Case-insensitive substring search over the free-text fields.
#[derive(Debug, Clone, Default)]
pub struct Search {
    needle: Option<String>,
}

impl Search {
    /// A blank term matches everything. Otherwise the term is used as typed,
    /// surrounding spaces included.
    pub fn new(term: &str) -> Self {
        Self {
            needle: (!term.trim().is_empty()).then(|| term.to_lowercase()),
        }
    }

    pub fn matches(&self, submission: &Submission) -> bool {
        let Some(needle) = &self.needle else {
            return true;
        };
        [
            &submission.name,
            &submission.email,
            &submission.subject,
            &submission.message,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle.as_str()))
    }
}

/// Records passing both the time window and the search, in their original
/// relative order. The input is left untouched.
pub fn apply<'a, Tz: TimeZone>(
    records: &'a [Submission],
    window: TimeWindow,
    search: &Search,
    now: &DateTime<Tz>,
) -> Vec<&'a Submission> {
    records
        .iter()
        .filter(|s| window.matches(s, now))
        .filter(|s| search.matches(s))
        .collect()
}

/// Stable reorder of a view by timestamp.
pub fn sort(view: &mut [&Submission], order: SortOrder) {
    match order {
        SortOrder::Inserted => {}
        SortOrder::Newest => view.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
        SortOrder::Oldest => view.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
}

/// Slice out one page. `page` starts at 1; out-of-range pages are empty.
pub fn paginate<T: Clone>(items: &[T], page: Option<usize>, per_page: Option<usize>) -> Page<T> {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
    let total = items.len();
    let start = (page - 1).saturating_mul(per_page).min(total);
    let end = start.saturating_add(per_page).min(total);

    Page {
        items: items[start..end].to_vec(),
        total,
        page,
        per_page,
        total_pages: total.div_ceil(per_page),
    }
}

use std::borrow::Borrow;
use std::fmt::Write;

use chrono::TimeZone;
use serde::Serialize;

use crate::models::Submission;

pub const CSV_HEADER: [&str; 5] = ["Date", "Name", "Email", "Subject", "Message"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    #[default]
    Json,
}

impl ExportFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }

    pub fn filename(self) -> &'static str {
        match self {
            ExportFormat::Csv => "submissions.csv",
            ExportFormat::Json => "submissions.json",
        }
    }
}

/// Render records as CSV with dates in `tz`.
///
/// Escaping is deliberately minimal: commas in the message become semicolons
/// and nothing is quoted, so embedded quotes, newlines or commas in the other
/// fields pass through unchanged.
pub fn to_csv<S, Tz>(records: &[S], tz: &Tz) -> String
where
    S: Borrow<Submission>,
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut csv = CSV_HEADER.join(",");

    for record in records {
        let sub = record.borrow();
        let date = sub
            .time_in(tz)
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        let _ = write!(
            csv,
            "\n{date},{},{},{},{}",
            sub.name,
            sub.email,
            sub.subject,
            sub.message.replace(',', ";")
        );
    }

    csv
}

/// Pretty-printed JSON array, ids included.
pub fn to_json<S: Serialize>(records: &[S]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}

pub fn from_json(json: &str) -> Result<Vec<Submission>, serde_json::Error> {
    serde_json::from_str(json)
}

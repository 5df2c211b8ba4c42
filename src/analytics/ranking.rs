use std::borrow::Borrow;
use std::collections::HashMap;

use serde::Serialize;

use crate::models::Submission;

pub const TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub key: String,
    pub count: usize,
}

/// Group identical keys, rank by count descending and keep `limit` entries.
/// Ties keep the order in which keys were first seen.
pub fn rank<'a, I>(keys: I, limit: usize) -> Vec<RankedEntry>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<(&str, usize)> = Vec::new();

    for key in keys {
        match index.get(key) {
            Some(&i) => entries[i].1 += 1,
            None => {
                index.insert(key, entries.len());
                entries.push((key, 1));
            }
        }
    }

    // sort_by is stable, which preserves first-seen order among ties
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(limit);

    entries
        .into_iter()
        .map(|(key, count)| RankedEntry {
            key: key.to_string(),
            count,
        })
        .collect()
}

/// Most frequent exact subjects.
pub fn top_subjects<S: Borrow<Submission>>(records: &[S], limit: usize) -> Vec<RankedEntry> {
    rank(records.iter().map(|r| r.borrow().subject.as_str()), limit)
}

/// Most frequent email domains. Addresses without `@` are skipped.
pub fn top_domains<S: Borrow<Submission>>(records: &[S], limit: usize) -> Vec<RankedEntry> {
    rank(records.iter().filter_map(|r| r.borrow().email_domain()), limit)
}

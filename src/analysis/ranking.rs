use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::types::{VideoKind, VideoRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Views,
    Date,
    Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Sorted copy of `records`. Ties keep their input order; unparseable dates
/// sort before every valid date.
pub fn sort_videos(records: &[VideoRecord], key: SortKey, order: SortOrder) -> Vec<VideoRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = compare(a, b, key);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    sorted
}

fn compare(a: &VideoRecord, b: &VideoRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Views => a.views.cmp(&b.views),
        SortKey::Date => a.published_datetime().cmp(&b.published_datetime()),
        SortKey::Duration => a.duration_seconds.cmp(&b.duration_seconds),
    }
}

/// The `limit` most viewed videos, optionally of a single kind.
pub fn top_videos(records: &[VideoRecord], limit: usize, kind: Option<VideoKind>) -> Vec<VideoRecord> {
    let candidates: Vec<VideoRecord> = records
        .iter()
        .filter(|v| kind.map_or(true, |k| v.kind() == k))
        .cloned()
        .collect();
    let mut top = sort_videos(&candidates, SortKey::Views, SortOrder::Desc);
    top.truncate(limit);
    top
}

/// First `max_chars` characters of a title, with `...` when cut.
pub fn truncate_title(title: &str, max_chars: usize) -> String {
    match title.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &title[..end]),
        None => title.to_string(),
    }
}

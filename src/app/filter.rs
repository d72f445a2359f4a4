use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::types::VideoRecord;

/// Selection applied to the dataset before any statistic is computed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoFilter {
    /// Channels to keep; empty keeps every channel
    pub channels: Vec<String>,
    /// Inclusive publication date range
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    /// Keep regular videos only
    pub exclude_shorts: bool,
}

impl VideoFilter {
    /// Range covering the `days` days up to and including `today`.
    /// The start clamps to the earliest representable date.
    pub fn last_days(today: NaiveDate, days: i64) -> (NaiveDate, NaiveDate) {
        let start = TimeDelta::try_days(days)
            .and_then(|delta| today.checked_sub_signed(delta))
            .unwrap_or(NaiveDate::MIN);
        (start, today)
    }

    /// Videos with an unparseable date never match a date range.
    pub fn matches(&self, video: &VideoRecord) -> bool {
        let matches_channel =
            self.channels.is_empty() || self.channels.iter().any(|c| *c == video.channel_title);

        let matches_date = match self.date_range {
            None => true,
            Some((start, end)) => video
                .published_date()
                .map_or(false, |date| start <= date && date <= end),
        };

        let matches_kind = !self.exclude_shorts || !video.is_short();

        matches_channel && matches_date && matches_kind
    }

    pub fn apply(&self, records: &[VideoRecord]) -> Vec<VideoRecord> {
        records.iter().filter(|v| self.matches(v)).cloned().collect()
    }
}

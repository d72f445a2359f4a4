//! # Common Types
//!
//! This module contains the common types used throughout the crate for
//! representing video records and the per-group statistics derived from them.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Videos at or under this many seconds are classified as shorts.
pub const SHORT_MAX_SECONDS: u64 = 60;

/// A single video from the dataset.
///
/// Numeric fields are already coerced: anything absent or unparseable in the
/// source is stored as `0`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoRecord {
    /// Opaque YouTube video identifier
    pub video_id: String,
    /// Display title
    #[serde(rename = "video_title")]
    pub title: String,
    /// Channel name, the key used for every per-channel grouping
    pub channel_title: String,
    /// Publication timestamp as found in the source (ISO-8601 date or date-time)
    pub published_at: String,
    /// Total view count
    pub views: u64,
    /// Total like count
    pub likes: u64,
    /// Length of the video in seconds
    pub duration_seconds: u64,
    /// Optional thumbnail location, only used for display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl VideoRecord {
    /// Publication instant normalised to UTC, or `None` when `published_at`
    /// cannot be parsed.
    pub fn published_datetime(&self) -> Option<NaiveDateTime> {
        parse_published_at(&self.published_at)
    }

    /// Publication calendar date (UTC).
    pub fn published_date(&self) -> Option<NaiveDate> {
        self.published_datetime().map(|dt| dt.date())
    }

    pub fn kind(&self) -> VideoKind {
        VideoKind::from_duration(self.duration_seconds)
    }

    pub fn is_short(&self) -> bool {
        self.kind() == VideoKind::Short
    }
}

/// Parse a publication timestamp.
///
/// Accepts RFC 3339 date-times (converted to UTC), naive date-times with a `T`
/// or space separator, and plain `YYYY-MM-DD` dates (taken as midnight).
pub fn parse_published_at(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Short/regular split of a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoKind {
    Short,
    Regular,
}

impl VideoKind {
    pub fn from_duration(duration_seconds: u64) -> Self {
        if duration_seconds <= SHORT_MAX_SECONDS {
            VideoKind::Short
        } else {
            VideoKind::Regular
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VideoKind::Short => "Shorts",
            VideoKind::Regular => "Regular Videos",
        }
    }
}

/// Counts and sums for one group of records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedStat {
    /// Channel name or period label (`YYYY-MM`, `YYYY-MM-DD`)
    pub key: String,
    pub count: usize,
    pub total_views: u64,
    pub total_likes: u64,
}

impl AggregatedStat {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    /// Fold one record into the group. Totals saturate at `u64::MAX`.
    pub fn add(&mut self, video: &VideoRecord) {
        self.count += 1;
        self.total_views = self.total_views.saturating_add(video.views);
        self.total_likes = self.total_likes.saturating_add(video.likes);
    }

    /// Mean views per record, `0.0` for an empty group.
    pub fn avg_views(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_views as f64 / self.count as f64
        }
    }
}

/// Per-channel totals shown on the channel overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelStats {
    pub channel_title: String,
    pub total_videos: usize,
    pub total_views: u64,
    pub avg_views: f64,
}

impl From<&AggregatedStat> for ChannelStats {
    fn from(stat: &AggregatedStat) -> Self {
        Self {
            channel_title: stat.key.clone(),
            total_videos: stat.count,
            total_views: stat.total_views,
            avg_views: stat.avg_views(),
        }
    }
}

/// Count, totals and central tendencies of a set of views.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewSummary {
    pub count: usize,
    pub total_views: u64,
    pub avg_views: f64,
    pub median_views: f64,
}

/// Per-channel summary restricted to one [`VideoKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KindChannelStats {
    pub channel_title: String,
    pub kind: VideoKind,
    #[serde(flatten)]
    pub summary: ViewSummary,
}

/// Shorts against regular videos over the same selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShortsComparison {
    pub shorts: ViewSummary,
    pub regular: ViewSummary,
    pub total: ViewSummary,
    /// Percentage of the selected videos that are shorts, `0.0` when empty
    pub shorts_share: f64,
    pub regular_share: f64,
}

/// Shorts and regular videos of one channel side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelKindComparison {
    pub channel_title: String,
    pub shorts: ViewSummary,
    pub regular: ViewSummary,
    /// How much higher (or lower) the shorts average is than the regular
    /// average, in percent. `None` unless the channel has both kinds and a
    /// non-zero regular average.
    pub diff_percentage: Option<f64>,
}

/// Daily views for every channel over a shared, sorted date axis.
///
/// A `0` in a channel's values means the channel published nothing that day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySeries {
    /// `YYYY-MM-DD`, ascending
    pub dates: Vec<String>,
    pub channels: Vec<ChannelSeries>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSeries {
    pub channel_title: String,
    pub values: Vec<u64>,
}

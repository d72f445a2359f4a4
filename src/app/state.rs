use chrono::{NaiveDate, Utc};
use log::debug;
use serde::Serialize;

use super::filter::VideoFilter;
use crate::analysis::aggregation::{
    channel_kind_comparison, channel_totals, channels_in_order, daily_views_by_channel,
    kind_channel_stats, shorts_comparison,
};
use crate::analysis::ranking::top_videos;
use crate::analysis::trends::{monthly_trends, views_likes_correlation, ChannelCorrelation, MonthlyTrend};
use crate::config::DashboardConfig;
use crate::parser::{ParsedVideos, RowIssue};
use crate::types::{
    ChannelKindComparison, ChannelStats, DailySeries, KindChannelStats, ShortsComparison,
    VideoKind, VideoRecord,
};
use crate::utils::colors::{assign_colors_with, ChannelColorMap};

/// The loaded dataset plus the current selection.
///
/// Every view is recomputed from `videos` and `filter` when asked for.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub videos: Vec<VideoRecord>,
    pub issues: Vec<RowIssue>,
    /// Every channel in the dataset, in first-seen order
    pub available_channels: Vec<String>,
    /// Built once from `available_channels`, so colors do not shift when the
    /// selection changes
    pub channel_colors: ChannelColorMap,
    pub filter: VideoFilter,
    pub config: DashboardConfig,
}

/// Overview shown by `summary`.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub video_count: usize,
    pub filtered_count: usize,
    pub issue_count: usize,
    pub channels: Vec<ChannelStats>,
    pub shorts: ShortsComparison,
    pub shorts_by_channel: Vec<KindChannelStats>,
    pub regular_by_channel: Vec<KindChannelStats>,
    pub channel_comparison: Vec<ChannelKindComparison>,
    pub colors: ChannelColorMap,
}

impl Dashboard {
    /// Initial state: the first `max_selected_channels` channels and the
    /// configured window ending today.
    pub fn new(parsed: ParsedVideos, config: DashboardConfig) -> Self {
        let today = Utc::now().date_naive();
        Self::new_at(parsed, config, today)
    }

    /// Like [`Dashboard::new`] with an explicit "today".
    pub fn new_at(parsed: ParsedVideos, config: DashboardConfig, today: NaiveDate) -> Self {
        let available_channels = channels_in_order(&parsed.records);
        let channel_colors = assign_colors_with(&available_channels, &config.palette);

        let filter = VideoFilter {
            channels: available_channels
                .iter()
                .take(config.max_selected_channels)
                .cloned()
                .collect(),
            date_range: (config.default_window_days > 0)
                .then(|| VideoFilter::last_days(today, config.default_window_days)),
            exclude_shorts: false,
        };

        Self {
            videos: parsed.records,
            issues: parsed.issues,
            available_channels,
            channel_colors,
            filter,
            config,
        }
    }

    pub fn set_filter(&mut self, filter: VideoFilter) {
        self.filter = filter;
    }

    /// Add or remove a channel from the selection.
    pub fn toggle_channel(&mut self, channel: &str) {
        if let Some(pos) = self.filter.channels.iter().position(|c| c == channel) {
            self.filter.channels.remove(pos);
        } else {
            self.filter.channels.push(channel.to_string());
        }
    }

    pub fn filtered_videos(&self) -> Vec<VideoRecord> {
        let filtered = self.filter.apply(&self.videos);
        debug!(
            "Filter kept {} of {} videos",
            filtered.len(),
            self.videos.len()
        );
        filtered
    }

    pub fn channel_stats(&self) -> Vec<ChannelStats> {
        channel_totals(&self.filtered_videos())
    }

    pub fn shorts_comparison(&self) -> ShortsComparison {
        shorts_comparison(&self.filtered_videos())
    }

    pub fn kind_channel_stats(&self, kind: VideoKind) -> Vec<KindChannelStats> {
        kind_channel_stats(&self.filtered_videos(), kind)
    }

    pub fn channel_kind_comparison(&self) -> Vec<ChannelKindComparison> {
        channel_kind_comparison(&self.filtered_videos())
    }

    pub fn daily_views(&self) -> DailySeries {
        daily_views_by_channel(&self.filtered_videos())
    }

    pub fn monthly_trends(&self) -> Vec<MonthlyTrend> {
        monthly_trends(&self.filtered_videos())
    }

    pub fn views_likes_correlation(&self) -> Vec<ChannelCorrelation> {
        views_likes_correlation(&self.filtered_videos())
    }

    pub fn top_videos(&self, limit: usize, kind: Option<VideoKind>) -> Vec<VideoRecord> {
        top_videos(&self.filtered_videos(), limit, kind)
    }

    pub fn report(&self) -> DashboardReport {
        let filtered = self.filtered_videos();
        DashboardReport {
            video_count: self.videos.len(),
            filtered_count: filtered.len(),
            issue_count: self.issues.len(),
            channels: channel_totals(&filtered),
            shorts: shorts_comparison(&filtered),
            shorts_by_channel: kind_channel_stats(&filtered, VideoKind::Short),
            regular_by_channel: kind_channel_stats(&filtered, VideoKind::Regular),
            channel_comparison: channel_kind_comparison(&filtered),
            colors: self.channel_colors.clone(),
        }
    }
}

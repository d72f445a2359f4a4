//! Grouping of video records by channel and calendar period.
//!
//! Every function builds fresh collections from the slice it is given.
//! Groups come back in first-seen key order unless documented otherwise.
//! Period keys are `YYYY-MM` / `YYYY-MM-DD`, so sorting them as strings sorts
//! them chronologically.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use super::stats::{as_f64, median};
use crate::types::{
    AggregatedStat, ChannelKindComparison, ChannelSeries, ChannelStats, DailySeries,
    KindChannelStats, ShortsComparison, VideoKind, VideoRecord, ViewSummary,
};

/// Group `records` by the key `key_fn` returns, skipping records it maps to
/// `None`. Groups are returned in the order their key was first seen.
pub fn group_by<F>(records: &[VideoRecord], key_fn: F) -> Vec<AggregatedStat>
where
    F: Fn(&VideoRecord) -> Option<String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<AggregatedStat> = Vec::new();

    for video in records {
        let Some(key) = key_fn(video) else { continue };
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(AggregatedStat::new(key));
            groups.len() - 1
        });
        groups[slot].add(video);
    }

    groups
}

/// `YYYY-MM` of the publication date, `None` for an unparseable date.
pub fn month_key(video: &VideoRecord) -> Option<String> {
    video
        .published_date()
        .map(|date| date.format("%Y-%m").to_string())
}

/// `YYYY-MM-DD` of the publication date, `None` for an unparseable date.
pub fn date_key(video: &VideoRecord) -> Option<String> {
    video
        .published_date()
        .map(|date| date.format("%Y-%m-%d").to_string())
}

fn warn_undated(records: &[VideoRecord], context: &str) {
    let undated = records
        .iter()
        .filter(|v| v.published_date().is_none())
        .count();
    if undated > 0 {
        warn!(
            "Skipping {} videos with invalid published_at from {}",
            undated, context
        );
    }
}

/// Distinct channel names in first-seen order.
pub fn channels_in_order(records: &[VideoRecord]) -> Vec<String> {
    group_by(records, |v| Some(v.channel_title.clone()))
        .into_iter()
        .map(|stat| stat.key)
        .collect()
}

/// Split records into per-channel lists, channels in first-seen order.
pub fn partition_by_channel(records: &[VideoRecord]) -> Vec<(String, Vec<VideoRecord>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut channels: Vec<(String, Vec<VideoRecord>)> = Vec::new();

    for video in records {
        let slot = *index.entry(video.channel_title.as_str()).or_insert_with(|| {
            channels.push((video.channel_title.clone(), Vec::new()));
            channels.len() - 1
        });
        channels[slot].1.push(video.clone());
    }

    channels
}

/// Count, total views and average views per channel.
pub fn channel_totals(records: &[VideoRecord]) -> Vec<ChannelStats> {
    group_by(records, |v| Some(v.channel_title.clone()))
        .iter()
        .map(ChannelStats::from)
        .collect()
}

/// Totals per calendar month, sorted chronologically.
pub fn group_by_month(records: &[VideoRecord]) -> Vec<AggregatedStat> {
    warn_undated(records, "monthly totals");
    let mut months = group_by(records, month_key);
    months.sort_by(|a, b| a.key.cmp(&b.key));
    months
}

/// Monthly totals for one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMonthly {
    pub channel_title: String,
    /// Sorted by `key` (`YYYY-MM`)
    pub months: Vec<AggregatedStat>,
}

/// Group by `(channel, month)`: channels in first-seen order, months sorted.
pub fn monthly_by_channel(records: &[VideoRecord]) -> Vec<ChannelMonthly> {
    partition_by_channel(records)
        .into_iter()
        .map(|(channel_title, videos)| ChannelMonthly {
            channel_title,
            months: group_by_month(&videos),
        })
        .collect()
}

/// Views per channel per publication date on a shared date axis.
///
/// The axis is the sorted union of every date in `records`. Channels with no
/// video on a date get `0` there. Several videos on the same date are summed.
pub fn daily_views_by_channel(records: &[VideoRecord]) -> DailySeries {
    warn_undated(records, "daily series");

    let dates: Vec<String> = records
        .iter()
        .filter_map(date_key)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let position: HashMap<&str, usize> = dates
        .iter()
        .enumerate()
        .map(|(i, d)| (d.as_str(), i))
        .collect();

    let channels = partition_by_channel(records)
        .into_iter()
        .map(|(channel_title, videos)| {
            let mut values = vec![0u64; dates.len()];
            for video in &videos {
                if let Some(&i) = date_key(video).as_deref().and_then(|d| position.get(d)) {
                    values[i] = values[i].saturating_add(video.views);
                }
            }
            ChannelSeries {
                channel_title,
                values,
            }
        })
        .collect();

    debug!("Built daily series over {} dates", dates.len());
    DailySeries { dates, channels }
}

/// Count, total, mean and median views of `records`.
pub fn summarize_views<'a>(records: impl IntoIterator<Item = &'a VideoRecord>) -> ViewSummary {
    let views: Vec<u64> = records.into_iter().map(|v| v.views).collect();
    let total_views = views.iter().fold(0u64, |acc, v| acc.saturating_add(*v));
    let count = views.len();

    ViewSummary {
        count,
        total_views,
        avg_views: if count > 0 {
            total_views as f64 / count as f64
        } else {
            0.0
        },
        median_views: median(&as_f64(views)),
    }
}

/// Shorts against regular videos, plus the overall summary.
pub fn shorts_comparison(records: &[VideoRecord]) -> ShortsComparison {
    let shorts = summarize_views(records.iter().filter(|v| v.kind() == VideoKind::Short));
    let regular = summarize_views(records.iter().filter(|v| v.kind() == VideoKind::Regular));
    let total = summarize_views(records);

    ShortsComparison {
        shorts_share: share(shorts.count, total.count),
        regular_share: share(regular.count, total.count),
        shorts,
        regular,
        total,
    }
}

fn share(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Shorts against regular videos for every channel, in first-seen order.
pub fn channel_kind_comparison(records: &[VideoRecord]) -> Vec<ChannelKindComparison> {
    partition_by_channel(records)
        .into_iter()
        .map(|(channel_title, videos)| {
            let shorts = summarize_views(videos.iter().filter(|v| v.kind() == VideoKind::Short));
            let regular = summarize_views(videos.iter().filter(|v| v.kind() == VideoKind::Regular));
            let diff_percentage = (shorts.count > 0 && regular.count > 0 && regular.avg_views > 0.0)
                .then(|| (shorts.avg_views / regular.avg_views - 1.0) * 100.0);
            ChannelKindComparison {
                channel_title,
                shorts,
                regular,
                diff_percentage,
            }
        })
        .collect()
}

/// Per-channel summary of the videos of one kind. Channels without such
/// videos are left out.
pub fn kind_channel_stats(records: &[VideoRecord], kind: VideoKind) -> Vec<KindChannelStats> {
    partition_by_channel(records)
        .into_iter()
        .filter_map(|(channel_title, videos)| {
            let summary = summarize_views(videos.iter().filter(|v| v.kind() == kind));
            (summary.count > 0).then_some(KindChannelStats {
                channel_title,
                kind,
                summary,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn video(id: &str, channel: &str, date: &str, views: u64) -> VideoRecord {
        VideoRecord {
            video_id: id.to_string(),
            title: format!("Video {id}"),
            channel_title: channel.to_string(),
            published_at: date.to_string(),
            views,
            likes: views / 10,
            duration_seconds: 300,
            thumbnail_url: None,
        }
    }

    #[test]
    fn test_group_by_keeps_first_seen_order() {
        let records = vec![
            video("1", "B", "2024-01-01", 1),
            video("2", "A", "2024-01-01", 2),
            video("3", "B", "2024-01-02", 3),
        ];
        let groups = group_by(&records, |v| Some(v.channel_title.clone()));
        let keys: Vec<_> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["B", "A"]);
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[0].total_views, 4);
        assert_eq!(groups[0].total_likes, 0);
    }

    #[test]
    fn test_empty_group_average_is_zero() {
        assert_eq!(AggregatedStat::new("empty").avg_views(), 0.0);
        assert!(channel_totals(&[]).is_empty());
    }

    #[test]
    fn test_months_sorted_and_invalid_dates_skipped() {
        let records = vec![
            video("1", "A", "2024-03-15", 10),
            video("2", "A", "2023-12-31T23:00:00Z", 20),
            video("3", "A", "garbage", 1000),
            video("4", "A", "2024-03-01", 5),
        ];
        let months = group_by_month(&records);
        let keys: Vec<_> = months.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, vec!["2023-12", "2024-03"]);
        assert_eq!(months[1].total_views, 15);
        assert_eq!(months.iter().map(|m| m.count).sum::<usize>(), 3);
    }

    #[test]
    fn test_month_key_uses_utc() {
        let v = video("1", "A", "2024-01-31T23:30:00-02:00", 1);
        assert_eq!(month_key(&v), Some("2024-02".to_string()));
        assert_eq!(date_key(&v), Some("2024-02-01".to_string()));
    }

    #[test]
    fn test_monthly_by_channel() {
        let records = vec![
            video("1", "X", "2024-02-01", 1),
            video("2", "Y", "2024-01-01", 2),
            video("3", "X", "2024-01-05", 3),
            video("4", "X", "2024-01-20", 4),
        ];
        let monthly = monthly_by_channel(&records);
        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].channel_title, "X");
        let x: Vec<_> = monthly[0]
            .months
            .iter()
            .map(|m| (m.key.as_str(), m.count, m.total_views))
            .collect();
        assert_eq!(x, vec![("2024-01", 2, 7), ("2024-02", 1, 1)]);
        assert_eq!(monthly[1].months.len(), 1);
    }

    #[test]
    fn test_daily_series_zero_fills() {
        let records = vec![
            video("1", "X", "2024-01-03", 30),
            video("2", "Y", "2024-01-01", 10),
            video("3", "X", "2024-01-01", 5),
            video("4", "X", "2024-01-01T18:00:00Z", 7),
            video("5", "Y", "nope", 99),
        ];
        let daily = daily_views_by_channel(&records);
        assert_eq!(daily.dates, vec!["2024-01-01", "2024-01-03"]);
        assert_eq!(
            daily.channels,
            vec![
                ChannelSeries {
                    channel_title: "X".to_string(),
                    values: vec![12, 30],
                },
                ChannelSeries {
                    channel_title: "Y".to_string(),
                    values: vec![10, 0],
                },
            ]
        );
    }

    #[test]
    fn test_shorts_comparison() {
        let mut records = vec![
            video("1", "X", "2024-01-01", 100),
            video("2", "X", "2024-01-02", 300),
            video("3", "Y", "2024-01-03", 50),
        ];
        records[0].duration_seconds = 60;
        records[2].duration_seconds = 15;

        let comparison = shorts_comparison(&records);
        assert_eq!(comparison.shorts.count, 2);
        assert_eq!(comparison.shorts.total_views, 150);
        assert_eq!(comparison.shorts.avg_views, 75.0);
        assert_eq!(comparison.shorts.median_views, 75.0);
        assert_eq!(comparison.regular.count, 1);
        assert_eq!(comparison.regular.median_views, 300.0);
        assert_eq!(comparison.total.count, 3);
        assert_eq!(comparison.total.total_views, 450);
        assert_eq!(comparison.total.median_views, 100.0);
    }

    #[test]
    fn test_summary_of_nothing() {
        assert_eq!(summarize_views(&[]), ViewSummary::default());
    }

    #[test]
    fn test_kind_channel_stats_skips_channels_without_kind() {
        let mut records = vec![
            video("1", "X", "2024-01-01", 100),
            video("2", "Y", "2024-01-02", 300),
            video("3", "X", "2024-01-03", 50),
        ];
        records[0].duration_seconds = 30;
        records[2].duration_seconds = 45;

        let shorts = kind_channel_stats(&records, VideoKind::Short);
        assert_eq!(shorts.len(), 1);
        assert_eq!(shorts[0].channel_title, "X");
        assert_eq!(shorts[0].summary.count, 2);
        assert_eq!(shorts[0].summary.median_views, 75.0);

        let regular = kind_channel_stats(&records, VideoKind::Regular);
        assert_eq!(regular.len(), 1);
        assert_eq!(regular[0].channel_title, "Y");
    }

    #[test]
    fn test_shares_of_total() {
        let mut records = vec![
            video("1", "X", "2024-01-01", 10),
            video("2", "X", "2024-01-02", 10),
            video("3", "X", "2024-01-03", 10),
            video("4", "X", "2024-01-04", 10),
        ];
        records[0].duration_seconds = 60;

        let comparison = shorts_comparison(&records);
        assert_eq!(comparison.shorts_share, 25.0);
        assert_eq!(comparison.regular_share, 75.0);

        let empty = shorts_comparison(&[]);
        assert_eq!(empty.shorts_share, 0.0);
        assert_eq!(empty.regular_share, 0.0);
    }

    #[test]
    fn test_channel_kind_comparison() {
        let mut records = vec![
            video("1", "X", "2024-01-01", 300),
            video("2", "X", "2024-01-02", 200),
            video("3", "Y", "2024-01-03", 50),
            video("4", "Z", "2024-01-04", 40),
            video("5", "Z", "2024-01-05", 0),
        ];
        records[0].duration_seconds = 30;
        records[2].duration_seconds = 30;
        records[3].duration_seconds = 30;

        let rows = channel_kind_comparison(&records);
        let channels: Vec<_> = rows.iter().map(|r| r.channel_title.as_str()).collect();
        assert_eq!(channels, vec!["X", "Y", "Z"]);

        // Shorts average 300 against a regular average of 200
        assert_eq!(rows[0].shorts.count, 1);
        assert_eq!(rows[0].regular.count, 1);
        assert_eq!(rows[0].diff_percentage, Some(50.0));

        // Only shorts: nothing to compare against
        assert_eq!(rows[1].regular.count, 0);
        assert_eq!(rows[1].diff_percentage, None);

        // Regular videos exist but average zero views
        assert_eq!(rows[2].regular.count, 1);
        assert_eq!(rows[2].regular.avg_views, 0.0);
        assert_eq!(rows[2].diff_percentage, None);
    }

    #[test]
    fn test_totals_saturate_instead_of_overflowing() {
        let parsed = crate::parser::parse_videos(
            "video_id,channel_title,published_at,views\na,X,2024-01-01,18446744073709551615\nb,X,2024-01-01,1\n",
        )
        .unwrap();
        assert!(parsed.issues.is_empty());

        let totals = channel_totals(&parsed.records);
        assert_eq!(totals[0].total_views, u64::MAX);

        let months = group_by_month(&parsed.records);
        assert_eq!(months[0].total_views, u64::MAX);

        let series = daily_views_by_channel(&parsed.records);
        assert_eq!(series.channels[0].values, vec![u64::MAX]);

        let summary = summarize_views(&parsed.records);
        assert_eq!(summary.total_views, u64::MAX);
        assert_eq!(summary.count, 2);
    }
}

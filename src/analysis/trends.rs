//! Per-channel regressions: monthly view trends and views-vs-likes correlation.

use chrono::NaiveDate;
use serde::Serialize;

use super::aggregation::{group_by_month, partition_by_channel};
use super::regression::{
    simple_linear_regression, simple_linear_regression_xy, CorrelationStrength, Point,
    RegressionResult, Trend,
};
use super::stats::{as_f64, min_max_normalize};
use crate::types::VideoRecord;

/// Monthly views of one channel with a fitted linear trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTrend {
    pub channel_title: String,
    /// `YYYY-MM`, ascending
    pub months: Vec<String>,
    /// Display form of `months`, e.g. `Jan 2024`
    pub labels: Vec<String>,
    pub views: Vec<f64>,
    /// Fitted value for each month
    pub fitted: Vec<f64>,
    pub regression: RegressionResult,
    pub trend: Trend,
}

/// Fit a trend through each channel's monthly view totals.
///
/// The month index is the X axis, so gaps between months are not weighted.
pub fn monthly_trends(records: &[VideoRecord]) -> Vec<MonthlyTrend> {
    partition_by_channel(records)
        .into_iter()
        .map(|(channel_title, videos)| {
            let months = group_by_month(&videos);
            let views = as_f64(months.iter().map(|m| m.total_views));
            let regression = simple_linear_regression(&views);
            let fitted = (0..views.len())
                .map(|i| regression.predict(i as f64))
                .collect();
            let keys: Vec<String> = months.into_iter().map(|m| m.key).collect();

            MonthlyTrend {
                channel_title,
                labels: keys.iter().map(|k| month_label(k)).collect(),
                months: keys,
                views,
                fitted,
                trend: regression.trend(),
                regression,
            }
        })
        .collect()
}

/// `2024-01` → `Jan 2024`. Keys that are not a month come back unchanged.
pub fn month_label(key: &str) -> String {
    NaiveDate::parse_from_str(&format!("{key}-01"), "%Y-%m-%d")
        .map(|date| date.format("%b %Y").to_string())
        .unwrap_or_else(|_| key.to_string())
}

/// Views against likes for one channel, both min-max normalised.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelCorrelation {
    pub channel_title: String,
    /// `x` = normalised views, `y` = normalised likes
    pub points: Vec<Point>,
    /// Raw `(views, likes)` per point, in the same order
    pub original: Vec<(u64, u64)>,
    pub regression: RegressionResult,
    pub strength: CorrelationStrength,
}

/// Regress normalised likes on normalised views for each channel.
pub fn views_likes_correlation(records: &[VideoRecord]) -> Vec<ChannelCorrelation> {
    partition_by_channel(records)
        .into_iter()
        .map(|(channel_title, videos)| {
            let views = min_max_normalize(&as_f64(videos.iter().map(|v| v.views)));
            let likes = min_max_normalize(&as_f64(videos.iter().map(|v| v.likes)));
            let points: Vec<Point> = views
                .iter()
                .zip(&likes)
                .map(|(&x, &y)| Point::new(x, y))
                .collect();
            let regression = simple_linear_regression_xy(&points);

            ChannelCorrelation {
                channel_title,
                points,
                original: videos.iter().map(|v| (v.views, v.likes)).collect(),
                strength: regression.correlation(),
                regression,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::regression::{TrendDirection, TrendStrength};
    use pretty_assertions::assert_eq;

    fn video(channel: &str, date: &str, views: u64, likes: u64) -> VideoRecord {
        VideoRecord {
            video_id: format!("{channel}-{date}-{views}"),
            title: "t".to_string(),
            channel_title: channel.to_string(),
            published_at: date.to_string(),
            views,
            likes,
            duration_seconds: 120,
            thumbnail_url: None,
        }
    }

    #[test]
    fn test_month_label() {
        assert_eq!(month_label("2024-01"), "Jan 2024");
        assert_eq!(month_label("2023-12"), "Dec 2023");
        assert_eq!(month_label("bogus"), "bogus");
    }

    #[test]
    fn test_monthly_trend_growing_channel() {
        let records = vec![
            video("A", "2024-03-02", 300, 3),
            video("A", "2024-01-10", 100, 1),
            video("B", "2024-01-10", 50, 1),
            video("A", "2024-02-10", 150, 1),
            video("A", "2024-02-20", 50, 1),
        ];
        let trends = monthly_trends(&records);
        assert_eq!(trends.len(), 2);

        let a = &trends[0];
        assert_eq!(a.channel_title, "A");
        assert_eq!(a.months, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(a.labels, vec!["Jan 2024", "Feb 2024", "Mar 2024"]);
        assert_eq!(a.views, vec![100.0, 200.0, 300.0]);
        assert_eq!(a.fitted.len(), 3);
        assert!((a.fitted[2] - 300.0).abs() < 1e-9);
        assert_eq!(a.trend.strength, TrendStrength::Strong);
        assert_eq!(a.trend.direction, TrendDirection::Increase);

        let b = &trends[1];
        assert_eq!(b.regression, RegressionResult::default());
        assert_eq!(b.trend.to_string(), "Weak decrease");
    }

    #[test]
    fn test_views_likes_correlation() {
        let records = vec![
            video("A", "2024-01-01", 100, 10),
            video("A", "2024-01-02", 300, 30),
            video("A", "2024-01-03", 200, 20),
        ];
        let correlation = views_likes_correlation(&records);
        assert_eq!(correlation.len(), 1);

        let a = &correlation[0];
        assert_eq!(
            a.points,
            vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 1.0),
                Point::new(0.5, 0.5)
            ]
        );
        assert_eq!(a.original, vec![(100, 10), (300, 30), (200, 20)]);
        assert!((a.regression.r_squared - 1.0).abs() < 1e-9);
        assert_eq!(a.strength, CorrelationStrength::Strong);
        assert!(a.regression.regression_line.is_some());
    }

    #[test]
    fn test_correlation_of_constant_channel() {
        let records = vec![
            video("A", "2024-01-01", 100, 10),
            video("A", "2024-01-02", 100, 10),
        ];
        let a = &views_likes_correlation(&records)[0];
        assert_eq!(a.points, vec![Point::new(0.5, 0.5), Point::new(0.5, 0.5)]);
        assert_eq!(a.regression.r_squared, 1.0);
    }
}

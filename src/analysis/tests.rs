//! End-to-end checks over parsed CSV text.

use super::*;
use crate::parser::{parse_csv_line, parse_videos};
use crate::types::VideoKind;
use crate::utils::colors::assign_colors;
use pretty_assertions::assert_eq;

const DATASET: &str = "\
video_id,video_title,channel_title,published_at,views,likes,duration_seconds,thumbnail_url
x1,\"Phone review, part 1\",X,2024-01-05T10:00:00Z,10,1,600,
x2,Teardown,X,2024-02-05T10:00:00Z,20,2,45,
x3,\"The \"\"best\"\" laptop\",X,2024-03-05T10:00:00Z,30,3,61,
y1,Unboxing,Y,2024-01-07,5,1,60,
y2,Setup tour,Y,2024-03-09,5,2,900,
";

#[test]
fn test_csv_row_with_embedded_comma() {
    let fields = parse_csv_line("\"Title, with comma\",Channel,2024-01-01,100,10,45,url");
    assert_eq!(fields.len(), 7);
    assert_eq!(fields[0], "Title, with comma");
    assert_eq!(fields[6], "url");
}

#[test]
fn test_channel_aggregation_over_parsed_rows() {
    let parsed = parse_videos(DATASET).unwrap();
    assert!(parsed.issues.is_empty());
    assert_eq!(parsed.records[2].title, "The \"best\" laptop");

    let totals = channel_totals(&parsed.records);
    let summary: Vec<_> = totals
        .iter()
        .map(|c| (c.channel_title.as_str(), c.total_videos, c.total_views, c.avg_views))
        .collect();
    assert_eq!(summary, vec![("X", 3, 60, 20.0), ("Y", 2, 10, 5.0)]);
}

#[test]
fn test_short_boundary_is_sixty_seconds() {
    let parsed = parse_videos(DATASET).unwrap();
    let kinds: Vec<_> = parsed.records.iter().map(|v| v.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            VideoKind::Regular,
            VideoKind::Short,
            VideoKind::Regular,
            VideoKind::Short,
            VideoKind::Regular,
        ]
    );

    let comparison = shorts_comparison(&parsed.records);
    assert_eq!(comparison.shorts.count, 2);
    assert_eq!(comparison.regular.count, 3);
}

#[test]
fn test_monthly_trend_over_parsed_rows() {
    let parsed = parse_videos(DATASET).unwrap();
    let trends = monthly_trends(&parsed.records);
    let x = &trends[0];
    assert_eq!(x.views, vec![10.0, 20.0, 30.0]);
    assert!((x.regression.slope - 10.0).abs() < 1e-9);
    assert!((x.regression.r_squared - 1.0).abs() < 1e-9);
    assert_eq!(x.trend.to_string(), "Strong increase");

    let y = &trends[1];
    assert_eq!(y.months, vec!["2024-01", "2024-03"]);
    assert_eq!(y.regression.r_squared, 1.0);
    assert_eq!(y.trend.to_string(), "Strong decrease");
}

#[test]
fn test_documented_sentinels() {
    let flat = simple_linear_regression(&[5.0, 5.0, 5.0, 5.0]);
    assert_eq!(flat.r_squared, 1.0);
    assert_eq!(min_max_normalize(&[3.0, 3.0]), vec![0.5, 0.5]);
    assert_eq!(median(&[]), 0.0);
    assert_eq!(median(&[7.0, 1.0, 3.0]), 3.0);
    assert_eq!(median(&[7.0, 1.0, 3.0, 5.0]), 4.0);
}

#[test]
fn test_colors_follow_channel_order() {
    let parsed = parse_videos(DATASET).unwrap();
    let channels: Vec<String> = parsed.records.iter().map(|v| v.channel_title.clone()).collect();
    let colors = assign_colors(&channels);
    assert_eq!(colors.len(), 2);
    assert_eq!(colors.get("X"), Some("#D95B5B"));
    assert_eq!(colors.get("Y"), Some("#778D8D"));
}

use super::chart::*;
use crate::analysis::trends::{monthly_trends, views_likes_correlation, ChannelCorrelation};
use crate::app::Dashboard;
use crate::config::DashboardConfig;
use crate::parser::parse_videos;
use crate::types::{ChannelSeries, ChannelStats, DailySeries};
use crate::utils::colors::{assign_colors, ChannelColorMap};
use plotters::prelude::*;
use std::fs;
use tempfile::TempDir;

const DATASET: &str = "\
video_id,video_title,channel_title,published_at,views,likes,duration_seconds
a,First,X,2024-01-05,10,1,120
b,Second,X,2024-02-05,20,3,45
c,Third,X,2024-03-05,30,4,300
d,Other,Y,2024-01-20,5,1,30
e,Other again,Y,2024-03-20,5,2,90
";

fn setup_dashboard() -> (Dashboard, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let parsed = parse_videos(DATASET).unwrap();
    let config = DashboardConfig {
        default_window_days: 0,
        chart_width: 400,
        chart_height: 300,
        ..Default::default()
    };
    (Dashboard::new(parsed, config), temp_dir)
}

fn assert_non_empty(path: &std::path::Path) {
    let metadata = fs::metadata(path).unwrap();
    assert!(metadata.len() > 0);
}

#[test]
fn test_adaptive_range() {
    // 1..=19 plus one outlier at 100
    let mut values: Vec<f64> = (1..20).map(f64::from).collect();
    values.push(100.0);
    let (min, max) = calculate_adaptive_range(&values);

    assert_eq!(min, 0.0);
    assert!((max - 19.0 * 1.2).abs() < 1e-9);
}

#[test]
fn test_adaptive_range_without_outlier() {
    let (min, max) = calculate_adaptive_range(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    assert_eq!(min, 0.0);
    assert!((max - 5.5).abs() < 1e-9);
}

#[test]
fn test_adaptive_range_degenerate() {
    assert_eq!(calculate_adaptive_range(&[]), (0.0, 1.0));
    assert_eq!(calculate_adaptive_range(&[0.0, 0.0]), (0.0, 1.0));
}

#[test]
fn test_month_axis_is_union_of_channels() {
    let parsed = parse_videos(DATASET).unwrap();
    let trends = monthly_trends(&parsed.records);
    assert_eq!(month_axis(&trends), vec!["2024-01", "2024-02", "2024-03"]);
    assert!(month_axis(&[]).is_empty());
}

#[test]
fn test_options_follow_config() {
    let config = DashboardConfig {
        dark_mode: true,
        chart_width: 800,
        chart_height: 600,
        ..Default::default()
    };
    let options = ChartOptions::from_config(&config);
    assert_eq!(options.size, (800, 600));
    assert_eq!(options.theme, crate::plotting::ChartTheme::dark());
    assert_eq!(options.max_points, config.max_plot_points);
}

const CANVAS: (u32, u32) = (120, 80);

enum Layer<'d> {
    Bars(&'d [ChannelStats]),
    Daily(&'d DailySeries),
    Scatter(&'d [ChannelCorrelation]),
}

/// Draw onto an in-memory canvas through a chart without captions or axis
/// labels, so no font is needed.
fn draw_on_canvas(
    layer: Layer<'_>,
    colors: &ChannelColorMap,
    x_range: std::ops::Range<f64>,
    y_range: std::ops::Range<f64>,
) -> Vec<u8> {
    let options = ChartOptions::default();
    let mut buffer = vec![0u8; (CANVAS.0 * CANVAS.1 * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, CANVAS).into_drawing_area();
        root.fill(&WHITE).unwrap();
        let mut chart = ChartBuilder::on(&root)
            .build_cartesian_2d(x_range, y_range)
            .unwrap();
        match layer {
            Layer::Bars(stats) => draw_channel_bars(&mut chart, stats, colors).unwrap(),
            Layer::Daily(series) => draw_daily_lines(&mut chart, series, colors, &options).unwrap(),
            Layer::Scatter(correlations) => {
                draw_correlations(&mut chart, correlations, colors, &options).unwrap()
            }
        }
        root.present().unwrap();
    }
    buffer
}

fn pixels_of(buffer: &[u8], color: (u8, u8, u8)) -> usize {
    buffer
        .chunks_exact(3)
        .filter(|p| (p[0], p[1], p[2]) == color)
        .count()
}

#[test]
fn test_channel_bars_use_channel_colors() {
    let stats = vec![
        ChannelStats {
            channel_title: "X".to_string(),
            total_videos: 3,
            total_views: 60,
            avg_views: 20.0,
        },
        ChannelStats {
            channel_title: "Y".to_string(),
            total_videos: 2,
            total_views: 10,
            avg_views: 5.0,
        },
    ];
    let colors = assign_colors(&["X", "Y"]);

    let buffer = draw_on_canvas(Layer::Bars(&stats), &colors, 0.0..2.0, 0.0..66.0);

    let x_pixels = pixels_of(&buffer, (0xD9, 0x5B, 0x5B));
    let y_pixels = pixels_of(&buffer, (0x77, 0x8D, 0x8D));
    assert!(x_pixels > 0);
    assert!(y_pixels > 0);
    // Six times the views, so a much taller bar
    assert!(x_pixels > y_pixels * 3);
}

#[test]
fn test_daily_lines_drawn() {
    let series = DailySeries {
        dates: vec![
            "2024-01-01".to_string(),
            "2024-01-02".to_string(),
            "2024-01-03".to_string(),
        ],
        channels: vec![ChannelSeries {
            channel_title: "X".to_string(),
            values: vec![10, 30, 20],
        }],
    };
    let colors = assign_colors(&["X"]);

    let buffer = draw_on_canvas(Layer::Daily(&series), &colors, 0.0..2.0, 0.0..40.0);
    assert!(pixels_of(&buffer, (0xD9, 0x5B, 0x5B)) > 0);
}

#[test]
fn test_correlation_points_drawn() {
    let parsed = parse_videos(DATASET).unwrap();
    let correlations = views_likes_correlation(&parsed.records);
    let colors = assign_colors(&["X", "Y"]);

    let buffer = draw_on_canvas(Layer::Scatter(&correlations), &colors, -0.05..1.05, -0.05..1.05);
    assert!(pixels_of(&buffer, (0xD9, 0x5B, 0x5B)) > 0);
    assert!(pixels_of(&buffer, (0x77, 0x8D, 0x8D)) > 0);
}

#[test]
#[ignore = "needs system fonts"]
fn test_render_all() {
    let (dashboard, temp_dir) = setup_dashboard();
    let out_dir = temp_dir.path().join("charts");

    let written = render_all(&dashboard, &out_dir).unwrap();
    assert_eq!(written.len(), 4);
    for path in &written {
        assert_non_empty(path);
    }
}

#[test]
#[ignore = "needs system fonts"]
fn test_render_scatter() {
    let (dashboard, temp_dir) = setup_dashboard();
    let path = temp_dir.path().join("scatter.png");
    let correlations = views_likes_correlation(&dashboard.filtered_videos());

    render_views_likes(
        &path,
        &correlations,
        &dashboard.channel_colors,
        &ChartOptions::from_config(&dashboard.config),
    )
    .unwrap();
    assert_non_empty(&path);
}

#[test]
#[ignore = "needs system fonts"]
fn test_empty_plot() {
    let (mut dashboard, temp_dir) = setup_dashboard();
    dashboard.videos.clear();

    // Should handle empty data gracefully
    let written = render_all(&dashboard, temp_dir.path()).unwrap();
    assert_eq!(written.len(), 4);
}

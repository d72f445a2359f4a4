use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use std::collections::BTreeSet;
use std::fmt::Display;
use std::path::{Path, PathBuf};

use super::styles::{parse_hex_color, ChartStyle, ChartTheme};
use crate::analysis::trends::{month_label, ChannelCorrelation, MonthlyTrend};
use crate::app::Dashboard;
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::types::{ChannelStats, DailySeries};
use crate::utils::aggregation::downsample_daily;
use crate::utils::colors::{ChannelColorMap, FALLBACK_COLOR};
use crate::utils::format::{format_day_label, format_number};

pub(crate) type Chart<'a, 'b> = ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

const FONT: &str = "sans-serif";

fn plot_err<E: Display>(e: E) -> DashboardError {
    DashboardError::Plot(e.to_string())
}

/// Everything a chart needs besides its data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartOptions {
    pub theme: ChartTheme,
    pub style: ChartStyle,
    pub size: (u32, u32),
    /// Daily series are merged down to this many points
    pub max_points: usize,
}

impl ChartOptions {
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            theme: ChartTheme::for_mode(config.dark_mode),
            style: ChartStyle::default(),
            size: (config.chart_width, config.chart_height),
            max_points: config.max_plot_points,
        }
    }
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self::from_config(&DashboardConfig::default())
    }
}

/// Render every dashboard chart into `out_dir` and return the written files.
pub fn render_all(dashboard: &Dashboard, out_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)?;
    let options = ChartOptions::from_config(&dashboard.config);
    let colors = &dashboard.channel_colors;

    let channel_totals = out_dir.join("channel_totals.png");
    render_channel_totals(&channel_totals, &dashboard.channel_stats(), colors, &options)?;

    let views_over_time = out_dir.join("views_over_time.png");
    render_daily_views(&views_over_time, &dashboard.daily_views(), colors, &options)?;

    let monthly = out_dir.join("monthly_trends.png");
    render_monthly_trends(&monthly, &dashboard.monthly_trends(), colors, &options)?;

    let scatter = out_dir.join("views_vs_likes.png");
    render_views_likes(&scatter, &dashboard.views_likes_correlation(), colors, &options)?;

    let written = vec![channel_totals, views_over_time, monthly, scatter];
    log::info!("Rendered {} charts into {}", written.len(), out_dir.display());
    Ok(written)
}

/// [`render_all`] on the blocking pool.
pub async fn render_all_async(dashboard: Dashboard, out_dir: PathBuf) -> Result<Vec<PathBuf>> {
    tokio::task::spawn_blocking(move || render_all(&dashboard, &out_dir))
        .await
        .map_err(plot_err)?
}

/// Bar per channel with its total views.
pub fn render_channel_totals(
    path: &Path,
    stats: &[ChannelStats],
    colors: &ChannelColorMap,
    options: &ChartOptions,
) -> Result<()> {
    let root = BitMapBackend::new(path, options.size).into_drawing_area();
    root.fill(&options.theme.background_color).map_err(plot_err)?;

    let values: Vec<f64> = stats.iter().map(|s| s.total_views as f64).collect();
    let y_max = padded_max(&values);
    let labels: Vec<String> = stats.iter().map(|s| s.channel_title.clone()).collect();

    let mut chart = build_chart(&root, "Total Views by Channel", options, labels.len().max(1) as f64, 0.0..y_max)?;
    let x_formatter = |x: &f64| bar_label(&labels, *x);
    draw_mesh(&mut chart, options, "Channel", "Total Views", &x_formatter, labels.len())?;

    draw_channel_bars(&mut chart, stats, colors)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Bars at `[i + 0.1, i + 0.9]` for the i-th channel.
pub(crate) fn draw_channel_bars<'a, 'b: 'a>(
    chart: &mut Chart<'a, 'b>,
    stats: &[ChannelStats],
    colors: &ChannelColorMap,
) -> Result<()> {
    chart
        .draw_series(stats.iter().enumerate().map(|(i, stat)| {
            let color = series_color(colors, &stat.channel_title);
            Rectangle::new(
                [(i as f64 + 0.1, 0.0), (i as f64 + 0.9, stat.total_views as f64)],
                color.filled(),
            )
        }))
        .map_err(plot_err)?;
    Ok(())
}

/// One line per channel over the shared daily axis.
pub fn render_daily_views(
    path: &Path,
    series: &DailySeries,
    colors: &ChannelColorMap,
    options: &ChartOptions,
) -> Result<()> {
    let series = downsample_daily(series, options.max_points);

    let root = BitMapBackend::new(path, options.size).into_drawing_area();
    root.fill(&options.theme.background_color).map_err(plot_err)?;

    let values: Vec<f64> = series
        .channels
        .iter()
        .flat_map(|c| c.values.iter().map(|&v| v as f64))
        .collect();
    let (y_min, y_max) = calculate_adaptive_range(&values);
    let labels: Vec<String> = series.dates.iter().map(|d| format_day_label(d)).collect();
    let x_max = (labels.len().max(2) - 1) as f64;

    let mut chart = build_chart(&root, "Video Views Over Time by Channel", options, x_max, y_min..y_max)?;
    let x_formatter = |x: &f64| index_label(&labels, *x);
    draw_mesh(&mut chart, options, "Date", "Views", &x_formatter, labels.len())?;
    draw_daily_lines(&mut chart, &series, colors, options)?;

    draw_legend(&mut chart, options)?;
    root.present().map_err(plot_err)?;
    Ok(())
}

/// A line with point markers per channel, x being the index on the date axis.
pub(crate) fn draw_daily_lines<'a, 'b: 'a>(
    chart: &mut Chart<'a, 'b>,
    series: &DailySeries,
    colors: &ChannelColorMap,
    options: &ChartOptions,
) -> Result<()> {
    for channel in &series.channels {
        let color = series_color(colors, &channel.channel_title);
        let points: Vec<(f64, f64)> = channel
            .values
            .iter()
            .enumerate()
            .map(|(i, &v)| (i as f64, v as f64))
            .collect();

        chart
            .draw_series(LineSeries::new(
                points.clone(),
                color.stroke_width(options.style.line_width),
            ))
            .map_err(plot_err)?
            .label(channel.channel_title.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

        chart
            .draw_series(
                points
                    .into_iter()
                    .map(|p| Circle::new(p, options.style.point_size - 1, color.filled())),
            )
            .map_err(plot_err)?;
    }
    Ok(())
}

/// Monthly views per channel with the fitted trend as a faded line.
pub fn render_monthly_trends(
    path: &Path,
    trends: &[MonthlyTrend],
    colors: &ChannelColorMap,
    options: &ChartOptions,
) -> Result<()> {
    let axis = month_axis(trends);
    let labels: Vec<String> = axis.iter().map(|m| month_label(m)).collect();
    let position = |month: &str| axis.iter().position(|m| m == month).unwrap_or(0) as f64;

    let root = BitMapBackend::new(path, options.size).into_drawing_area();
    root.fill(&options.theme.background_color).map_err(plot_err)?;

    let values: Vec<f64> = trends
        .iter()
        .flat_map(|t| t.views.iter().chain(t.fitted.iter()).copied())
        .collect();
    let y_max = padded_max(&values);
    let y_min = values.iter().copied().fold(0.0, f64::min);
    let x_max = (labels.len().max(2) - 1) as f64;

    let mut chart = build_chart(&root, "Monthly Views with Trend", options, x_max, y_min..y_max)?;
    let x_formatter = |x: &f64| index_label(&labels, *x);
    draw_mesh(&mut chart, options, "Month", "Views", &x_formatter, labels.len())?;

    for trend in trends {
        let color = series_color(colors, &trend.channel_title);
        let xs: Vec<f64> = trend.months.iter().map(|m| position(m.as_str())).collect();

        chart
            .draw_series(LineSeries::new(
                xs.iter().copied().zip(trend.views.iter().copied()),
                color.stroke_width(options.style.line_width),
            ))
            .map_err(plot_err)?
            .label(format!(
                "{} (R² = {:.2}, {})",
                trend.channel_title, trend.regression.r_squared, trend.trend
            ))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

        chart
            .draw_series(LineSeries::new(
                xs.iter().copied().zip(trend.fitted.iter().copied()),
                color.mix(0.5).stroke_width(1),
            ))
            .map_err(plot_err)?;
    }

    draw_legend(&mut chart, options)?;
    root.present().map_err(plot_err)?;
    Ok(())
}

/// Normalised views against normalised likes with a regression line per channel.
pub fn render_views_likes(
    path: &Path,
    correlations: &[ChannelCorrelation],
    colors: &ChannelColorMap,
    options: &ChartOptions,
) -> Result<()> {
    let root = BitMapBackend::new(path, options.size).into_drawing_area();
    root.fill(&options.theme.background_color).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Views vs Likes (normalised)", caption_font(options))
        .margin(options.style.margin)
        .set_all_label_area_size(options.style.label_area_size)
        .build_cartesian_2d(-0.05f64..1.05f64, -0.05f64..1.05f64)
        .map_err(plot_err)?;
    let fraction = |v: &f64| format!("{:.1}", v);
    draw_mesh(&mut chart, options, "Views", "Likes", &fraction, 11)?;
    draw_correlations(&mut chart, correlations, colors, options)?;

    draw_legend(&mut chart, options)?;
    root.present().map_err(plot_err)?;
    Ok(())
}

/// Scatter points and the fitted line of every channel.
pub(crate) fn draw_correlations<'a, 'b: 'a>(
    chart: &mut Chart<'a, 'b>,
    correlations: &[ChannelCorrelation],
    colors: &ChannelColorMap,
    options: &ChartOptions,
) -> Result<()> {
    for correlation in correlations {
        let color = series_color(colors, &correlation.channel_title);

        chart
            .draw_series(
                correlation
                    .points
                    .iter()
                    .map(|p| Circle::new((p.x, p.y), options.style.point_size, color.filled())),
            )
            .map_err(plot_err)?
            .label(format!(
                "{} (R² = {:.2}, {})",
                correlation.channel_title, correlation.regression.r_squared, correlation.strength
            ))
            .legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));

        if let Some([start, end]) = correlation.regression.regression_line {
            chart
                .draw_series(LineSeries::new(
                    vec![(start.x, start.y), (end.x, end.y)],
                    color.stroke_width(options.style.line_width),
                ))
                .map_err(plot_err)?;
        }
    }
    Ok(())
}

fn caption_font(options: &ChartOptions) -> TextStyle<'static> {
    (FONT, options.style.caption_size as f64)
        .into_font()
        .color(&options.theme.text_color)
}

fn build_chart<'a, 'b>(
    root: &'a DrawingArea<BitMapBackend<'b>, plotters::coord::Shift>,
    caption: &str,
    options: &ChartOptions,
    x_max: f64,
    y_range: std::ops::Range<f64>,
) -> Result<Chart<'a, 'b>> {
    ChartBuilder::on(root)
        .caption(caption, caption_font(options))
        .margin(options.style.margin)
        .set_all_label_area_size(options.style.label_area_size)
        .build_cartesian_2d(0f64..x_max, y_range)
        .map_err(plot_err)
}

fn draw_mesh<'a, 'b: 'a>(
    chart: &mut Chart<'a, 'b>,
    options: &ChartOptions,
    x_desc: &str,
    y_desc: &str,
    x_formatter: &dyn Fn(&f64) -> String,
    x_label_count: usize,
) -> Result<()> {
    let theme = &options.theme;
    let font_size = options.style.font_size as f64;

    chart
        .configure_mesh()
        .light_line_style(&TRANSPARENT)
        .bold_line_style(&theme.grid_color)
        .axis_style(&theme.axis_color)
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_labels(x_label_count.clamp(2, 12))
        .label_style((FONT, font_size).into_font().color(&theme.text_color))
        .axis_desc_style((FONT, font_size).into_font().color(&theme.text_color))
        .x_label_formatter(x_formatter)
        .y_label_formatter(&|y: &f64| format_number(*y))
        .draw()
        .map_err(plot_err)
}

fn draw_legend<'a, 'b: 'a>(chart: &mut Chart<'a, 'b>, options: &ChartOptions) -> Result<()> {
    chart
        .configure_series_labels()
        .background_style(&options.theme.background_color.mix(0.8))
        .border_style(&options.theme.axis_color)
        .label_font(
            (FONT, options.style.font_size as f64)
                .into_font()
                .color(&options.theme.text_color),
        )
        .position(SeriesLabelPosition::UpperLeft)
        .draw()
        .map_err(plot_err)
}

fn series_color(colors: &ChannelColorMap, channel: &str) -> RGBColor {
    parse_hex_color(colors.color_or_default(channel))
        .or_else(|| parse_hex_color(FALLBACK_COLOR))
        .unwrap_or(BLUE)
}

/// Label for an integer tick on an index axis; blank between indices.
fn index_label(labels: &[String], x: f64) -> String {
    if x < 0.0 || x.fract().abs() > 1e-6 {
        return String::new();
    }
    labels.get(x as usize).cloned().unwrap_or_default()
}

/// Bars occupy `[i, i + 1)`, so any tick inside a bar names it.
fn bar_label(labels: &[String], x: f64) -> String {
    if x < 0.0 {
        return String::new();
    }
    labels.get(x.floor() as usize).cloned().unwrap_or_default()
}

/// Sorted union of the months present in any trend.
pub fn month_axis(trends: &[MonthlyTrend]) -> Vec<String> {
    trends
        .iter()
        .flat_map(|t| t.months.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Upper bound with 10% headroom; never zero so the axis stays valid.
fn padded_max(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(0.0, f64::max);
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

/// Y range that keeps a single viral outlier from flattening everything else.
pub fn calculate_adaptive_range(values: &[f64]) -> (f64, f64) {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    if sorted.is_empty() {
        return (0.0, 1.0);
    }

    // Values beyond the 95th percentile count as outliers
    let p95_idx = ((sorted.len() as f64 * 0.95).ceil() as usize)
        .saturating_sub(1)
        .min(sorted.len() - 1);
    let normal_max = sorted[p95_idx];
    let absolute_max = sorted[sorted.len() - 1];

    let display_max = if absolute_max > normal_max * 2.0 {
        normal_max * 1.2
    } else {
        absolute_max * 1.1
    };

    if display_max > 0.0 {
        (0.0, display_max)
    } else {
        (0.0, 1.0)
    }
}

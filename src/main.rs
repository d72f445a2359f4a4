//! YouTube channel statistics tool
//!
//! Loads a video CSV, applies the requested selection and prints or renders
//! the dashboard views.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::{info, warn};
use serde::Serialize;
use std::path::PathBuf;
use tokio::runtime::Runtime;

use ytstats::analysis::ranking::truncate_title;
use ytstats::parser::filter_trending;
use ytstats::plotting::render_all_async;
use ytstats::source::{load_trending_async, load_videos_async};
use ytstats::utils::format::{format_duration, format_number};
use ytstats::{Dashboard, DashboardConfig, VideoKind};

const TITLE_WIDTH: usize = 30;

#[derive(Parser)]
#[command(name = "ytstats")]
#[command(about = "Channel statistics from a YouTube video export")]
#[command(version)]
struct Cli {
    /// JSON configuration file
    #[arg(long, env = "YTSTATS_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Video CSV, overrides the configured path
    #[arg(long, global = true)]
    videos: Option<PathBuf>,

    /// Channel to include; repeat for several (default: first channels in the file)
    #[arg(long = "channel", global = true)]
    channels: Vec<String>,

    /// First publication date to include (YYYY-MM-DD)
    #[arg(long, global = true)]
    from: Option<NaiveDate>,

    /// Last publication date to include (YYYY-MM-DD)
    #[arg(long, global = true)]
    to: Option<NaiveDate>,

    /// Ignore the default date window
    #[arg(long, global = true, conflicts_with_all = ["from", "to"])]
    all_time: bool,

    /// Leave shorts out of every view
    #[arg(long, global = true)]
    exclude_shorts: bool,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Channel totals, shorts comparison and top videos
    Summary {
        /// Number of top videos to list
        #[arg(long, default_value = "5")]
        top: usize,
    },
    /// Monthly views per channel with a linear trend
    Trends,
    /// Views against likes per channel
    Correlation,
    /// Leading trending video per country
    Trending {
        /// Trending GeoJSON, overrides the configured path
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Render PNG charts
    Plot {
        /// Output directory
        #[arg(short, long, default_value = "charts")]
        out: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let rt = Runtime::new().context("failed to start the runtime")?;
    rt.block_on(run(cli))
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => DashboardConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    if let Some(videos) = &cli.videos {
        config.videos_path = videos.clone();
    }

    if let Command::Trending { file } = &cli.command {
        let path = file.clone().unwrap_or_else(|| config.trending_path.clone());
        return show_trending(path, cli.exclude_shorts, cli.json).await;
    }

    let parsed = load_videos_async(config.videos_path.clone())
        .await
        .with_context(|| format!("failed to load {}", config.videos_path.display()))?;
    for issue in &parsed.issues {
        warn!("{}", issue);
    }

    let mut dashboard = Dashboard::new(parsed, config);
    apply_selection(&mut dashboard, &cli)?;

    match cli.command {
        Command::Summary { top } => show_summary(&dashboard, top, cli.json),
        Command::Trends => show_trends(&dashboard, cli.json),
        Command::Correlation => show_correlation(&dashboard, cli.json),
        Command::Plot { out } => {
            let written = render_all_async(dashboard, out).await?;
            for path in written {
                println!("{}", path.display());
            }
            Ok(())
        }
        Command::Trending { .. } => Ok(()),
    }
}

fn apply_selection(dashboard: &mut Dashboard, cli: &Cli) -> Result<()> {
    let mut filter = dashboard.filter.clone();

    if !cli.channels.is_empty() {
        for channel in &cli.channels {
            if !dashboard.available_channels.contains(channel) {
                warn!("Channel {:?} does not appear in the data", channel);
            }
        }
        filter.channels = cli.channels.clone();
    }

    if cli.all_time {
        filter.date_range = None;
    } else if cli.from.is_some() || cli.to.is_some() {
        let start = cli.from.unwrap_or(NaiveDate::MIN);
        let end = cli.to.unwrap_or(NaiveDate::MAX);
        if start > end {
            bail!("--from {} is after --to {}", start, end);
        }
        filter.date_range = Some((start, end));
    }

    filter.exclude_shorts = cli.exclude_shorts;
    info!(
        "Selected {} channels, date range {:?}",
        filter.channels.len(),
        filter.date_range
    );
    dashboard.set_filter(filter);
    Ok(())
}

fn show_summary(dashboard: &Dashboard, top: usize, json: bool) -> Result<()> {
    let report = dashboard.report();
    if json {
        return print_json(&report);
    }

    println!(
        "{} of {} videos selected ({} rows with issues)",
        report.filtered_count, report.video_count, report.issue_count
    );
    println!();
    println!("{:<30} {:>8} {:>12} {:>12}", "Channel", "Videos", "Views", "Avg views");
    for stats in &report.channels {
        println!(
            "{:<30} {:>8} {:>12} {:>12}",
            truncate_title(&stats.channel_title, TITLE_WIDTH),
            stats.total_videos,
            format_number(stats.total_views as f64),
            format_number(stats.avg_views)
        );
    }

    println!();
    for (label, summary) in [
        (VideoKind::Short.label(), &report.shorts.shorts),
        (VideoKind::Regular.label(), &report.shorts.regular),
    ] {
        println!(
            "{:<10} {:>6} videos, {:>8} views, avg {:>8}, median {:>8}",
            label,
            summary.count,
            format_number(summary.total_views as f64),
            format_number(summary.avg_views),
            format_number(summary.median_views)
        );
    }

    println!(
        "Shorts {:.1}% / regular {:.1}% of selected videos",
        report.shorts.shorts_share, report.shorts.regular_share
    );
    for row in &report.channel_comparison {
        let diff = row
            .diff_percentage
            .map_or_else(|| "N/A".to_string(), |d| format!("{:+.1}%", d));
        println!(
            "  {:<30} shorts {:>5} avg {:>8}  regular {:>5} avg {:>8}  {:>8}",
            truncate_title(&row.channel_title, TITLE_WIDTH),
            row.shorts.count,
            format_number(row.shorts.avg_views),
            row.regular.count,
            format_number(row.regular.avg_views),
            diff
        );
    }

    let videos = dashboard.top_videos(top, None);
    if !videos.is_empty() {
        println!();
        println!("Top videos");
        for video in videos {
            println!(
                "  {:<33} {:<20} {:>8} {:>8}",
                truncate_title(&video.title, TITLE_WIDTH),
                truncate_title(&video.channel_title, 17),
                format_number(video.views as f64),
                format_duration(video.duration_seconds)
            );
        }
    }
    Ok(())
}

fn show_trends(dashboard: &Dashboard, json: bool) -> Result<()> {
    let trends = dashboard.monthly_trends();
    if json {
        return print_json(&trends);
    }

    for trend in trends {
        println!(
            "{}: {} (R² = {:.2}, slope {:.1}/month)",
            trend.channel_title, trend.trend, trend.regression.r_squared, trend.regression.slope
        );
        for (label, views) in trend.labels.iter().zip(&trend.views) {
            println!("  {:<10} {:>10}", label, format_number(*views));
        }
    }
    Ok(())
}

fn show_correlation(dashboard: &Dashboard, json: bool) -> Result<()> {
    let correlations = dashboard.views_likes_correlation();
    if json {
        return print_json(&correlations);
    }

    for correlation in correlations {
        println!(
            "{}: {} (R² = {:.2}, {} videos)",
            correlation.channel_title,
            correlation.strength,
            correlation.regression.r_squared,
            correlation.points.len()
        );
    }
    Ok(())
}

async fn show_trending(path: PathBuf, exclude_shorts: bool, json: bool) -> Result<()> {
    let countries = load_trending_async(path.clone())
        .await
        .with_context(|| format!("failed to load {}", path.display()))?;
    let countries = filter_trending(&countries, exclude_shorts);
    if json {
        return print_json(&countries);
    }

    for country in &countries {
        let Some(lead) = country.videos.first() else {
            continue;
        };
        println!(
            "{} {:<20} {:>3} videos  {:<33} {:>8}",
            country.country_code,
            country.country_name,
            country.videos.len(),
            truncate_title(&lead.title, TITLE_WIDTH),
            format_number(lead.views as f64)
        );
    }
    Ok(())
}

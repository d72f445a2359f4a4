//! # YouTube Channel Statistics Library
//!
//! `ytstats` turns a CSV export of YouTube videos into the numbers behind a
//! channel dashboard: per-channel totals, shorts versus regular videos,
//! monthly trends with a least-squares fit, a views-versus-likes correlation
//! and a zero-filled daily view series.
//!
//! ## Features
//!
//! - Quote-aware CSV parsing that reports bad rows instead of failing
//! - Aggregation by channel, month and day
//! - Simple linear regression with R² and readable trend labels
//! - Min-max normalization and median
//! - Stable per-channel colors
//! - Trending-by-country GeoJSON loading
//! - PNG charts rendered with plotters
//!
//! ## Example
//!
//! ```no_run
//! use ytstats::{load_videos, Dashboard, DashboardConfig};
//!
//! let parsed = load_videos("data/videos.csv")?;
//! let dashboard = Dashboard::new(parsed, DashboardConfig::default());
//!
//! for stats in dashboard.channel_stats() {
//!     println!("{}: {} views", stats.channel_title, stats.total_views);
//! }
//! # Ok::<(), ytstats::DashboardError>(())
//! ```

pub mod analysis;
pub mod app;
pub mod config;
pub mod error;
pub mod parser;
pub mod plotting;
pub mod source;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use app::{Dashboard, DashboardReport, VideoFilter};
pub use config::DashboardConfig;
pub use error::{DashboardError, Result};
pub use parser::{parse_trending, parse_videos, ParsedVideos, TrendingCountry};
pub use source::{load_trending, load_videos};
pub use types::{ChannelStats, DailySeries, VideoKind, VideoRecord};

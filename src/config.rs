//! Dashboard configuration.
//!
//! Every field has a default, so a config file only needs the keys it wants
//! to change.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{DashboardError, Result};
use crate::utils::colors::DEFAULT_PALETTE;

/// Longest accepted default window, roughly a century.
pub const MAX_WINDOW_DAYS: i64 = 36_500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// CSV file with one row per video
    pub videos_path: PathBuf,
    /// GeoJSON file with trending videos per country
    pub trending_path: PathBuf,
    /// Channel colors, assigned cyclically in first-seen order
    pub palette: Vec<String>,
    /// How many channels are selected when no explicit selection is given
    pub max_selected_channels: usize,
    /// Length of the default date window, ending today
    pub default_window_days: i64,
    pub dark_mode: bool,
    pub chart_width: u32,
    pub chart_height: u32,
    /// Daily series longer than this are merged before plotting
    pub max_plot_points: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            videos_path: PathBuf::from("data/videos.csv"),
            trending_path: PathBuf::from("data/trending_videos.geojson"),
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            max_selected_channels: 6,
            default_window_days: 365,
            dark_mode: false,
            chart_width: 1024,
            chart_height: 640,
            max_plot_points: 500,
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        log::info!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.palette.is_empty() {
            return Err(DashboardError::Config("palette must not be empty".to_string()));
        }
        if !(0..=MAX_WINDOW_DAYS).contains(&self.default_window_days) {
            return Err(DashboardError::Config(format!(
                "default_window_days must be between 0 and {}",
                MAX_WINDOW_DAYS
            )));
        }
        if self.chart_width == 0 || self.chart_height == 0 {
            return Err(DashboardError::Config(
                "chart dimensions must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

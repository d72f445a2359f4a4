//! File-backed video and trending sources.
//!
//! Each call reads the whole file and parses it from scratch; nothing is
//! cached between calls.

use log::info;
use std::path::{Path, PathBuf};
use tokio::task::spawn_blocking;

use crate::error::Result;
use crate::parser::{parse_trending, parse_videos, ParsedVideos, TrendingCountry};

/// Read and parse the video CSV at `path`.
pub fn load_videos(path: impl AsRef<Path>) -> Result<ParsedVideos> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let parsed = parse_videos(&content)?;
    info!("Loaded {} videos from {}", parsed.records.len(), path.display());
    Ok(parsed)
}

/// Read and parse the trending GeoJSON at `path`.
pub fn load_trending(path: impl AsRef<Path>) -> Result<Vec<TrendingCountry>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let countries = parse_trending(&content)?;
    info!(
        "Loaded trending data for {} countries from {}",
        countries.len(),
        path.display()
    );
    Ok(countries)
}

/// [`load_videos`] on the blocking pool.
pub async fn load_videos_async(path: PathBuf) -> Result<ParsedVideos> {
    spawn_blocking(move || load_videos(path))
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?
}

/// [`load_trending`] on the blocking pool.
pub async fn load_trending_async(path: PathBuf) -> Result<Vec<TrendingCountry>> {
    spawn_blocking(move || load_trending(path))
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?
}

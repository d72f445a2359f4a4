//! Trending-by-country data stored as a GeoJSON `FeatureCollection`.
//!
//! Each feature is a point for one country whose properties embed the list of
//! trending videos. Depending on the exporter the list is either a JSON array
//! or a JSON-encoded string; [`coerce_videos`] accepts both.

use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;

use crate::error::{DashboardError, Result};
use crate::parser::csv::coerce_count;
use crate::types::VideoRecord;

/// One country's trending list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendingCountry {
    pub country_code: String,
    pub country_name: String,
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
    pub videos: Vec<VideoRecord>,
    pub last_updated: String,
}

impl TrendingCountry {
    /// Views of the top trending video, used as the map weight.
    pub fn lead_views(&self) -> u64 {
        self.videos.first().map(|v| v.views).unwrap_or(0)
    }

    pub fn total_views(&self) -> u64 {
        self.videos
            .iter()
            .fold(0u64, |acc, v| acc.saturating_add(v.views))
    }
}

/// Parse a GeoJSON document into per-country trending lists.
///
/// The document must be a `FeatureCollection` with a `features` array.
/// Features without properties are skipped.
pub fn parse_trending(content: &str) -> Result<Vec<TrendingCountry>> {
    let root: Value = serde_json::from_str(content)?;

    if root.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
        return Err(DashboardError::InvalidGeoJson(
            "expected a FeatureCollection".to_string(),
        ));
    }
    let features = root
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| DashboardError::InvalidGeoJson("features is not an array".to_string()))?;

    let countries: Vec<TrendingCountry> = features.iter().filter_map(parse_feature).collect();
    debug!(
        "Parsed {} of {} trending features",
        countries.len(),
        features.len()
    );
    Ok(countries)
}

fn parse_feature(feature: &Value) -> Option<TrendingCountry> {
    let properties = feature.get("properties")?.as_object()?;
    let text = |key: &str| {
        properties
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    let coordinates = feature
        .get("geometry")
        .and_then(|g| g.get("coordinates"))
        .and_then(Value::as_array)
        .map(|c| {
            [
                c.first().and_then(Value::as_f64).unwrap_or(0.0),
                c.get(1).and_then(Value::as_f64).unwrap_or(0.0),
            ]
        })
        .unwrap_or([0.0, 0.0]);

    Some(TrendingCountry {
        country_code: text("country_code"),
        country_name: text("country_name"),
        coordinates,
        videos: properties.get("videos").map(coerce_videos).unwrap_or_default(),
        last_updated: text("last_updated"),
    })
}

/// Turn an embedded video list into records.
///
/// Accepts an array of objects or a string holding one JSON-encoded array.
/// Anything else, including a string that fails to parse, yields no videos.
pub fn coerce_videos(value: &Value) -> Vec<VideoRecord> {
    match value {
        Value::Array(items) => items.iter().filter_map(coerce_video).collect(),
        Value::String(encoded) => match serde_json::from_str::<Value>(encoded) {
            Ok(Value::Array(items)) => items.iter().filter_map(coerce_video).collect(),
            Ok(_) => {
                warn!("Embedded videos string is not a JSON array");
                Vec::new()
            }
            Err(e) => {
                warn!("Failed to parse embedded videos: {}", e);
                Vec::new()
            }
        },
        _ => Vec::new(),
    }
}

/// Build a record from one embedded video object.
///
/// Both the trending export names (`title`, `view_count`, `like_count`) and
/// the CSV names (`video_title`, `views`, `likes`) are understood. Counts may
/// be numbers or numeric strings.
pub fn coerce_video(value: &Value) -> Option<VideoRecord> {
    let object = value.as_object()?;
    let text = |keys: &[&str]| {
        keys.iter()
            .find_map(|k| object.get(*k))
            .map(|v| match v {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            })
            .unwrap_or_default()
    };
    let count = |keys: &[&str]| {
        keys.iter()
            .find_map(|k| object.get(*k))
            .map(|v| match v {
                Value::Number(n) => n
                    .as_u64()
                    .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.trunc() as u64))
                    .unwrap_or(0),
                Value::String(s) => coerce_count(s).unwrap_or(0),
                _ => 0,
            })
            .unwrap_or(0)
    };

    let thumbnail = text(&["thumbnail_url"]);
    Some(VideoRecord {
        video_id: text(&["video_id"]),
        title: text(&["title", "video_title"]),
        channel_title: text(&["channel_title"]),
        published_at: text(&["published_at"]),
        views: count(&["view_count", "views"]),
        likes: count(&["like_count", "likes"]),
        duration_seconds: count(&["duration_seconds"]),
        thumbnail_url: if thumbnail.is_empty() { None } else { Some(thumbnail) },
    })
}

/// Apply the map's shorts toggle.
///
/// When `exclude_shorts` is set only regular videos are kept. Countries left
/// without videos are always dropped.
pub fn filter_trending(countries: &[TrendingCountry], exclude_shorts: bool) -> Vec<TrendingCountry> {
    countries
        .iter()
        .map(|country| {
            let videos = country
                .videos
                .iter()
                .filter(|v| !exclude_shorts || !v.is_short())
                .cloned()
                .collect();
            TrendingCountry {
                videos,
                ..country.clone()
            }
        })
        .filter(|country| !country.videos.is_empty())
        .collect()
}

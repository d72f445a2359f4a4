use thiserror::Error;

/// Errors surfaced by the loaders, configuration and chart rendering.
///
/// The statistics themselves never fail; see the `analysis` module.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid GeoJSON: {0}")]
    InvalidGeoJson(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Plot error: {0}")]
    Plot(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;

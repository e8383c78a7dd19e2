//! Coordinate, camera and annotation engine for an interactive candlestick
//! chart. Rendering is left to the host through [`chart::Frame`].

pub mod chart;
pub mod logger;

pub use chart::Chart;
pub use data;

use data::ChartConfig;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Annotations(#[from] data::tool::Error),
    #[error("invalid chart config: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Log(#[from] data::log::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Parses a [`ChartConfig`], filling in defaults and repairing invalid bounds.
pub fn config_from_json(json: &str) -> Result<ChartConfig, Error> {
    Ok(ChartConfig::from_json(json)?)
}

pub mod chart;
pub mod color;
pub mod config;
pub mod log;
pub mod tool;
pub mod util;

pub use chart::{ChartPoint, Kline, Timeframe};
pub use color::{Color, LineStyle};
pub use config::ChartConfig;
pub use tool::{Tool, ToolId, ToolKind};

use std::path::PathBuf;

const APP_DIR: &str = "chartsurface";
const DATA_PATH_ENV: &str = "CHARTSURFACE_DATA_PATH";

/// Resolves a path inside the per-user data directory.
///
/// `CHARTSURFACE_DATA_PATH` overrides the platform default.
pub fn data_path(path_name: Option<&str>) -> PathBuf {
    let base = if let Ok(path) = std::env::var(DATA_PATH_ENV) {
        PathBuf::from(path)
    } else {
        let data_dir = dirs_next::data_dir().unwrap_or_else(|| PathBuf::from("."));
        data_dir.join(APP_DIR)
    };

    if let Some(path_name) = path_name {
        base.join(path_name)
    } else {
        base
    }
}

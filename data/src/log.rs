use std::path::PathBuf;
use std::{fs, io};

use crate::data_path;

const LOG_FILE: &str = "chartsurface-current.log";
const PREVIOUS_LOG_FILE: &str = "chartsurface-previous.log";

pub fn path() -> Result<PathBuf, Error> {
    let full_path = data_path(Some(LOG_FILE));

    let parent = full_path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Invalid log file path"))?;

    if !parent.exists() {
        fs::create_dir_all(parent)?;
    }

    Ok(full_path)
}

/// Location the current log is moved to on startup.
pub fn previous_path() -> Result<PathBuf, Error> {
    let current = path()?;
    let dir = current
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Invalid log file path"))?;

    Ok(dir.join(PREVIOUS_LOG_FILE))
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    SetLog(#[from] log::SetLoggerError),
    #[error(transparent)]
    ParseLevel(#[from] log::ParseLevelError),
}

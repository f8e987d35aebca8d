//! Path utilities for the app data, models, and logs directories.

use std::path::PathBuf;

/// Get the app data directory (e.g. ~/.local/share/uniasr on Linux).
pub fn app_data_dir() -> Result<PathBuf, String> {
    dirs::data_dir()
        .map(|d| d.join("uniasr"))
        .ok_or_else(|| "No platform data directory available".to_string())
}

/// Get the models directory, creating it if necessary.
pub fn models_dir() -> Result<PathBuf, String> {
    let dir = app_data_dir()?.join("models");
    std::fs::create_dir_all(&dir).map_err(|e| e.to_string())?;
    Ok(dir)
}

/// Get the log file path, creating the logs directory if necessary.
pub fn log_file_path() -> Result<PathBuf, String> {
    let dir = app_data_dir()?.join("logs");
    std::fs::create_dir_all(&dir).map_err(|e| e.to_string())?;
    Ok(dir.join("uniasr.log"))
}

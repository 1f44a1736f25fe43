// src/settings/io.rs
//! Reading and writing `WidgetSettings` as JSON on disk.

use bevy::log::{debug, info, warn};
use directories_next::ProjectDirs;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use super::WidgetSettings;

const CONFIG_FILE: &str = "widget_settings.json";

/// Per-user location of the settings file. Nothing is created on disk.
pub fn default_settings_path() -> io::Result<PathBuf> {
    ProjectDirs::from("com", "DatagridSync", "DatagridSyncWidget")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
        .ok_or_else(|| {
            io::Error::new(
                ErrorKind::NotFound,
                "no home directory to place widget settings in",
            )
        })
}

/// `path` when given, otherwise the per-user location.
pub fn resolve_settings_path(path: Option<&Path>) -> io::Result<PathBuf> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => default_settings_path(),
    }
}

/// Missing file yields the defaults; unknown fields are ignored and absent ones defaulted.
pub fn load_settings_from_file(path: &Path) -> io::Result<WidgetSettings> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("Settings: {:?} does not exist, using defaults.", path);
            return Ok(WidgetSettings::default());
        }
        Err(e) => return Err(e),
    };
    serde_json::from_str(&text).map_err(|e| {
        warn!("Settings: {:?} is not valid settings JSON: {}", path, e);
        io::Error::new(
            ErrorKind::InvalidData,
            format!("invalid settings file '{}': {}", path.display(), e),
        )
    })
}

/// Writes pretty JSON, creating the parent directory when needed.
pub fn save_settings_to_file(settings: &WidgetSettings, path: &Path) -> io::Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings).map_err(io::Error::other)?;
    fs::write(path, json)?;
    info!("Settings: written to {:?}", path);
    Ok(())
}

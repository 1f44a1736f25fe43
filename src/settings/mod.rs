pub mod io;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::sheets::permissions::PermissionModel;

/// Shape of the document stored in the host attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum DocumentLayout {
    /// A JSON array of sheets, each carrying id, name, order and edit grant.
    #[default]
    MultiSheet,
    /// A single JSON object holding one sheet's grid and metadata.
    SingleSheet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    pub min_rows: usize,
    pub min_cols: usize,
    pub default_column_width: f64,
    pub default_row_height: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            min_rows: 50,
            min_cols: 26,
            default_column_width: 100.0,
            default_row_height: 23.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AutosaveConfig {
    pub debounce_ms: u64,
    pub saved_display_ms: u64,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 800,
            saved_display_ms: 2000,
        }
    }
}

impl AutosaveConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn saved_display(&self) -> Duration {
        Duration::from_millis(self.saved_display_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetSettings {
    pub grid: GridConfig,
    pub layout: DocumentLayout,
    pub permission_model: PermissionModel,
    pub autosave: AutosaveConfig,
    /// When a sheet has row labels, only that many rows are shown.
    pub row_labels_limit_visible_rows: bool,
    /// Refuse to delete the only remaining sheet.
    pub forbid_last_sheet_delete: bool,
    /// Maximum characters of a raw host value quoted in log lines.
    pub log_preview_chars: usize,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            layout: DocumentLayout::default(),
            permission_model: PermissionModel::default(),
            autosave: AutosaveConfig::default(),
            row_labels_limit_visible_rows: true,
            forbid_last_sheet_delete: true,
            log_preview_chars: 200,
        }
    }
}

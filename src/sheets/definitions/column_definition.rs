// src/sheets/definitions/column_definition.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::column_data_type::ColumnDataType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDefinition {
    /// Stable identity; survives renames and reorders.
    pub key: String,
    pub header: String,
    #[serde(default)]
    pub data_type: ColumnDataType,
    pub width: f64,
    /// Option list or source name for `dropdown` columns.
    #[serde(default)]
    pub dropdown_source: Option<String>,
    /// Display pattern for `date`, `time` and `numeric` columns.
    #[serde(default)]
    pub format_pattern: Option<String>,
    #[serde(default)]
    pub read_only: bool,
}

impl ColumnDefinition {
    pub fn new_basic(key: String, header: String, data_type: ColumnDataType, width: f64) -> Self {
        ColumnDefinition {
            key,
            header,
            data_type,
            width,
            dropdown_source: None,
            format_pattern: None,
            read_only: false,
        }
    }

    /// Applies every field present in `update`; absent fields are left as they are.
    pub fn apply(&mut self, update: &ColumnUpdate) {
        if let Some(header) = &update.header {
            self.header = header.trim().to_string();
        }
        if let Some(data_type) = update.data_type {
            self.data_type = data_type;
        }
        if let Some(width) = update.width {
            self.width = width;
        }
        if let Some(source) = &update.dropdown_source {
            self.dropdown_source = source.clone();
        }
        if let Some(pattern) = &update.format_pattern {
            self.format_pattern = pattern.clone();
        }
        if let Some(read_only) = update.read_only {
            self.read_only = read_only;
        }
    }
}

/// Partial change to a column definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnUpdate {
    pub header: Option<String>,
    pub data_type: Option<ColumnDataType>,
    pub width: Option<f64>,
    pub dropdown_source: Option<Option<String>>,
    pub format_pattern: Option<Option<String>>,
    pub read_only: Option<bool>,
}

pub fn generate_column_key() -> String {
    format!("col_{}", Uuid::new_v4().simple())
}

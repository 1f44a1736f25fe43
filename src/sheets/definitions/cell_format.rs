// src/sheets/definitions/cell_format.rs
use bevy::prelude::warn;
use serde::{
    de::{self, Deserializer},
    Deserialize, Serialize, Serializer,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellAlign {
    Left,
    Center,
    Right,
}

impl CellAlign {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Some(CellAlign::Left),
            "center" | "centre" | "middle" => Some(CellAlign::Center),
            "right" | "end" => Some(CellAlign::Right),
            _ => None,
        }
    }
}

/// Formatting overrides for one cell. The default value means "no overrides".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellFormat {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub font_color: Option<String>,
    #[serde(default)]
    pub bg_color: Option<String>,
    #[serde(default)]
    pub align: Option<CellAlign>,
}

impl CellFormat {
    pub fn is_default(&self) -> bool {
        *self == CellFormat::default()
    }

    /// Reads a format record field by field; mistyped fields keep their default.
    pub fn from_json(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return CellFormat::default();
        };
        let flag = |name: &str| obj.get(name).and_then(Value::as_bool).unwrap_or(false);
        let color = |name: &str| {
            obj.get(name)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        CellFormat {
            bold: flag("bold"),
            italic: flag("italic"),
            underline: flag("underline"),
            font_color: color("fontColor"),
            bg_color: color("bgColor"),
            align: obj
                .get("align")
                .and_then(Value::as_str)
                .and_then(CellAlign::parse),
        }
    }
}

/// Composite `(row, col)` key of the sparse cell metadata map, persisted as `"row,col"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellMetaKey {
    pub row: usize,
    pub col: usize,
}

impl CellMetaKey {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellMetaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

impl FromStr for CellMetaKey {
    type Err = String;

    /// Accepts `,` as the canonical separator; `-`, `_` and `:` are tolerated on read.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, col) = s
            .trim()
            .split_once([',', '-', '_', ':'])
            .ok_or_else(|| format!("Cell meta key '{}' has no separator", s))?;
        let row = row
            .trim()
            .parse::<usize>()
            .map_err(|e| format!("Cell meta key '{}' has invalid row: {}", s, e))?;
        let col = col
            .trim()
            .parse::<usize>()
            .map_err(|e| format!("Cell meta key '{}' has invalid column: {}", s, e))?;
        Ok(CellMetaKey { row, col })
    }
}

impl Serialize for CellMetaKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CellMetaKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

pub type CellMeta = BTreeMap<CellMetaKey, CellFormat>;

/// Builds the sparse metadata map from an untrusted JSON object.
/// Unparseable keys are dropped and all-default records are pruned.
pub fn cell_meta_from_json(value: Option<&Value>) -> CellMeta {
    let mut meta = CellMeta::new();
    let Some(obj) = value.and_then(Value::as_object) else {
        return meta;
    };
    for (raw_key, raw_format) in obj {
        match raw_key.parse::<CellMetaKey>() {
            Ok(key) => {
                let format = CellFormat::from_json(raw_format);
                if !format.is_default() {
                    meta.insert(key, format);
                }
            }
            Err(e) => warn!("CellMeta: dropping entry: {}", e),
        }
    }
    meta
}

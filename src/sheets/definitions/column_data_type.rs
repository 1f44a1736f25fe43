// src/sheets/definitions/column_data_type.rs
use serde::{
    de::{self, Deserializer},
    Deserialize, Serialize,
};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColumnDataType {
    #[default]
    Text,
    Numeric,
    Date,
    Time,
    Checkbox,
    Dropdown,
}

impl ColumnDataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnDataType::Text => "text",
            ColumnDataType::Numeric => "numeric",
            ColumnDataType::Date => "date",
            ColumnDataType::Time => "time",
            ColumnDataType::Checkbox => "checkbox",
            ColumnDataType::Dropdown => "dropdown",
        }
    }
}

impl fmt::Display for ColumnDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Lenient on read: host documents written by older widget versions use other spellings
impl<'de> Deserialize<'de> for ColumnDataType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = serde_json::Value::deserialize(deserializer)?;
        let as_str = match v {
            serde_json::Value::String(s) => s,
            other => {
                return Err(de::Error::custom(format!(
                    "ColumnDataType must be string, got {}",
                    other
                )))
            }
        };
        parse_column_data_type(&as_str)
            .ok_or_else(|| de::Error::custom(format!("Unknown ColumnDataType '{}'", as_str)))
    }
}

pub fn parse_column_data_type(s: &str) -> Option<ColumnDataType> {
    let norm = s.trim().to_ascii_lowercase();
    match norm.as_str() {
        "text" | "string" | "str" => Some(ColumnDataType::Text),
        "numeric" | "number" | "num" | "int" | "integer" | "float" | "decimal" => {
            Some(ColumnDataType::Numeric)
        }
        "date" | "datetime" => Some(ColumnDataType::Date),
        "time" => Some(ColumnDataType::Time),
        "checkbox" | "bool" | "boolean" => Some(ColumnDataType::Checkbox),
        "dropdown" | "select" | "autocomplete" | "enum" => Some(ColumnDataType::Dropdown),
        _ => None,
    }
}

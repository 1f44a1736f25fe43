// src/sheets/definitions/cell_value.rs
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

/// A single grid cell as stored in the host document.
///
/// Numbers keep their original JSON representation so that a value read
/// from the host is written back byte-for-byte.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
}

impl CellValue {
    /// Converts a JSON scalar into a cell. Arrays and objects are not cells.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(CellValue::Null),
            Value::Bool(b) => Some(CellValue::Bool(*b)),
            Value::Number(n) => Some(CellValue::Number(n.clone())),
            Value::String(s) => Some(CellValue::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// `Null` and the empty string both count as empty for trimming.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(Number::from(n))
    }
}

impl From<f64> for CellValue {
    /// Non-finite floats have no JSON form and become `Null`.
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(CellValue::Null, CellValue::Number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_convert_and_containers_do_not() {
        assert_eq!(CellValue::from_json(&json!(null)), Some(CellValue::Null));
        assert_eq!(CellValue::from_json(&json!("x")), Some(CellValue::from("x")));
        assert_eq!(CellValue::from_json(&json!(true)), Some(CellValue::Bool(true)));
        assert_eq!(CellValue::from_json(&json!(3)), Some(CellValue::from(3i64)));
        assert_eq!(CellValue::from_json(&json!([1])), None);
        assert_eq!(CellValue::from_json(&json!({"a": 1})), None);
    }

    #[test]
    fn empty_string_counts_as_empty() {
        assert!(CellValue::Null.is_empty());
        assert!(CellValue::from("").is_empty());
        assert!(!CellValue::from(" ").is_empty());
        assert!(!CellValue::Bool(false).is_empty());
        assert!(!CellValue::from(0i64).is_empty());
    }

    #[test]
    fn nan_becomes_null() {
        assert_eq!(CellValue::from(f64::NAN), CellValue::Null);
        assert_eq!(CellValue::from(1.5).as_f64(), Some(1.5));
    }

    #[test]
    fn serializes_as_plain_json_scalars() {
        let row = vec![
            CellValue::Null,
            CellValue::from("a"),
            CellValue::from(2i64),
            CellValue::Bool(false),
        ];
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"[null,"a",2,false]"#);
    }
}

// src/sheets/systems/io/parsers.rs
use bevy::prelude::{debug, warn};
use serde_json::{Map, Value};
use std::collections::HashSet;
use uuid::Uuid;

use super::preview;
use crate::settings::GridConfig;
use crate::sheets::definitions::{
    cell_format::cell_meta_from_json, generate_column_key, parse_column_data_type, CellValue,
    ColumnDataType, ColumnDefinition, MergeRect, Sheet,
};

/// Parses the multi-sheet host document (a JSON array of sheets).
///
/// Absent, blank, syntactically invalid and wrongly shaped input all yield an
/// empty list: an uninitialized host attribute is a normal state, not a failure.
/// Individual malformed entries degrade to empty sheets instead of failing the whole parse.
pub fn parse_workbook(raw: &str, grid: &GridConfig, preview_chars: usize) -> Vec<Sheet> {
    let trimmed = raw.trim_start_matches('\u{FEFF}').trim();
    if trimmed.is_empty() {
        debug!("Parse: host value is empty, no sheets to load.");
        return Vec::new();
    }

    let value: Value = match serde_json::from_str(trimmed) {
        Ok(v) => v,
        Err(e) => {
            warn!(
                "Parse: host value is not valid JSON ({}). Raw: '{}'",
                e,
                preview(trimmed, preview_chars)
            );
            return Vec::new();
        }
    };

    let Some(entries) = value.as_array() else {
        warn!(
            "Parse: expected an array of sheets, got another JSON shape. Raw: '{}'",
            preview(trimmed, preview_chars)
        );
        return Vec::new();
    };

    let mut sheets: Vec<Sheet> = entries
        .iter()
        .enumerate()
        .map(|(position, entry)| normalize_sheet(entry, position, grid))
        .collect();

    // Stable: equal order indices keep document order
    sheets.sort_by_key(|s| s.order_index);
    for (i, sheet) in sheets.iter_mut().enumerate() {
        sheet.order_index = i;
    }
    ensure_unique_ids(&mut sheets);
    sheets
}

/// Parses the single-sheet host document (one JSON object).
pub fn parse_single_sheet(raw: &str, grid: &GridConfig, preview_chars: usize) -> Option<Sheet> {
    let trimmed = raw.trim_start_matches('\u{FEFF}').trim();
    if trimmed.is_empty() {
        debug!("Parse: host value is empty, no sheet to load.");
        return None;
    }
    let value: Value = match serde_json::from_str(trimmed) {
        Ok(v) => v,
        Err(e) => {
            warn!(
                "Parse: host value is not valid JSON ({}). Raw: '{}'",
                e,
                preview(trimmed, preview_chars)
            );
            return None;
        }
    };
    if !value.is_object() {
        warn!(
            "Parse: expected a sheet object, got another JSON shape. Raw: '{}'",
            preview(trimmed, preview_chars)
        );
        return None;
    }
    Some(normalize_sheet(&value, 0, grid))
}

/// Fills every missing or mistyped field of one sheet with its default.
pub fn normalize_sheet(value: &Value, position: usize, grid: &GridConfig) -> Sheet {
    let empty = Map::new();
    let obj = match value.as_object() {
        Some(o) => o,
        None => {
            warn!(
                "Parse: sheet entry {} is not an object; substituting an empty sheet.",
                position
            );
            &empty
        }
    };

    let id = obj
        .get("sheetId")
        .and_then(scalar_to_string)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let name = obj
        .get("sheetName")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Sheet{}", position + 1));
    let order_index = json_index(obj.get("orderIndex")).unwrap_or(position);
    let is_editable = obj
        .get("isEditable")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let columns = normalize_columns(obj.get("columns"), grid);
    let grid_cells = normalize_grid(obj.get("data"), grid, columns.len());

    Sheet {
        id,
        name,
        order_index,
        is_editable,
        grid: grid_cells,
        columns,
        row_labels: normalize_row_labels(obj.get("rowLabels")),
        cell_meta: cell_meta_from_json(obj.get("cellMeta")),
        col_widths: normalize_sizes(obj.get("colWidths"), grid.default_column_width),
        row_heights: normalize_sizes(obj.get("rowHeights"), grid.default_row_height),
        merged_cells: normalize_merges(obj.get("mergedCells")),
    }
}

/// Pads the grid to a rectangle of at least the configured minimum size.
///
/// Width is the widest of the configured minimum, the widest row present and the
/// column schema. Rows are padded on the right, the grid at the bottom. Nothing is truncated.
pub fn normalize_grid(value: Option<&Value>, grid: &GridConfig, column_count: usize) -> Vec<Vec<CellValue>> {
    let mut rows: Vec<Vec<CellValue>> = match value.and_then(Value::as_array) {
        Some(raw_rows) => raw_rows
            .iter()
            .map(|raw_row| match raw_row.as_array() {
                Some(cells) => cells
                    .iter()
                    .map(|c| CellValue::from_json(c).unwrap_or_default())
                    .collect(),
                None => Vec::new(),
            })
            .collect(),
        None => {
            if value.is_some_and(|v| !v.is_null()) {
                debug!("Parse: 'data' is not an array; using an empty grid.");
            }
            Vec::new()
        }
    };

    let widest = rows.iter().map(Vec::len).max().unwrap_or(0);
    let target_cols = grid.min_cols.max(widest).max(column_count);
    for row in rows.iter_mut() {
        row.resize(target_cols, CellValue::Null);
    }
    while rows.len() < grid.min_rows {
        rows.push(vec![CellValue::Null; target_cols]);
    }
    rows
}

fn normalize_columns(value: Option<&Value>, grid: &GridConfig) -> Vec<ColumnDefinition> {
    let Some(raw_cols) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    let mut seen: HashSet<String> = HashSet::new();
    raw_cols
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let empty = Map::new();
            let obj = raw.as_object().unwrap_or(&empty);
            let mut key = obj
                .get("key")
                .and_then(scalar_to_string)
                .filter(|k| !k.trim().is_empty())
                .unwrap_or_else(generate_column_key);
            if seen.contains(&key) {
                let fresh = generate_column_key();
                warn!(
                    "Parse: duplicate column key '{}' at index {}; replaced with '{}'.",
                    key, index, fresh
                );
                key = fresh;
            }
            seen.insert(key.clone());

            let data_type = match obj.get("dataType").and_then(Value::as_str) {
                Some(raw_type) => parse_column_data_type(raw_type).unwrap_or_else(|| {
                    debug!("Parse: unknown column type '{}'; using text.", raw_type);
                    ColumnDataType::Text
                }),
                None => ColumnDataType::Text,
            };
            let width = obj
                .get("width")
                .and_then(Value::as_f64)
                .filter(|w| w.is_finite() && *w > 0.0)
                .unwrap_or(grid.default_column_width);

            ColumnDefinition {
                key,
                header: obj
                    .get("header")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                data_type,
                width,
                dropdown_source: optional_string(obj.get("dropdownSource")),
                format_pattern: optional_string(obj.get("formatPattern")),
                read_only: obj.get("readOnly").and_then(Value::as_bool).unwrap_or(false),
            }
        })
        .collect()
}

fn normalize_row_labels(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|labels| {
            labels
                .iter()
                .map(|l| scalar_to_string(l).unwrap_or_default())
                .collect()
        })
        .unwrap_or_default()
}

fn normalize_sizes(value: Option<&Value>, default_size: f64) -> Vec<f64> {
    value
        .and_then(Value::as_array)
        .map(|sizes| {
            sizes
                .iter()
                .map(|s| {
                    s.as_f64()
                        .filter(|v| v.is_finite() && *v > 0.0)
                        .unwrap_or(default_size)
                })
                .collect()
        })
        .unwrap_or_default()
}

fn normalize_merges(value: Option<&Value>) -> Vec<MergeRect> {
    let Some(raw) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    raw.iter()
        .filter_map(|m| {
            let obj = m.as_object()?;
            let field = |name: &str| json_index(obj.get(name));
            let merge = MergeRect {
                row: field("row")?,
                col: field("col")?,
                rowspan: field("rowspan").unwrap_or(1).max(1),
                colspan: field("colspan").unwrap_or(1).max(1),
            };
            Some(merge)
        })
        .collect()
}

/// A non-negative integer that fits in `usize`.
fn json_index(value: Option<&Value>) -> Option<usize> {
    value
        .and_then(Value::as_u64)
        .and_then(|n| usize::try_from(n).ok())
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn optional_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Ids must be unique among live sheets; later duplicates get fresh ids.
fn ensure_unique_ids(sheets: &mut [Sheet]) {
    let mut seen: HashSet<String> = HashSet::new();
    for sheet in sheets.iter_mut() {
        if !seen.insert(sheet.id.clone()) {
            let fresh = Uuid::new_v4().to_string();
            warn!(
                "Parse: duplicate sheet id '{}' for '{}'; replaced with '{}'.",
                sheet.id, sheet.name, fresh
            );
            sheet.id = fresh.clone();
            seen.insert(fresh);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::definitions::CellMetaKey;

    const PREVIEW: usize = 64;

    fn config() -> GridConfig {
        GridConfig::default()
    }

    #[test]
    fn minimal_sheet_is_padded_to_minimums() {
        let sheets = parse_workbook(r#"[{"sheetId":"a","data":[["x"]]}]"#, &config(), PREVIEW);
        assert_eq!(sheets.len(), 1);
        let s = &sheets[0];
        assert_eq!(s.id, "a");
        assert_eq!(s.row_count(), 50);
        assert!(s.grid.iter().all(|r| r.len() == 26));
        assert_eq!(s.grid[0][0], CellValue::from("x"));
        let non_null = s.grid.iter().flatten().filter(|c| **c != CellValue::Null).count();
        assert_eq!(non_null, 1);
        assert_eq!(s.order_index, 0);
        assert!(!s.is_editable);
        assert_eq!(s.name, "Sheet1");
        assert!(s.columns.is_empty());
    }

    #[test]
    fn blank_and_broken_input_yield_no_sheets() {
        for raw in ["", "   ", "\u{FEFF}", "{not json", "{\"sheetId\":\"a\"}", "42", "null"] {
            assert!(parse_workbook(raw, &config(), PREVIEW).is_empty(), "input {:?}", raw);
        }
        assert!(parse_single_sheet("", &config(), PREVIEW).is_none());
        assert!(parse_single_sheet("[]", &config(), PREVIEW).is_none());
        assert!(parse_single_sheet("{oops", &config(), PREVIEW).is_none());
    }

    #[test]
    fn malformed_entry_degrades_to_empty_sheet() {
        let sheets = parse_workbook(r#"[{"sheetId":"a","sheetName":"A"}, 17, "x"]"#, &config(), PREVIEW);
        assert_eq!(sheets.len(), 3);
        assert_eq!(sheets[1].name, "Sheet2");
        assert_eq!(sheets[1].row_count(), 50);
        assert_ne!(sheets[1].id, sheets[2].id);
    }

    #[test]
    fn jagged_rows_are_padded_to_widest_row() {
        let cfg = GridConfig {
            min_rows: 2,
            min_cols: 2,
            ..Default::default()
        };
        let sheets = parse_workbook(r#"[{"data":[[1],[1,2,3,4],"bad",[[9],{"a":1}]]}]"#, &cfg, PREVIEW);
        let s = &sheets[0];
        assert_eq!(s.row_count(), 4);
        assert!(s.grid.iter().all(|r| r.len() == 4));
        assert_eq!(s.grid[2], vec![CellValue::Null; 4]);
        assert_eq!(s.grid[3][0], CellValue::Null);
    }

    #[test]
    fn grid_is_at_least_as_wide_as_schema() {
        let cfg = GridConfig {
            min_rows: 1,
            min_cols: 1,
            ..Default::default()
        };
        let raw = r#"[{"data":[["a"]],"columns":[{"key":"a"},{"key":"b"},{"key":"c"}]}]"#;
        let s = &parse_workbook(raw, &cfg, PREVIEW)[0];
        assert_eq!(s.column_count(), 3);
    }

    #[test]
    fn sheets_are_stably_sorted_then_renumbered() {
        let raw = r#"[
            {"sheetId":"c","orderIndex":5},
            {"sheetId":"a","orderIndex":1},
            {"sheetId":"b","orderIndex":1},
            {"sheetId":"d"}
        ]"#;
        let sheets = parse_workbook(raw, &config(), PREVIEW);
        let ids: Vec<&str> = sheets.iter().map(|s| s.id.as_str()).collect();
        // "d" has no orderIndex and takes its position (3)
        assert_eq!(ids, vec!["a", "b", "d", "c"]);
        let order: Vec<usize> = sheets.iter().map(|s| s.order_index).collect();
        assert_eq!(order, vec![0, 1, 2, 3]);
    }

    #[test]
    fn columns_get_defaults_and_unique_keys() {
        let raw = r#"[{"columns":[
            {"key":"k1","header":"Qty","dataType":"Number","width":-4,"readOnly":true},
            {"key":"k1","header":"Dup","dataType":"mystery"},
            {"header":"NoKey","dataType":"dropdown","dropdownSource":"a,b"},
            "garbage"
        ]}]"#;
        let s = &parse_workbook(raw, &config(), PREVIEW)[0];
        assert_eq!(s.columns.len(), 4);
        assert_eq!(s.columns[0].data_type, ColumnDataType::Numeric);
        assert_eq!(s.columns[0].width, 100.0);
        assert!(s.columns[0].read_only);
        assert_ne!(s.columns[1].key, "k1");
        assert_eq!(s.columns[1].data_type, ColumnDataType::Text);
        assert!(s.columns[2].key.starts_with("col_"));
        assert_eq!(s.columns[2].dropdown_source.as_deref(), Some("a,b"));
        assert_eq!(s.columns[3].header, "");
        let keys: HashSet<&str> = s.columns.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn metadata_fields_are_normalized() {
        let raw = r#"[{
            "rowLabels":["Mon",2,null],
            "cellMeta":{"0,1":{"italic":true},"x":{"bold":true}},
            "colWidths":[120,"wide",0],
            "rowHeights":"tall",
            "mergedCells":[{"row":1,"col":1,"rowspan":2,"colspan":0},{"row":"x","col":1}],
            "isEditable":"yes"
        }]"#;
        let s = &parse_workbook(raw, &config(), PREVIEW)[0];
        assert_eq!(s.row_labels, vec!["Mon", "2", ""]);
        assert_eq!(s.cell_meta.len(), 1);
        assert!(s.cell_meta[&CellMetaKey::new(0, 1)].italic);
        assert_eq!(s.col_widths, vec![120.0, 100.0, 100.0]);
        assert!(s.row_heights.is_empty());
        assert_eq!(
            s.merged_cells,
            vec![MergeRect { row: 1, col: 1, rowspan: 2, colspan: 1 }]
        );
        assert!(!s.is_editable);
    }

    #[test]
    fn single_sheet_document_parses_object() {
        let cfg = GridConfig {
            min_rows: 3,
            min_cols: 3,
            ..Default::default()
        };
        let s = parse_single_sheet(r#"{"data":[[true,1.5]]}"#, &cfg, PREVIEW).unwrap();
        assert_eq!(s.grid[0][0], CellValue::Bool(true));
        assert_eq!(s.grid[0][1], CellValue::from(1.5));
        assert_eq!(s.row_count(), 3);
    }

    #[test]
    fn duplicate_sheet_ids_are_replaced() {
        let sheets = parse_workbook(r#"[{"sheetId":"a"},{"sheetId":"a"}]"#, &config(), PREVIEW);
        assert_eq!(sheets[0].id, "a");
        assert_ne!(sheets[1].id, "a");
    }

    #[test]
    fn indices_must_be_whole_and_non_negative() {
        assert_eq!(json_index(Some(&Value::from(7u64))), Some(7));
        assert_eq!(json_index(Some(&Value::from(-1))), None);
        assert_eq!(json_index(Some(&Value::from(2.5))), None);
        assert_eq!(json_index(Some(&Value::from("3"))), None);
        assert_eq!(json_index(None), None);
        let huge = json_index(Some(&Value::from(u64::MAX)));
        if usize::BITS < 64 {
            assert_eq!(huge, None);
        } else {
            assert_eq!(huge.map(|n| n as u64), Some(u64::MAX));
        }
    }

    #[test]
    fn merges_with_bad_anchors_are_dropped() {
        let sheets = parse_workbook(
            r#"[{"sheetId":"a","mergedCells":[{"row":-1,"col":0},{"row":0.5,"col":0},{"row":2,"col":3,"rowspan":0}]}]"#,
            &config(),
            PREVIEW,
        );
        assert_eq!(
            sheets[0].merged_cells,
            vec![MergeRect { row: 2, col: 3, rowspan: 1, colspan: 1 }]
        );
    }
}

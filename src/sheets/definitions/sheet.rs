// src/sheets/definitions/sheet.rs
use serde::{Deserialize, Serialize};

use super::cell_format::{CellFormat, CellMeta, CellMetaKey};
use super::cell_value::CellValue;
use super::column_data_type::ColumnDataType;
use super::column_definition::ColumnDefinition;
use crate::settings::GridConfig;

/// Highest row count an edit may grow a sheet to.
pub const MAX_ROWS: usize = 1_048_576;
/// Highest column count an edit may grow a sheet to.
pub const MAX_COLS: usize = 16_384;

/// Rectangular merge declaration anchored at `(row, col)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRect {
    pub row: usize,
    pub col: usize,
    pub rowspan: usize,
    pub colspan: usize,
}

/// One persisted grid plus its schema and formatting metadata.
///
/// Sheets are treated as values: the mutation operations in
/// `systems::logic` take a sheet (or slice of sheets) and return new ones.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub id: String,
    pub name: String,
    pub order_index: usize,
    pub is_editable: bool,
    pub grid: Vec<Vec<CellValue>>,
    pub columns: Vec<ColumnDefinition>,
    pub row_labels: Vec<String>,
    pub cell_meta: CellMeta,
    pub col_widths: Vec<f64>,
    pub row_heights: Vec<f64>,
    pub merged_cells: Vec<MergeRect>,
}

impl Sheet {
    /// An all-null sheet at the configured minimum size, with no schema and no formatting.
    pub fn blank(id: String, name: String, order_index: usize, grid: &GridConfig) -> Self {
        Sheet {
            id,
            name,
            order_index,
            is_editable: false,
            grid: vec![vec![CellValue::Null; grid.min_cols]; grid.min_rows],
            columns: Vec::new(),
            row_labels: Vec::new(),
            cell_meta: CellMeta::new(),
            col_widths: Vec::new(),
            row_heights: Vec::new(),
            merged_cells: Vec::new(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.grid.len()
    }

    pub fn column_count(&self) -> usize {
        self.grid.first().map_or(0, Vec::len)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.grid.get(row).and_then(|r| r.get(col))
    }

    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }

    /// Header shown for a column: its definition's header, or the spreadsheet letter.
    pub fn column_header(&self, index: usize) -> String {
        self.columns
            .get(index)
            .map(|c| c.header.as_str())
            .filter(|h| !h.is_empty())
            .map_or_else(|| column_letter(index), str::to_string)
    }

    pub fn column_data_type(&self, index: usize) -> ColumnDataType {
        self.columns
            .get(index)
            .map_or(ColumnDataType::Text, |c| c.data_type)
    }

    pub fn column_read_only(&self, index: usize) -> bool {
        self.columns.get(index).is_some_and(|c| c.read_only)
    }

    pub fn column_width(&self, index: usize, grid: &GridConfig) -> f64 {
        self.col_widths
            .get(index)
            .copied()
            .unwrap_or(grid.default_column_width)
    }

    pub fn row_height(&self, index: usize, grid: &GridConfig) -> f64 {
        self.row_heights
            .get(index)
            .copied()
            .unwrap_or(grid.default_row_height)
    }

    /// Formatting for a cell; cells without an entry use the default format.
    pub fn format_at(&self, row: usize, col: usize) -> CellFormat {
        self.cell_meta
            .get(&CellMetaKey::new(row, col))
            .cloned()
            .unwrap_or_default()
    }

    fn has_row_labels(&self) -> bool {
        self.row_labels.iter().any(|l| !l.is_empty())
    }

    /// Number of rows a consumer should display.
    ///
    /// With `limit_by_labels`, a sheet that has any non-empty row label shows
    /// exactly `row_labels.len()` rows (capped at the grid height).
    pub fn visible_row_count(&self, limit_by_labels: bool) -> usize {
        if limit_by_labels && self.has_row_labels() {
            self.row_labels.len().min(self.row_count())
        } else {
            self.row_count()
        }
    }

    /// Row header text: the label when present and non-empty, otherwise the 1-based number.
    pub fn row_header(&self, index: usize) -> String {
        match self.row_labels.get(index) {
            Some(label) if !label.is_empty() => label.clone(),
            _ => (index + 1).to_string(),
        }
    }

    /// Labels aligned with the visible rows: padded with `""`, surplus ignored.
    pub fn display_row_labels(&self, limit_by_labels: bool) -> Vec<String> {
        let visible = self.visible_row_count(limit_by_labels);
        (0..visible)
            .map(|i| self.row_labels.get(i).cloned().unwrap_or_default())
            .collect()
    }
}

/// Spreadsheet column letter for a zero-based index (`0 -> A`, `25 -> Z`, `26 -> AA`).
pub fn column_letter(index: usize) -> String {
    let mut result = String::new();
    let mut n = index;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_grid() -> GridConfig {
        GridConfig {
            min_rows: 4,
            min_cols: 3,
            ..Default::default()
        }
    }

    #[test]
    fn letters_follow_spreadsheet_convention() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(27), "AB");
        assert_eq!(column_letter(701), "ZZ");
        assert_eq!(column_letter(702), "AAA");
    }

    #[test]
    fn blank_sheet_is_safe_by_default() {
        let sheet = Sheet::blank("id".into(), "Sheet1".into(), 0, &small_grid());
        assert_eq!(sheet.row_count(), 4);
        assert_eq!(sheet.column_count(), 3);
        assert!(!sheet.is_editable);
        assert!(sheet.grid.iter().flatten().all(|c| *c == CellValue::Null));
        assert_eq!(sheet.column_header(1), "B");
        assert_eq!(sheet.column_data_type(1), ColumnDataType::Text);
    }

    #[test]
    fn labels_limit_visible_rows_only_when_enabled() {
        let mut sheet = Sheet::blank("id".into(), "S".into(), 0, &small_grid());
        sheet.row_labels = vec!["Mon".into(), "".into()];
        assert_eq!(sheet.visible_row_count(true), 2);
        assert_eq!(sheet.visible_row_count(false), 4);
        assert_eq!(sheet.display_row_labels(false), vec!["Mon", "", "", ""]);
        assert_eq!(sheet.row_header(0), "Mon");
        assert_eq!(sheet.row_header(1), "2");

        sheet.row_labels = vec!["".into(), "".into()];
        assert_eq!(sheet.visible_row_count(true), 4);
    }

    #[test]
    fn surplus_labels_are_ignored() {
        let mut sheet = Sheet::blank("id".into(), "S".into(), 0, &small_grid());
        sheet.row_labels = (0..10).map(|i| format!("r{}", i)).collect();
        assert_eq!(sheet.visible_row_count(true), 4);
        assert_eq!(sheet.display_row_labels(true).len(), 4);
    }
}

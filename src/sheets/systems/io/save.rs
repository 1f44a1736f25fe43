// src/sheets/systems/io/save.rs

use bevy::prelude::{error, trace};
use serde::Serialize;

use crate::sheets::definitions::{CellMeta, CellValue, ColumnDefinition, MergeRect, Sheet};

/// Fallback written when the multi-sheet document cannot be produced.
pub const EMPTY_WORKBOOK_JSON: &str = "[]";
/// Fallback written when the single-sheet document cannot be produced.
pub const EMPTY_SHEET_JSON: &str = "{}";

// Every field is always emitted so the stored document is self-describing.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SheetDocument<'a> {
    sheet_id: &'a str,
    sheet_name: &'a str,
    order_index: usize,
    is_editable: bool,
    data: Vec<&'a [CellValue]>,
    columns: &'a [ColumnDefinition],
    row_labels: &'a [String],
    cell_meta: &'a CellMeta,
    col_widths: &'a [f64],
    row_heights: &'a [f64],
    merged_cells: &'a [MergeRect],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SingleSheetDocument<'a> {
    data: Vec<&'a [CellValue]>,
    columns: &'a [ColumnDefinition],
    cell_meta: &'a CellMeta,
    col_widths: &'a [f64],
    row_heights: &'a [f64],
    merged_cells: &'a [MergeRect],
}

impl<'a> SheetDocument<'a> {
    fn from_sheet(sheet: &'a Sheet) -> Self {
        SheetDocument {
            sheet_id: &sheet.id,
            sheet_name: &sheet.name,
            order_index: sheet.order_index,
            is_editable: sheet.is_editable,
            data: trimmed_grid(&sheet.grid),
            columns: &sheet.columns,
            row_labels: &sheet.row_labels,
            cell_meta: &sheet.cell_meta,
            col_widths: &sheet.col_widths,
            row_heights: &sheet.row_heights,
            merged_cells: &sheet.merged_cells,
        }
    }
}

/// Trims trailing all-empty rows (keeping at least one) and then truncates every
/// surviving row to the rightmost non-empty column across all of them.
/// Interior empty rows and columns are never removed.
pub fn trimmed_grid(grid: &[Vec<CellValue>]) -> Vec<&[CellValue]> {
    let last_row = grid
        .iter()
        .rposition(|row| row.iter().any(|c| !c.is_empty()))
        .unwrap_or(0);
    let kept = if grid.is_empty() { 0 } else { last_row + 1 };
    let rows = &grid[..kept];

    let width = rows
        .iter()
        .filter_map(|row| row.iter().rposition(|c| !c.is_empty()))
        .max()
        .map_or(0, |col| col + 1);

    let mut trimmed: Vec<&[CellValue]> = rows
        .iter()
        .map(|row| &row[..width.min(row.len())])
        .collect();
    if trimmed.is_empty() {
        trimmed.push(&[]);
    }
    trimmed
}

/// Serializes the workbook as the multi-sheet host document. Never fails outward.
pub fn serialize_workbook(sheets: &[Sheet]) -> String {
    let docs: Vec<SheetDocument<'_>> = sheets.iter().map(SheetDocument::from_sheet).collect();
    match serde_json::to_string(&docs) {
        Ok(json) => {
            trace!("Serialize: {} sheet(s), {} bytes.", sheets.len(), json.len());
            json
        }
        Err(e) => {
            error!(
                "Serialize: failed to serialize {} sheet(s): {}. Writing empty workbook.",
                sheets.len(),
                e
            );
            EMPTY_WORKBOOK_JSON.to_string()
        }
    }
}

/// Serializes one sheet as the single-sheet host document. Never fails outward.
pub fn serialize_single_sheet(sheet: &Sheet) -> String {
    let doc = SingleSheetDocument {
        data: trimmed_grid(&sheet.grid),
        columns: &sheet.columns,
        cell_meta: &sheet.cell_meta,
        col_widths: &sheet.col_widths,
        row_heights: &sheet.row_heights,
        merged_cells: &sheet.merged_cells,
    };
    match serde_json::to_string(&doc) {
        Ok(json) => json,
        Err(e) => {
            error!(
                "Serialize: failed to serialize sheet '{}': {}. Writing empty sheet.",
                sheet.name, e
            );
            EMPTY_SHEET_JSON.to_string()
        }
    }
}

// src/sheets/systems/logic/update_cell.rs
//! Cell values and per-cell formatting.

use bevy::prelude::*;

use super::{check_index, edit_sheet, report, EditRight};
use crate::settings::WidgetSettings;
use crate::sheets::{
    definitions::{CellFormat, CellMeta, CellMetaKey, CellValue, Sheet, MAX_COLS, MAX_ROWS},
    error::MutationResult,
    events::{
        SheetOperationFeedback, UpdateCellEvent, UpdateCellFormatEvent, UpdateCellMetaEvent,
        UpdateGridEvent,
    },
    permissions::PermissionContext,
    resources::Workbook,
};

/// Replaces the whole grid. Rows are padded with `Null` to the widest row, and never
/// narrower than the column definitions.
pub fn replace_grid(sheet: &Sheet, grid: &[Vec<CellValue>]) -> Sheet {
    let width = grid
        .iter()
        .map(Vec::len)
        .max()
        .unwrap_or(0)
        .max(sheet.columns.len());
    let grid = grid
        .iter()
        .map(|row| {
            let mut row = row.clone();
            row.resize(width, CellValue::Null);
            row
        })
        .collect();
    Sheet {
        grid,
        ..sheet.clone()
    }
}

/// Writes one cell, growing the grid with `Null` cells when the target lies outside it.
/// Targets past `MAX_ROWS` or `MAX_COLS` are refused.
pub fn set_cell_value(
    sheet: &Sheet,
    row: usize,
    col: usize,
    value: CellValue,
) -> MutationResult<Sheet> {
    check_index("row", row, MAX_ROWS)?;
    check_index("column", col, MAX_COLS)?;
    let mut updated = sheet.clone();
    let width = updated.column_count().max(col + 1);
    if updated.grid.len() <= row {
        updated.grid.resize(row + 1, Vec::new());
    }
    for cells in updated.grid.iter_mut() {
        if cells.len() < width {
            cells.resize(width, CellValue::Null);
        }
    }
    updated.grid[row][col] = value;
    Ok(updated)
}

/// Replaces all cell metadata; records carrying no overrides are dropped.
pub fn replace_cell_meta(sheet: &Sheet, cell_meta: &CellMeta) -> Sheet {
    Sheet {
        cell_meta: cell_meta
            .iter()
            .filter(|(_, format)| !format.is_default())
            .map(|(key, format)| (*key, format.clone()))
            .collect(),
        ..sheet.clone()
    }
}

/// Sets one cell's format. The default format removes the entry.
pub fn set_cell_format(sheet: &Sheet, row: usize, col: usize, format: &CellFormat) -> Sheet {
    let mut updated = sheet.clone();
    let key = CellMetaKey::new(row, col);
    if format.is_default() {
        updated.cell_meta.remove(&key);
    } else {
        updated.cell_meta.insert(key, format.clone());
    }
    updated
}

pub fn handle_grid_update(
    mut events: EventReader<UpdateGridEvent>,
    mut workbook: ResMut<Workbook>,
    settings: Res<WidgetSettings>,
    permissions: Res<PermissionContext>,
    mut feedback_writer: EventWriter<SheetOperationFeedback>,
) {
    for event in events.read() {
        let result = edit_sheet(
            &mut workbook,
            &settings,
            &permissions,
            &event.sheet_id,
            EditRight::Cells,
            |sheet| Ok(replace_grid(sheet, &event.grid)),
        );
        match result {
            Ok(changed) => trace!("Grid of '{}' replaced (changed: {}).", event.sheet_id, changed),
            Err(e) => report(&mut feedback_writer, "Edit cells", &event.sheet_id, Err(e)),
        }
    }
}

pub fn handle_cell_update(
    mut events: EventReader<UpdateCellEvent>,
    mut workbook: ResMut<Workbook>,
    settings: Res<WidgetSettings>,
    permissions: Res<PermissionContext>,
    mut feedback_writer: EventWriter<SheetOperationFeedback>,
) {
    for event in events.read() {
        let result = edit_sheet(
            &mut workbook,
            &settings,
            &permissions,
            &event.sheet_id,
            EditRight::Column(event.col),
            |sheet| set_cell_value(sheet, event.row, event.col, event.value.clone()),
        );
        match result {
            Ok(_) => trace!(
                "Cell [{},{}] of '{}' set to '{}'.",
                event.row,
                event.col,
                event.sheet_id,
                event.value
            ),
            Err(e) => report(&mut feedback_writer, "Edit cell", &event.sheet_id, Err(e)),
        }
    }
}

pub fn handle_cell_meta_update(
    mut events: EventReader<UpdateCellMetaEvent>,
    mut workbook: ResMut<Workbook>,
    settings: Res<WidgetSettings>,
    permissions: Res<PermissionContext>,
    mut feedback_writer: EventWriter<SheetOperationFeedback>,
) {
    for event in events.read() {
        let result = edit_sheet(
            &mut workbook,
            &settings,
            &permissions,
            &event.sheet_id,
            EditRight::Cells,
            |sheet| Ok(replace_cell_meta(sheet, &event.cell_meta)),
        );
        report(&mut feedback_writer, "Format cells", &event.sheet_id, result);
    }
}

pub fn handle_cell_format_update(
    mut events: EventReader<UpdateCellFormatEvent>,
    mut workbook: ResMut<Workbook>,
    settings: Res<WidgetSettings>,
    permissions: Res<PermissionContext>,
    mut feedback_writer: EventWriter<SheetOperationFeedback>,
) {
    for event in events.read() {
        let result = edit_sheet(
            &mut workbook,
            &settings,
            &permissions,
            &event.sheet_id,
            EditRight::Cells,
            |sheet| Ok(set_cell_format(sheet, event.row, event.col, &event.format)),
        );
        let target = format!("{} [{},{}]", event.sheet_id, event.row, event.col);
        report(&mut feedback_writer, "Format cell", &target, result);
    }
}

// src/sheets/systems/logic/update_dimensions.rs
//! Column widths, row heights and merge declarations.

use bevy::prelude::*;

use super::{check_index, edit_sheet, report, EditRight};
use crate::settings::{GridConfig, WidgetSettings};
use crate::sheets::{
    definitions::{MergeRect, Sheet, MAX_COLS, MAX_ROWS},
    error::{MutationError, MutationResult},
    events::{
        RequestSetMergedCells, RequestUpdateColumnWidth, RequestUpdateRowHeight,
        SheetOperationFeedback,
    },
    permissions::PermissionContext,
    resources::Workbook,
};

pub(crate) fn validate_size(size: f64) -> MutationResult<f64> {
    if size.is_finite() && size > 0.0 {
        Ok(size)
    } else {
        Err(MutationError::InvalidDimension(size.to_string()))
    }
}

/// Writes `value` at `index`, filling any gap with `fill`. `index` must stay below `limit`.
fn set_padded(
    sizes: &mut Vec<f64>,
    what: &'static str,
    index: usize,
    limit: usize,
    value: f64,
    fill: f64,
) -> MutationResult<()> {
    check_index(what, index, limit)?;
    if sizes.len() <= index {
        sizes.resize(index + 1, fill);
    }
    sizes[index] = value;
    Ok(())
}

/// Sets a column's pixel width; the column definition, when present, follows.
pub fn set_column_width(
    sheet: &Sheet,
    column_index: usize,
    width: f64,
    grid: &GridConfig,
) -> MutationResult<Sheet> {
    let width = validate_size(width)?;
    let mut updated = sheet.clone();
    set_padded(
        &mut updated.col_widths,
        "column",
        column_index,
        MAX_COLS,
        width,
        grid.default_column_width,
    )?;
    if let Some(column) = updated.columns.get_mut(column_index) {
        column.width = width;
    }
    Ok(updated)
}

pub fn set_row_height(
    sheet: &Sheet,
    row_index: usize,
    height: f64,
    grid: &GridConfig,
) -> MutationResult<Sheet> {
    let height = validate_size(height)?;
    let mut updated = sheet.clone();
    set_padded(
        &mut updated.row_heights,
        "row",
        row_index,
        MAX_ROWS,
        height,
        grid.default_row_height,
    )?;
    Ok(updated)
}

/// Replaces the merge list. Overlaps are left to the grid consumer; empty spans are dropped.
pub fn set_merged_cells(sheet: &Sheet, merged_cells: &[MergeRect]) -> Sheet {
    Sheet {
        merged_cells: merged_cells
            .iter()
            .filter(|m| m.rowspan > 0 && m.colspan > 0)
            .copied()
            .collect(),
        ..sheet.clone()
    }
}

pub fn handle_update_column_width(
    mut events: EventReader<RequestUpdateColumnWidth>,
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
            |sheet| set_column_width(sheet, event.column_index, event.width, &settings.grid),
        );
        // Resizes arrive continuously while dragging; only failures are worth a message.
        match result {
            Ok(_) => trace!(
                "Column width {} on '{}' set to {}.",
                event.column_index,
                event.sheet_id,
                event.width
            ),
            Err(e) => report(&mut feedback_writer, "Resize column", &event.sheet_id, Err(e)),
        }
    }
}

pub fn handle_update_row_height(
    mut events: EventReader<RequestUpdateRowHeight>,
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
            |sheet| set_row_height(sheet, event.row_index, event.height, &settings.grid),
        );
        match result {
            Ok(_) => trace!(
                "Row height {} on '{}' set to {}.",
                event.row_index,
                event.sheet_id,
                event.height
            ),
            Err(e) => report(&mut feedback_writer, "Resize row", &event.sheet_id, Err(e)),
        }
    }
}

pub fn handle_set_merged_cells(
    mut events: EventReader<RequestSetMergedCells>,
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
            |sheet| Ok(set_merged_cells(sheet, &event.merged_cells)),
        );
        report(&mut feedback_writer, "Merge cells", &event.sheet_id, result);
    }
}

// src/sheets/systems/logic/reorder_column.rs
use bevy::prelude::*;

use super::{
    check_index, edit_sheet, move_item, moved_position, pad_rows_to_schema, remap_formatting,
    report, GridAxis, EditRight,
};
use crate::settings::{GridConfig, WidgetSettings};
use crate::sheets::{
    definitions::Sheet,
    error::MutationResult,
    events::{RequestReorderColumn, SheetOperationFeedback},
    permissions::PermissionContext,
    resources::Workbook,
};

/// Moves a column definition together with its cells, width and formatting.
/// Short rows are padded with `Null`, and a partial `col_widths` with the default
/// width, so the move never leaves definitions and cells out of step.
pub fn reorder_column(
    sheet: &Sheet,
    old_index: usize,
    new_index: usize,
    grid: &GridConfig,
) -> MutationResult<Sheet> {
    let len = sheet.columns.len();
    check_index("column", old_index, len)?;
    check_index("column", new_index, len)?;
    if old_index == new_index {
        return Ok(sheet.clone());
    }
    let mut updated = sheet.clone();
    pad_rows_to_schema(&mut updated);
    move_item(&mut updated.columns, old_index, new_index);
    for row in updated.grid.iter_mut() {
        move_item(row, old_index, new_index);
    }
    // An empty list means every column uses the default width.
    if !updated.col_widths.is_empty() {
        if updated.col_widths.len() < len {
            updated.col_widths.resize(len, grid.default_column_width);
        }
        move_item(&mut updated.col_widths, old_index, new_index);
    }
    remap_formatting(&mut updated, GridAxis::Column, |c| {
        Some(moved_position(c, old_index, new_index))
    });
    Ok(updated)
}

pub fn handle_reorder_column_request(
    mut events: EventReader<RequestReorderColumn>,
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
            EditRight::Structure,
            |sheet| reorder_column(sheet, event.old_index, event.new_index, &settings.grid),
        );
        let target = format!(
            "{} ({} -> {})",
            event.sheet_id, event.old_index, event.new_index
        );
        report(&mut feedback_writer, "Reorder column", &target, result);
    }
}

// src/sheets/systems/logic/mod.rs
//! Sheet mutation operations.
//!
//! Every operation is a pure function from sheet(s) to new sheet(s); the
//! `handle_*` systems next to them read request events, check permissions,
//! apply the operation and commit the result to the `Workbook`.

use bevy::prelude::*;
use std::collections::BTreeSet;

use crate::settings::WidgetSettings;
use crate::sheets::{
    definitions::{CellMetaKey, CellValue, MergeRect, Sheet},
    error::{MutationError, MutationResult},
    events::SheetOperationFeedback,
    permissions::{can_edit_cells, can_edit_column, can_edit_structure, PermissionContext},
    resources::Workbook,
};

// Declare modules for each operation
pub mod add_column;
pub mod add_row;
pub mod create_sheet;
pub mod delete_columns;
pub mod delete_rows;
pub mod delete_sheet;
pub mod move_sheet;
pub mod rename_sheet;
pub mod reorder_column;
pub mod row_labels;
pub mod update_cell;
pub mod update_column;
pub mod update_dimensions;

// Re-export the handler functions for easier use in plugin.rs
pub use add_column::handle_add_column_request;
pub use add_row::handle_add_row_request;
pub use create_sheet::handle_add_sheet_request;
pub use delete_columns::handle_delete_column_request;
pub use delete_rows::handle_delete_rows_request;
pub use delete_sheet::handle_delete_sheet_request;
pub use move_sheet::handle_move_sheet_request;
pub use rename_sheet::{handle_rename_request, handle_set_sheet_editable_request};
pub use reorder_column::handle_reorder_column_request;
pub use row_labels::handle_row_label_change;
pub use update_cell::{
    handle_cell_format_update, handle_cell_meta_update, handle_cell_update, handle_grid_update,
};
pub use update_column::handle_update_column_request;
pub use update_dimensions::{
    handle_set_merged_cells, handle_update_column_width, handle_update_row_height,
};

/// Which right an edit needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EditRight {
    Cells,
    /// Cell rights narrowed to one column (read-only columns are refused).
    Column(usize),
    Structure,
}

fn check_right(
    settings: &WidgetSettings,
    permissions: &PermissionContext,
    sheet: Option<&Sheet>,
    right: EditRight,
) -> MutationResult<()> {
    let model = settings.permission_model;
    let allowed = match (right, sheet) {
        (EditRight::Structure, _) => can_edit_structure(permissions),
        (EditRight::Cells, sheet) => can_edit_cells(model, permissions, sheet),
        (EditRight::Column(col), Some(sheet)) => {
            if !can_edit_cells(model, permissions, Some(sheet)) {
                false
            } else if !can_edit_column(model, permissions, sheet, col) {
                return Err(MutationError::ReadOnlyColumn(sheet.column_header(col)));
            } else {
                true
            }
        }
        (EditRight::Column(_), None) => false,
    };
    if allowed {
        Ok(())
    } else if right == EditRight::Structure {
        Err(MutationError::PermissionDenied(
            "changing sheets, columns or rows requires an administrator",
        ))
    } else {
        Err(MutationError::PermissionDenied(
            "cell edits are not permitted on this sheet",
        ))
    }
}

/// Applies `op` to one sheet after checking `right`. Returns whether the model changed;
/// an operation that returns an identical sheet does not count as an edit.
pub(crate) fn edit_sheet(
    workbook: &mut Workbook,
    settings: &WidgetSettings,
    permissions: &PermissionContext,
    sheet_id: &str,
    right: EditRight,
    op: impl FnOnce(&Sheet) -> MutationResult<Sheet>,
) -> MutationResult<bool> {
    let sheet = workbook
        .get_sheet(sheet_id)
        .ok_or_else(|| MutationError::SheetNotFound(sheet_id.to_string()))?;
    check_right(settings, permissions, Some(sheet), right)?;
    let updated = op(sheet)?;
    if updated == *sheet {
        return Ok(false);
    }
    let sheets = workbook
        .sheets()
        .iter()
        .map(|s| if s.id == sheet_id { updated.clone() } else { s.clone() })
        .collect();
    workbook.apply_edit(sheets);
    Ok(true)
}

/// Applies a structural `op` to the whole sheet list.
pub(crate) fn edit_workbook(
    workbook: &mut Workbook,
    settings: &WidgetSettings,
    permissions: &PermissionContext,
    op: impl FnOnce(&[Sheet]) -> MutationResult<Vec<Sheet>>,
) -> MutationResult<bool> {
    check_right(settings, permissions, None, EditRight::Structure)?;
    let updated = op(workbook.sheets())?;
    if updated.as_slice() == workbook.sheets() {
        return Ok(false);
    }
    workbook.apply_edit(updated);
    Ok(true)
}

/// Logs the result of an operation and forwards it to the UI.
pub(crate) fn report(
    feedback_writer: &mut EventWriter<SheetOperationFeedback>,
    action: &str,
    target: &str,
    result: MutationResult<bool>,
) {
    match result {
        Ok(true) => {
            let msg = format!("{} applied to '{}'.", action, target);
            info!("{}", msg);
            feedback_writer.write(SheetOperationFeedback {
                message: msg,
                is_error: false,
            });
        }
        Ok(false) => trace!("{} on '{}' changed nothing.", action, target),
        Err(e) => {
            warn!("{} failed for '{}': {}", action, target, e);
            feedback_writer.write(SheetOperationFeedback {
                message: format!("{} failed: {}", action, e),
                is_error: true,
            });
        }
    }
}

/// Rewrites `order_index` as the position in the list.
pub(crate) fn renumber(sheets: &mut [Sheet]) {
    for (i, sheet) in sheets.iter_mut().enumerate() {
        sheet.order_index = i;
    }
}

pub(crate) fn check_index(what: &'static str, index: usize, len: usize) -> MutationResult<()> {
    if index < len {
        Ok(())
    } else {
        Err(MutationError::IndexOutOfRange { what, index, len })
    }
}

/// Pads rows shorter than the schema with `Null`, so every defined column has a cell.
pub(crate) fn pad_rows_to_schema(sheet: &mut Sheet) {
    let width = sheet.columns.len();
    for row in sheet.grid.iter_mut() {
        if row.len() < width {
            row.resize(width, CellValue::Null);
        }
    }
}

/// Moves one element; both indices must be in range.
pub(crate) fn move_item<T>(items: &mut Vec<T>, old_index: usize, new_index: usize) {
    let item = items.remove(old_index);
    items.insert(new_index, item);
}

/// Where index `i` lands after moving `old_index` to `new_index`.
pub(crate) fn moved_position(i: usize, old_index: usize, new_index: usize) -> usize {
    if i == old_index {
        new_index
    } else if old_index < new_index && i > old_index && i <= new_index {
        i - 1
    } else if new_index < old_index && i >= new_index && i < old_index {
        i + 1
    } else {
        i
    }
}

/// Where index `i` lands after removing the `removed` indices; `None` when `i` itself is removed.
pub(crate) fn removed_position(i: usize, removed: &BTreeSet<usize>) -> Option<usize> {
    if removed.contains(&i) {
        None
    } else {
        Some(i - removed.range(..i).count())
    }
}

/// Re-keys cell metadata and merge anchors after a row or column index remap.
/// Entries whose index maps to `None` are dropped.
pub(crate) fn remap_formatting(
    sheet: &mut Sheet,
    axis: GridAxis,
    remap: impl Fn(usize) -> Option<usize>,
) {
    sheet.cell_meta = std::mem::take(&mut sheet.cell_meta)
        .into_iter()
        .filter_map(|(key, format)| {
            let key = match axis {
                GridAxis::Row => CellMetaKey::new(remap(key.row)?, key.col),
                GridAxis::Column => CellMetaKey::new(key.row, remap(key.col)?),
            };
            Some((key, format))
        })
        .collect();
    sheet.merged_cells = std::mem::take(&mut sheet.merged_cells)
        .into_iter()
        .filter_map(|m| match axis {
            GridAxis::Row => Some(MergeRect { row: remap(m.row)?, ..m }),
            GridAxis::Column => Some(MergeRect { col: remap(m.col)?, ..m }),
        })
        .collect();
}

/// Re-keys cell metadata after rows or columns at `removed` are deleted, and shrinks
/// merges by the deleted lines they covered. Merges left with no line are dropped.
pub(crate) fn remove_from_formatting(sheet: &mut Sheet, axis: GridAxis, removed: &BTreeSet<usize>) {
    let merges = std::mem::take(&mut sheet.merged_cells);
    remap_formatting(sheet, axis, |i| removed_position(i, removed));
    sheet.merged_cells = merges
        .into_iter()
        .filter_map(|m| {
            let (start, span) = match axis {
                GridAxis::Row => (m.row, m.rowspan),
                GridAxis::Column => (m.col, m.colspan),
            };
            let covered = removed.range(start..start.saturating_add(span)).count();
            let span = span - covered;
            if span == 0 {
                return None;
            }
            let start = start - removed.range(..start).count();
            Some(match axis {
                GridAxis::Row => MergeRect { row: start, rowspan: span, ..m },
                GridAxis::Column => MergeRect { col: start, colspan: span, ..m },
            })
        })
        .collect();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GridAxis {
    Row,
    Column,
}

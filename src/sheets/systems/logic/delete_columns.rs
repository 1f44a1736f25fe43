// src/sheets/systems/logic/delete_columns.rs
use bevy::prelude::*;
use std::collections::BTreeSet;

use super::{edit_sheet, pad_rows_to_schema, remove_from_formatting, report, EditRight, GridAxis};
use crate::settings::WidgetSettings;
use crate::sheets::{
    definitions::Sheet,
    events::{RequestDeleteColumn, SheetOperationFeedback},
    permissions::PermissionContext,
    resources::Workbook,
};

/// Removes a column definition and, in every row, the cell at that column's current index.
/// Formatting and widths to the right shift left with the cells, and merges covering the
/// column narrow by one. Unknown keys are a no-op.
pub fn delete_column(sheet: &Sheet, column_key: &str) -> Sheet {
    let Some(index) = sheet.column_index(column_key) else {
        trace!("Delete column: key '{}' not present on sheet '{}'.", column_key, sheet.id);
        return sheet.clone();
    };
    let mut updated = sheet.clone();
    pad_rows_to_schema(&mut updated);
    updated.columns.remove(index);
    for row in updated.grid.iter_mut() {
        row.remove(index);
    }
    if index < updated.col_widths.len() {
        updated.col_widths.remove(index);
    }
    remove_from_formatting(&mut updated, GridAxis::Column, &BTreeSet::from([index]));
    updated
}

pub fn handle_delete_column_request(
    mut events: EventReader<RequestDeleteColumn>,
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
            |sheet| Ok(delete_column(sheet, &event.column_key)),
        );
        let target = format!("{}/{}", event.sheet_id, event.column_key);
        report(&mut feedback_writer, "Delete column", &target, result);
    }
}

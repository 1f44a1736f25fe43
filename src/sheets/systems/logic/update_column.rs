// src/sheets/systems/logic/update_column.rs
use bevy::prelude::*;

use super::update_dimensions::validate_size;
use super::{edit_sheet, report, EditRight};
use crate::settings::WidgetSettings;
use crate::sheets::{
    definitions::{ColumnUpdate, Sheet},
    error::MutationResult,
    events::{RequestUpdateColumn, SheetOperationFeedback},
    permissions::PermissionContext,
    resources::Workbook,
};

/// Applies a partial update to the column with `column_key`. Unknown keys are a no-op.
/// A width in the update is also written to `col_widths`.
pub fn update_column(sheet: &Sheet, column_key: &str, update: &ColumnUpdate) -> MutationResult<Sheet> {
    let Some(index) = sheet.column_index(column_key) else {
        trace!("Update column: key '{}' not present on sheet '{}'.", column_key, sheet.id);
        return Ok(sheet.clone());
    };
    if let Some(width) = update.width {
        validate_size(width)?;
    }
    let mut updated = sheet.clone();
    updated.columns[index].apply(update);
    if let Some(width) = update.width {
        if let Some(slot) = updated.col_widths.get_mut(index) {
            *slot = width;
        }
    }
    Ok(updated)
}

pub fn handle_update_column_request(
    mut events: EventReader<RequestUpdateColumn>,
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
            |sheet| update_column(sheet, &event.column_key, &event.update),
        );
        let target = format!("{}/{}", event.sheet_id, event.column_key);
        report(&mut feedback_writer, "Update column", &target, result);
    }
}

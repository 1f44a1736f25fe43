// src/sheets/systems/logic/add_row.rs
use bevy::prelude::*;

use super::{edit_sheet, report, EditRight};
use crate::settings::WidgetSettings;
use crate::sheets::{
    definitions::{CellValue, Sheet},
    events::{RequestAddRow, SheetOperationFeedback},
    permissions::PermissionContext,
    resources::Workbook,
};

/// Appends one all-`Null` row as wide as the grid (or the schema, if wider).
pub fn add_row(sheet: &Sheet) -> Sheet {
    let width = sheet.column_count().max(sheet.columns.len());
    let mut updated = sheet.clone();
    updated.grid.push(vec![CellValue::Null; width]);
    updated
}

pub fn handle_add_row_request(
    mut events: EventReader<RequestAddRow>,
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
            |sheet| Ok(add_row(sheet)),
        );
        report(&mut feedback_writer, "Add row", &event.sheet_id, result);
    }
}

// src/sheets/systems/logic/add_column.rs
use bevy::prelude::*;
use std::collections::HashSet;

use super::{edit_sheet, report, EditRight};
use crate::settings::WidgetSettings;
use crate::sheets::{
    definitions::{generate_column_key, CellValue, ColumnDataType, ColumnDefinition, Sheet},
    events::{RequestAddColumn, SheetOperationFeedback},
    permissions::PermissionContext,
    resources::Workbook,
};

fn unique_header(sheet: &Sheet) -> String {
    let existing: HashSet<&str> = sheet.columns.iter().map(|c| c.header.as_str()).collect();
    let mut header = "New Column".to_string();
    let mut counter = 1;
    while existing.contains(header.as_str()) {
        header = format!("New Column {}", counter);
        counter += 1;
    }
    header
}

/// Appends a text column with a fresh key and one `Null` cell to every row.
pub fn add_column(sheet: &Sheet, width: f64) -> Sheet {
    let mut key = generate_column_key();
    while sheet.column_index(&key).is_some() {
        key = generate_column_key();
    }
    let mut updated = sheet.clone();
    updated.columns.push(ColumnDefinition::new_basic(
        key,
        unique_header(sheet),
        ColumnDataType::Text,
        width,
    ));
    for row in updated.grid.iter_mut() {
        row.push(CellValue::Null);
    }
    updated
}

pub fn handle_add_column_request(
    mut events: EventReader<RequestAddColumn>,
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
            |sheet| Ok(add_column(sheet, settings.grid.default_column_width)),
        );
        report(&mut feedback_writer, "Add column", &event.sheet_id, result);
    }
}

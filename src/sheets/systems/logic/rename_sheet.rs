// src/sheets/systems/logic/rename_sheet.rs
use bevy::prelude::*;

use super::{edit_sheet, report, EditRight};
use crate::settings::WidgetSettings;
use crate::sheets::{
    definitions::Sheet,
    events::{RequestRenameSheet, RequestSetSheetEditable, SheetOperationFeedback},
    permissions::PermissionContext,
    resources::Workbook,
};

/// Renames a sheet. The name is trimmed; an empty name is allowed.
pub fn rename_sheet(sheet: &Sheet, new_name: &str) -> Sheet {
    Sheet {
        name: new_name.trim().to_string(),
        ..sheet.clone()
    }
}

pub fn set_sheet_editable(sheet: &Sheet, editable: bool) -> Sheet {
    Sheet {
        is_editable: editable,
        ..sheet.clone()
    }
}

pub fn handle_rename_request(
    mut events: EventReader<RequestRenameSheet>,
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
            |sheet| Ok(rename_sheet(sheet, &event.new_name)),
        );
        report(&mut feedback_writer, "Rename sheet", &event.sheet_id, result);
    }
}

pub fn handle_set_sheet_editable_request(
    mut events: EventReader<RequestSetSheetEditable>,
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
            |sheet| Ok(set_sheet_editable(sheet, event.editable)),
        );
        let action = if event.editable {
            "Grant sheet editing"
        } else {
            "Revoke sheet editing"
        };
        report(&mut feedback_writer, action, &event.sheet_id, result);
    }
}

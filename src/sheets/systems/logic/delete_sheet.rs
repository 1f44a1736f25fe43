// src/sheets/systems/logic/delete_sheet.rs
use bevy::prelude::*;

use super::{edit_workbook, renumber, report};
use crate::settings::{DocumentLayout, WidgetSettings};
use crate::sheets::{
    definitions::Sheet,
    error::{MutationError, MutationResult},
    events::{RequestDeleteSheet, SheetOperationFeedback},
    permissions::PermissionContext,
    resources::Workbook,
};

/// Removes a sheet by id and renumbers the survivors. Unknown ids leave the list as is.
pub fn delete_sheet(sheets: &[Sheet], sheet_id: &str) -> Vec<Sheet> {
    let mut updated: Vec<Sheet> = sheets.iter().filter(|s| s.id != sheet_id).cloned().collect();
    renumber(&mut updated);
    updated
}

/// Deletion with the workbook policy applied: the last sheet stays when `forbid_last` is set.
pub fn delete_sheet_checked(
    sheets: &[Sheet],
    sheet_id: &str,
    forbid_last: bool,
) -> MutationResult<Vec<Sheet>> {
    let exists = sheets.iter().any(|s| s.id == sheet_id);
    if exists && forbid_last && sheets.len() < 2 {
        return Err(MutationError::LastSheet);
    }
    Ok(delete_sheet(sheets, sheet_id))
}

pub fn handle_delete_sheet_request(
    mut events: EventReader<RequestDeleteSheet>,
    mut workbook: ResMut<Workbook>,
    settings: Res<WidgetSettings>,
    permissions: Res<PermissionContext>,
    mut feedback_writer: EventWriter<SheetOperationFeedback>,
) {
    for event in events.read() {
        let sheet_name = workbook
            .get_sheet(&event.sheet_id)
            .map_or_else(|| event.sheet_id.clone(), |s| s.name.clone());
        let result = if settings.layout == DocumentLayout::SingleSheet {
            Err(MutationError::SingleSheetLayout)
        } else {
            edit_workbook(&mut workbook, &settings, &permissions, |sheets| {
                delete_sheet_checked(sheets, &event.sheet_id, settings.forbid_last_sheet_delete)
            })
        };
        report(&mut feedback_writer, "Delete sheet", &sheet_name, result);
    }
}

// src/sheets/systems/logic/move_sheet.rs
use bevy::prelude::*;

use super::{check_index, edit_workbook, move_item, renumber, report};
use crate::settings::WidgetSettings;
use crate::sheets::{
    definitions::Sheet,
    error::MutationResult,
    events::{RequestMoveSheet, SheetOperationFeedback},
    permissions::PermissionContext,
    resources::Workbook,
};

/// Moves the sheet at `old_index` to `new_index` and renumbers.
pub fn move_sheet(sheets: &[Sheet], old_index: usize, new_index: usize) -> MutationResult<Vec<Sheet>> {
    check_index("sheet", old_index, sheets.len())?;
    check_index("sheet", new_index, sheets.len())?;
    let mut updated = sheets.to_vec();
    if old_index != new_index {
        move_item(&mut updated, old_index, new_index);
        renumber(&mut updated);
    }
    Ok(updated)
}

pub fn handle_move_sheet_request(
    mut events: EventReader<RequestMoveSheet>,
    mut workbook: ResMut<Workbook>,
    settings: Res<WidgetSettings>,
    permissions: Res<PermissionContext>,
    mut feedback_writer: EventWriter<SheetOperationFeedback>,
) {
    for event in events.read() {
        let target = format!("{} -> {}", event.old_index, event.new_index);
        let result = edit_workbook(&mut workbook, &settings, &permissions, |sheets| {
            move_sheet(sheets, event.old_index, event.new_index)
        });
        report(&mut feedback_writer, "Move sheet", &target, result);
    }
}

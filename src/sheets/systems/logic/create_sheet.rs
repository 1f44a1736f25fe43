// src/sheets/systems/logic/create_sheet.rs
use bevy::prelude::*;
use uuid::Uuid;

use super::{edit_workbook, renumber, report};
use crate::settings::{DocumentLayout, GridConfig, WidgetSettings};
use crate::sheets::{
    definitions::Sheet,
    error::{MutationError, MutationResult},
    events::{RequestAddSheet, SheetOperationFeedback},
    permissions::PermissionContext,
    resources::Workbook,
};

/// `Sheet{N}` where N is one past the highest numeric suffix among `SheetN` names,
/// or the sheet count plus one when no sheet follows that pattern. Suffixes with no
/// successor in `usize` are ignored.
pub fn next_sheet_name(sheets: &[Sheet]) -> String {
    let next = sheets
        .iter()
        .filter_map(|s| s.name.trim().strip_prefix("Sheet"))
        .filter_map(|suffix| suffix.parse::<usize>().ok())
        .filter_map(|n| n.checked_add(1))
        .max()
        .unwrap_or(sheets.len() + 1);
    format!("Sheet{}", next)
}

/// Appends a blank sheet with a fresh id at the end of the list.
pub fn add_sheet(sheets: &[Sheet], grid: &GridConfig) -> Vec<Sheet> {
    let mut updated = sheets.to_vec();
    updated.push(Sheet::blank(
        Uuid::new_v4().to_string(),
        next_sheet_name(sheets),
        sheets.len(),
        grid,
    ));
    renumber(&mut updated);
    updated
}

pub fn handle_add_sheet_request(
    mut events: EventReader<RequestAddSheet>,
    mut workbook: ResMut<Workbook>,
    settings: Res<WidgetSettings>,
    permissions: Res<PermissionContext>,
    mut feedback_writer: EventWriter<SheetOperationFeedback>,
) {
    for _ in events.read() {
        let target = next_sheet_name(workbook.sheets());
        let result: MutationResult<bool> = if settings.layout == DocumentLayout::SingleSheet {
            Err(MutationError::SingleSheetLayout)
        } else {
            edit_workbook(&mut workbook, &settings, &permissions, |sheets| {
                Ok(add_sheet(sheets, &settings.grid))
            })
        };
        report(&mut feedback_writer, "Add sheet", &target, result);
    }
}

// src/sheets/systems/logic/row_labels.rs
//! Row label edits. These touch `row_labels` only, never the grid.

use bevy::prelude::*;

use super::{check_index, edit_sheet, move_item, report, EditRight};
use crate::settings::WidgetSettings;
use crate::sheets::{
    definitions::{Sheet, MAX_ROWS},
    error::MutationResult,
    events::{RequestRowLabelChange, RowLabelChange, SheetOperationFeedback},
    permissions::PermissionContext,
    resources::Workbook,
};

pub fn apply_row_label_change(sheet: &Sheet, change: &RowLabelChange) -> MutationResult<Sheet> {
    let mut updated = sheet.clone();
    let labels = &mut updated.row_labels;
    match change {
        RowLabelChange::Add { label } => labels.push(label.clone()),
        RowLabelChange::Update { index, label } => {
            check_index("row label", *index, MAX_ROWS)?;
            if labels.len() <= *index {
                labels.resize(index + 1, String::new());
            }
            labels[*index] = label.clone();
        }
        RowLabelChange::Delete { index } => {
            check_index("row label", *index, labels.len())?;
            labels.remove(*index);
        }
        RowLabelChange::Reorder {
            old_index,
            new_index,
        } => {
            check_index("row label", *old_index, labels.len())?;
            check_index("row label", *new_index, labels.len())?;
            move_item(labels, *old_index, *new_index);
        }
    }
    Ok(updated)
}

pub fn handle_row_label_change(
    mut events: EventReader<RequestRowLabelChange>,
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
            |sheet| apply_row_label_change(sheet, &event.change),
        );
        let action = match event.change {
            RowLabelChange::Add { .. } => "Add row label",
            RowLabelChange::Update { .. } => "Update row label",
            RowLabelChange::Delete { .. } => "Delete row label",
            RowLabelChange::Reorder { .. } => "Reorder row labels",
        };
        report(&mut feedback_writer, action, &event.sheet_id, result);
    }
}

// src/sheets/systems/logic/delete_rows.rs
use bevy::prelude::*;
use std::collections::BTreeSet;

use super::{check_index, edit_sheet, remove_from_formatting, report, EditRight, GridAxis};
use crate::settings::WidgetSettings;
use crate::sheets::{
    definitions::Sheet,
    error::MutationResult,
    events::{RequestDeleteRows, SheetOperationFeedback},
    permissions::PermissionContext,
    resources::Workbook,
};

/// Removes the rows at `row_indices` (duplicates ignored). Heights, labels, formatting
/// and merge anchors below a removed row move up with it; merges spanning a removed
/// row get shorter. Any out-of-range index rejects the whole request.
pub fn delete_rows(sheet: &Sheet, row_indices: &[usize]) -> MutationResult<Sheet> {
    let removed: BTreeSet<usize> = row_indices.iter().copied().collect();
    for &index in &removed {
        check_index("row", index, sheet.row_count())?;
    }
    if removed.is_empty() {
        return Ok(sheet.clone());
    }
    let keep = |i: &usize| !removed.contains(i);
    let mut updated = sheet.clone();
    updated.grid = retain_indexed(&sheet.grid, keep);
    updated.row_heights = retain_indexed(&sheet.row_heights, keep);
    updated.row_labels = retain_indexed(&sheet.row_labels, keep);
    remove_from_formatting(&mut updated, GridAxis::Row, &removed);
    Ok(updated)
}

fn retain_indexed<T: Clone>(items: &[T], keep: impl Fn(&usize) -> bool) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter(|(i, _)| keep(i))
        .map(|(_, item)| item.clone())
        .collect()
}

pub fn handle_delete_rows_request(
    mut events: EventReader<RequestDeleteRows>,
    mut workbook: ResMut<Workbook>,
    settings: Res<WidgetSettings>,
    permissions: Res<PermissionContext>,
    mut feedback_writer: EventWriter<SheetOperationFeedback>,
) {
    for event in events.read() {
        if event.row_indices.is_empty() {
            continue;
        }
        let result = edit_sheet(
            &mut workbook,
            &settings,
            &permissions,
            &event.sheet_id,
            EditRight::Structure,
            |sheet| delete_rows(sheet, &event.row_indices),
        );
        let target = format!("{} ({} row(s))", event.sheet_id, event.row_indices.len());
        report(&mut feedback_writer, "Delete rows", &target, result);
    }
}

// src/sheets/systems/io/host_sync.rs
use bevy::prelude::*;
use uuid::Uuid;

use super::parsers::{parse_single_sheet, parse_workbook};
use super::preview;
use crate::settings::{DocumentLayout, WidgetSettings};
use crate::sheets::{
    definitions::Sheet,
    events::{HostValueRefreshed, WorkbookLoadedFromHost},
    resources::Workbook,
    save_state::{HostRefreshDecision, SaveCoordinator},
};

/// Parses a host value according to the document layout.
/// A single-sheet document always yields exactly one sheet.
pub fn sheets_from_host_value(value: Option<&str>, settings: &WidgetSettings) -> Vec<Sheet> {
    let raw = value.unwrap_or_default();
    let preview_chars = settings.log_preview_chars;
    match settings.layout {
        DocumentLayout::MultiSheet => parse_workbook(raw, &settings.grid, preview_chars),
        DocumentLayout::SingleSheet => {
            let sheet = parse_single_sheet(raw, &settings.grid, preview_chars).unwrap_or_else(|| {
                Sheet::blank(
                    Uuid::new_v4().to_string(),
                    "Sheet1".to_string(),
                    0,
                    &settings.grid,
                )
            });
            vec![sheet]
        }
    }
}

/// Replaces the model from the host unless local edits are outstanding or the
/// value is an echo of what was last loaded or written.
pub fn handle_host_value_refreshed(
    mut events: EventReader<HostValueRefreshed>,
    mut workbook: ResMut<Workbook>,
    mut coordinator: ResMut<SaveCoordinator>,
    settings: Res<WidgetSettings>,
    mut loaded_writer: EventWriter<WorkbookLoadedFromHost>,
) {
    for event in events.read() {
        let value = event.value.as_deref();
        match coordinator.review_host_value(value) {
            HostRefreshDecision::Accept => {}
            HostRefreshDecision::IgnoredLocalEdits => {
                debug!("Host sync: refresh ignored while local edits are pending.");
                continue;
            }
            HostRefreshDecision::Duplicate => {
                trace!("Host sync: refresh matches the last exchanged value.");
                continue;
            }
            HostRefreshDecision::IgnoredDetached => continue,
        }

        let sheets = sheets_from_host_value(value, &settings);
        if sheets.is_empty() {
            info!(
                "Host sync: no sheets found in host value '{}'.",
                preview(value.unwrap_or_default(), settings.log_preview_chars)
            );
        }
        let sheet_count = sheets.len();
        workbook.replace_from_host(sheets);
        coordinator.on_host_loaded(value);
        loaded_writer.write(WorkbookLoadedFromHost { sheet_count });
        info!("Host sync: loaded {} sheet(s).", sheet_count);
    }
}

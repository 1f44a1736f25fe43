// src/sheets/systems/io/autosave.rs
//! Systems driving the `SaveCoordinator` from the frame loop.

use bevy::prelude::*;

use super::save::{serialize_single_sheet, serialize_workbook, EMPTY_SHEET_JSON};
use crate::settings::{DocumentLayout, WidgetSettings};
use crate::sheets::{
    events::{SaveStatusChanged, WidgetUnmounted},
    host::{run_write_sequence, HostLink},
    resources::Workbook,
    save_state::{SaveCoordinator, SaveStatus},
};

/// Serializes the model in the host document shape for the configured layout.
pub fn serialize_for_host(workbook: &Workbook, layout: DocumentLayout) -> String {
    match layout {
        DocumentLayout::MultiSheet => serialize_workbook(workbook.sheets()),
        DocumentLayout::SingleSheet => workbook
            .sheets()
            .first()
            .map_or_else(|| EMPTY_SHEET_JSON.to_string(), serialize_single_sheet),
    }
}

/// Reports mutations to the coordinator. Host loads never change the generation.
pub fn track_local_edits(workbook: Res<Workbook>, mut coordinator: ResMut<SaveCoordinator>) {
    if workbook.is_changed() {
        coordinator.observe_generation(workbook.edit_generation());
    }
}

/// Advances the debounce and, when it fires, runs the write-then-commit sequence.
pub fn run_autosave(
    time: Res<Time>,
    workbook: Res<Workbook>,
    settings: Res<WidgetSettings>,
    mut coordinator: ResMut<SaveCoordinator>,
    mut host: Option<ResMut<HostLink>>,
) {
    let Some(generation) = coordinator.tick(time.delta()) else {
        return;
    };
    let json = serialize_for_host(&workbook, settings.layout);
    debug!(
        "Autosave: writing edit generation {} ({} bytes).",
        generation,
        json.len()
    );
    let outcome = run_write_sequence(host.as_mut().map(|h| h.boundary_mut()), &json);
    coordinator.finish_write(&json, outcome);
}

/// Emits `SaveStatusChanged` whenever the visible status differs from last frame.
pub fn publish_save_status(
    coordinator: Res<SaveCoordinator>,
    mut last_status: Local<SaveStatus>,
    mut status_writer: EventWriter<SaveStatusChanged>,
) {
    let status = coordinator.status();
    if status != *last_status {
        trace!("Autosave: status {:?} -> {:?}.", *last_status, status);
        *last_status = status;
        status_writer.write(SaveStatusChanged { status });
    }
}

/// Detaches the coordinator when the widget unmounts or the app exits.
pub fn handle_teardown(
    mut unmounted: EventReader<WidgetUnmounted>,
    mut exits: EventReader<AppExit>,
    mut coordinator: ResMut<SaveCoordinator>,
) {
    let unmounted = unmounted.read().count() > 0;
    let exiting = exits.read().count() > 0;
    if unmounted || exiting {
        info!("Autosave: widget torn down; pending timers cancelled.");
        coordinator.teardown();
    }
}

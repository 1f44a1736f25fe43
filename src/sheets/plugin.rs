// src/sheets/plugin.rs
use bevy::prelude::*;

use super::events::{
    HostValueRefreshed, RequestAddColumn, RequestAddRow, RequestAddSheet, RequestDeleteColumn,
    RequestDeleteRows, RequestDeleteSheet, RequestMoveSheet, RequestRenameSheet,
    RequestReorderColumn, RequestRowLabelChange, RequestSetMergedCells, RequestSetSheetEditable,
    RequestUpdateColumn, RequestUpdateColumnWidth, RequestUpdateRowHeight, SaveStatusChanged,
    SheetOperationFeedback, UpdateCellEvent, UpdateCellFormatEvent, UpdateCellMetaEvent,
    UpdateGridEvent, WidgetUnmounted, WorkbookLoadedFromHost,
};
use super::permissions::PermissionContext;
use super::resources::Workbook;
use super::save_state::{SaveCoordinator, SaveTiming};
use super::systems;
use crate::settings::WidgetSettings;

// Define system sets for ordering
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SheetSystemSet {
    HostSync,     // Host values replacing the model
    ApplyChanges, // Mutation requests modifying the workbook
    Persistence,  // Debounce, host writes and status
}

/// Plugin wiring one data-grid widget: the model, its permissions and the autosave loop.
///
/// The host is linked by inserting a `HostLink` resource; until then saves fail
/// with `WriteError::NotReady`.
#[derive(Default)]
pub struct SheetsPlugin {
    pub settings: WidgetSettings,
}

impl SheetsPlugin {
    pub fn new(settings: WidgetSettings) -> Self {
        Self { settings }
    }
}

impl Plugin for SheetsPlugin {
    fn build(&self, app: &mut App) {
        // Configure system sets for ordering
        app.configure_sets(
            Update,
            (
                SheetSystemSet::HostSync,
                SheetSystemSet::ApplyChanges,
                SheetSystemSet::Persistence,
            )
                .chain(),
        );

        // --- Resource Initialization ---
        let timing = SaveTiming::from(&self.settings.autosave);
        app.insert_resource(self.settings.clone())
            .init_resource::<Workbook>()
            .init_resource::<PermissionContext>()
            .insert_resource(SaveCoordinator::new(timing));
        if !app.world().contains_resource::<Time>() {
            app.init_resource::<Time>();
        }

        // --- Event Registration ---
        app.add_event::<HostValueRefreshed>()
            .add_event::<WidgetUnmounted>()
            .add_event::<RequestAddSheet>()
            .add_event::<RequestDeleteSheet>()
            .add_event::<RequestRenameSheet>()
            .add_event::<RequestMoveSheet>()
            .add_event::<RequestSetSheetEditable>()
            .add_event::<RequestAddColumn>()
            .add_event::<RequestDeleteColumn>()
            .add_event::<RequestReorderColumn>()
            .add_event::<RequestUpdateColumn>()
            .add_event::<RequestAddRow>()
            .add_event::<RequestDeleteRows>()
            .add_event::<RequestRowLabelChange>()
            .add_event::<UpdateGridEvent>()
            .add_event::<UpdateCellEvent>()
            .add_event::<UpdateCellMetaEvent>()
            .add_event::<UpdateCellFormatEvent>()
            .add_event::<RequestUpdateColumnWidth>()
            .add_event::<RequestUpdateRowHeight>()
            .add_event::<RequestSetMergedCells>()
            .add_event::<SheetOperationFeedback>()
            .add_event::<WorkbookLoadedFromHost>()
            .add_event::<SaveStatusChanged>();

        // --- Update Systems (Organized into Sets) ---
        app.add_systems(
            Update,
            systems::io::handle_host_value_refreshed.in_set(SheetSystemSet::HostSync),
        );
        app.add_systems(
            Update,
            (
                (
                    systems::logic::handle_add_sheet_request,
                    systems::logic::handle_delete_sheet_request,
                    systems::logic::handle_rename_request,
                    systems::logic::handle_move_sheet_request,
                    systems::logic::handle_set_sheet_editable_request,
                    systems::logic::handle_add_column_request,
                    systems::logic::handle_delete_column_request,
                    systems::logic::handle_reorder_column_request,
                    systems::logic::handle_update_column_request,
                )
                    .chain(),
                (
                    systems::logic::handle_add_row_request,
                    systems::logic::handle_delete_rows_request,
                    systems::logic::handle_row_label_change,
                    systems::logic::handle_grid_update,
                    systems::logic::handle_cell_update,
                    systems::logic::handle_cell_meta_update,
                    systems::logic::handle_cell_format_update,
                    systems::logic::handle_update_column_width,
                    systems::logic::handle_update_row_height,
                    systems::logic::handle_set_merged_cells,
                )
                    .chain(),
            )
                .chain()
                .in_set(SheetSystemSet::ApplyChanges),
        );
        app.add_systems(
            Update,
            (
                systems::io::handle_teardown,
                systems::io::track_local_edits,
                systems::io::run_autosave,
                systems::io::publish_save_status,
            )
                .chain()
                .in_set(SheetSystemSet::Persistence),
        );

        info!(
            "SheetsPlugin initialized ({:?} layout, {:?} permissions).",
            self.settings.layout, self.settings.permission_model
        );
    }
}

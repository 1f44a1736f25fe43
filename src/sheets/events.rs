// src/sheets/events.rs
use bevy::prelude::Event;

use super::definitions::{CellFormat, CellMeta, CellValue, ColumnUpdate, MergeRect};
use super::save_state::SaveStatus;

// --- Host Inbound ---

/// The host refreshed the bound attribute (initial load or an out-of-band change).
/// `None` means the attribute is absent or uninitialized.
#[derive(Event, Debug, Clone)]
pub struct HostValueRefreshed {
    pub value: Option<String>,
}

/// The widget is going away; pending timers must not fire afterwards.
#[derive(Event, Debug, Clone)]
pub struct WidgetUnmounted;

// --- Sheet Structure ---

#[derive(Event, Debug, Clone)]
pub struct RequestAddSheet;

#[derive(Event, Debug, Clone)]
pub struct RequestDeleteSheet {
    pub sheet_id: String,
}

#[derive(Event, Debug, Clone)]
pub struct RequestRenameSheet {
    pub sheet_id: String,
    pub new_name: String,
}

#[derive(Event, Debug, Clone)]
pub struct RequestMoveSheet {
    pub old_index: usize,
    pub new_index: usize,
}

#[derive(Event, Debug, Clone)]
pub struct RequestSetSheetEditable {
    pub sheet_id: String,
    pub editable: bool,
}

// --- Columns & Rows ---

#[derive(Event, Debug, Clone)]
pub struct RequestAddColumn {
    pub sheet_id: String,
}

#[derive(Event, Debug, Clone)]
pub struct RequestDeleteColumn {
    pub sheet_id: String,
    pub column_key: String,
}

#[derive(Event, Debug, Clone)]
pub struct RequestReorderColumn {
    pub sheet_id: String,
    pub old_index: usize,
    pub new_index: usize,
}

#[derive(Event, Debug, Clone)]
pub struct RequestUpdateColumn {
    pub sheet_id: String,
    pub column_key: String,
    pub update: ColumnUpdate,
}

#[derive(Event, Debug, Clone)]
pub struct RequestAddRow {
    pub sheet_id: String,
}

#[derive(Event, Debug, Clone)]
pub struct RequestDeleteRows {
    pub sheet_id: String,
    pub row_indices: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowLabelChange {
    Add { label: String },
    Update { index: usize, label: String },
    Delete { index: usize },
    Reorder { old_index: usize, new_index: usize },
}

#[derive(Event, Debug, Clone)]
pub struct RequestRowLabelChange {
    pub sheet_id: String,
    pub change: RowLabelChange,
}

// --- Cell Content & Formatting ---

/// Wholesale replacement of a sheet's grid, as emitted by the grid component.
#[derive(Event, Debug, Clone)]
pub struct UpdateGridEvent {
    pub sheet_id: String,
    pub grid: Vec<Vec<CellValue>>,
}

#[derive(Event, Debug, Clone)]
pub struct UpdateCellEvent {
    pub sheet_id: String,
    pub row: usize,
    pub col: usize,
    pub value: CellValue,
}

/// Wholesale replacement of a sheet's cell metadata.
#[derive(Event, Debug, Clone)]
pub struct UpdateCellMetaEvent {
    pub sheet_id: String,
    pub cell_meta: CellMeta,
}

#[derive(Event, Debug, Clone)]
pub struct UpdateCellFormatEvent {
    pub sheet_id: String,
    pub row: usize,
    pub col: usize,
    pub format: CellFormat,
}

#[derive(Event, Debug, Clone)]
pub struct RequestUpdateColumnWidth {
    pub sheet_id: String,
    pub column_index: usize,
    pub width: f64,
}

#[derive(Event, Debug, Clone)]
pub struct RequestUpdateRowHeight {
    pub sheet_id: String,
    pub row_index: usize,
    pub height: f64,
}

#[derive(Event, Debug, Clone)]
pub struct RequestSetMergedCells {
    pub sheet_id: String,
    pub merged_cells: Vec<MergeRect>,
}

// --- Outbound ---

#[derive(Event, Debug, Clone)]
pub struct SheetOperationFeedback {
    pub message: String,
    pub is_error: bool,
}

/// The model was replaced from the host; selection state in views should be reset.
#[derive(Event, Debug, Clone)]
pub struct WorkbookLoadedFromHost {
    pub sheet_count: usize,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveStatusChanged {
    pub status: SaveStatus,
}

// src/sheets/mod.rs

// --- Public Interface ---
pub mod definitions;
pub mod error;
pub mod events;
pub mod host;
pub mod permissions;
pub mod plugin;
pub mod resources;
pub mod save_state;
pub mod systems;

// Re-export the types a host integration needs
pub use definitions::{CellFormat, CellValue, ColumnDataType, ColumnDefinition, Sheet};
pub use error::{InvokeError, MutationError, WriteError};
pub use host::{HostBoundary, HostLink, MemoryHost, SaveOutcome};
pub use permissions::{PermissionContext, PermissionLevel, PermissionModel};
pub use plugin::{SheetSystemSet, SheetsPlugin};
pub use resources::Workbook;
pub use save_state::{SaveCoordinator, SaveStatus};

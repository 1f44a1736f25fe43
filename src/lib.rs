// src/lib.rs
//! Data-grid widget core: host JSON normalization, permissions, sheet
//! mutations and a debounced write-then-commit autosave loop, packaged as a
//! Bevy plugin.

pub mod settings;
pub mod sheets;

pub use settings::WidgetSettings;
pub use sheets::SheetsPlugin;

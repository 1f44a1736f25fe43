// src/cli/mod.rs
// Offline tools for inspecting and repairing stored grid documents

pub mod inspect;
pub mod normalize;
pub mod settings;

use clap::{Args, Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};

use datagrid_sync::settings::{
    io::{load_settings_from_file, resolve_settings_path},
    DocumentLayout,
};
use datagrid_sync::WidgetSettings;

#[derive(Parser)]
#[command(name = "datagrid-sync")]
#[command(about = "Normalize and inspect data-grid documents stored by the host platform", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the normalized document exactly as the widget would save it
    Normalize {
        /// Path to a file holding the raw host value
        file: PathBuf,
        #[command(flatten)]
        options: DocumentOptions,
    },

    /// Print a per-sheet summary of a document
    Inspect {
        /// Path to a file holding the raw host value
        file: PathBuf,
        #[command(flatten)]
        options: DocumentOptions,
    },

    /// Print the effective widget settings, optionally saving them back
    Settings {
        /// Write the effective settings (overrides included) to the settings file
        #[arg(long)]
        save: bool,
        #[command(flatten)]
        options: DocumentOptions,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct DocumentOptions {
    /// Treat the document as a single sheet object instead of an array of sheets
    #[arg(long)]
    pub single: bool,
    /// Override the minimum row count
    #[arg(long)]
    pub min_rows: Option<usize>,
    /// Override the minimum column count
    #[arg(long)]
    pub min_cols: Option<usize>,
    /// Settings file (defaults to the per-user config location)
    #[arg(long)]
    pub settings: Option<PathBuf>,
}

impl DocumentOptions {
    pub fn settings_path(&self) -> io::Result<PathBuf> {
        resolve_settings_path(self.settings.as_deref())
    }

    /// Settings from file, with command-line overrides applied on top.
    pub fn resolve_settings(&self) -> io::Result<WidgetSettings> {
        let mut settings = load_settings_from_file(&self.settings_path()?)?;
        if self.single {
            settings.layout = DocumentLayout::SingleSheet;
        }
        if let Some(rows) = self.min_rows {
            settings.grid.min_rows = rows;
        }
        if let Some(cols) = self.min_cols {
            settings.grid.min_cols = cols;
        }
        Ok(settings)
    }
}

pub fn read_document(path: &Path) -> io::Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        io::Error::new(
            e.kind(),
            format!("failed to read document '{}': {}", path.display(), e),
        )
    })
}

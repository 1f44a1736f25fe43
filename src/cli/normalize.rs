// src/cli/normalize.rs
use std::io;
use std::path::Path;

use datagrid_sync::sheets::resources::Workbook;
use datagrid_sync::sheets::systems::io::{autosave::serialize_for_host, host_sync::sheets_from_host_value};

use super::{read_document, DocumentOptions};

pub fn run(file: &Path, options: &DocumentOptions) -> io::Result<()> {
    let settings = options.resolve_settings()?;
    let raw = read_document(file)?;

    let mut workbook = Workbook::default();
    workbook.replace_from_host(sheets_from_host_value(Some(&raw), &settings));
    println!("{}", serialize_for_host(&workbook, settings.layout));
    Ok(())
}

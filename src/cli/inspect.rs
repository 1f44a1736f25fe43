// src/cli/inspect.rs
use std::io;
use std::path::Path;

use datagrid_sync::sheets::systems::io::host_sync::sheets_from_host_value;

use super::{read_document, DocumentOptions};

pub fn run(file: &Path, options: &DocumentOptions) -> io::Result<()> {
    let settings = options.resolve_settings()?;
    let raw = read_document(file)?;
    let sheets = sheets_from_host_value(Some(&raw), &settings);

    println!("=== {} ===\n", file.display());
    if sheets.is_empty() {
        println!("No sheets found.");
        return Ok(());
    }

    println!(
        "{:<6} {:<24} {:<10} {:<10} {:<8} {:<8} {}",
        "Order", "Name", "Rows", "Columns", "Schema", "Styled", "Editable"
    );
    println!("{}", "-".repeat(80));
    for sheet in &sheets {
        let visible = sheet.visible_row_count(settings.row_labels_limit_visible_rows);
        let rows = if visible == sheet.row_count() {
            sheet.row_count().to_string()
        } else {
            format!("{}/{}", visible, sheet.row_count())
        };
        println!(
            "{:<6} {:<24} {:<10} {:<10} {:<8} {:<8} {}",
            sheet.order_index,
            sheet.name,
            rows,
            sheet.column_count(),
            sheet.columns.len(),
            sheet.cell_meta.len(),
            sheet.is_editable
        );
        for (i, column) in sheet.columns.iter().enumerate() {
            println!(
                "         {:<4} {:<20} {:<10}{}",
                i,
                sheet.column_header(i),
                column.data_type.as_str(),
                if column.read_only { " (read-only)" } else { "" }
            );
        }
    }
    Ok(())
}

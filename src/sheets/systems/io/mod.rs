// src/sheets/systems/io/mod.rs

// --- Submodule Declarations ---
pub mod autosave;
pub mod host_sync;
pub mod parsers;
pub mod save;

// --- Shared Helper Functions ---

/// First `max_chars` characters of a raw host value, for log messages.
pub fn preview(raw: &str, max_chars: usize) -> String {
    match raw.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}... ({} bytes total)", &raw[..cut], raw.len()),
        None => raw.to_string(),
    }
}

// --- Public Re-exports for Plugin ---
pub use autosave::{handle_teardown, publish_save_status, run_autosave, track_local_edits};
pub use host_sync::handle_host_value_refreshed;
pub use parsers::{parse_single_sheet, parse_workbook};
pub use save::{serialize_single_sheet, serialize_workbook};

#[cfg(test)]
mod tests {
    use super::preview;

    #[test]
    fn preview_cuts_on_char_boundaries() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("héllo wörld", 4), "héll... (13 bytes total)");
    }
}

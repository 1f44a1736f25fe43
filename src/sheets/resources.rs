// src/sheets/resources.rs
use bevy::prelude::*;

use super::definitions::Sheet;

/// The in-memory model owned by one widget instance.
///
/// Local mutations go through `apply_edit`, which bumps the edit generation the
/// autosave coordinator watches. Host loads go through `replace_from_host`, which
/// does not, so a freshly loaded document is never mistaken for a user edit.
#[derive(Resource, Default, Debug)]
pub struct Workbook {
    sheets: Vec<Sheet>,
    active_sheet: Option<String>,
    edit_generation: u64,
    loaded: bool,
}

impl Workbook {
    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn get_sheet(&self, sheet_id: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.id == sheet_id)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn edit_generation(&self) -> u64 {
        self.edit_generation
    }

    pub fn active_sheet_id(&self) -> Option<&str> {
        self.active_sheet.as_deref()
    }

    pub fn active_sheet(&self) -> Option<&Sheet> {
        self.active_sheet.as_deref().and_then(|id| self.get_sheet(id))
    }

    /// Selects a sheet for display; unknown ids are ignored.
    pub fn set_active_sheet(&mut self, sheet_id: &str) -> bool {
        if self.get_sheet(sheet_id).is_some() {
            self.active_sheet = Some(sheet_id.to_string());
            true
        } else {
            warn!("Workbook: cannot activate unknown sheet '{}'.", sheet_id);
            false
        }
    }

    /// Replaces the model with a freshly parsed host document.
    pub fn replace_from_host(&mut self, sheets: Vec<Sheet>) {
        self.sheets = sheets;
        self.loaded = true;
        self.repair_active_sheet();
        trace!("Workbook: loaded {} sheet(s) from host.", self.sheets.len());
    }

    /// Replaces the model with the result of a local mutation.
    pub fn apply_edit(&mut self, sheets: Vec<Sheet>) {
        self.sheets = sheets;
        self.edit_generation += 1;
        self.repair_active_sheet();
    }

    /// Keeps the active selection if the sheet survived, otherwise falls back to the first.
    fn repair_active_sheet(&mut self) {
        let still_there = self
            .active_sheet
            .as_deref()
            .is_some_and(|id| self.sheets.iter().any(|s| s.id == id));
        if !still_there {
            self.active_sheet = self.sheets.first().map(|s| s.id.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GridConfig;

    fn sheet(id: &str) -> Sheet {
        Sheet::blank(id.into(), id.into(), 0, &GridConfig::default())
    }

    #[test]
    fn host_loads_do_not_count_as_edits() {
        let mut wb = Workbook::default();
        wb.replace_from_host(vec![sheet("a")]);
        assert_eq!(wb.edit_generation(), 0);
        assert!(wb.is_loaded());
        wb.apply_edit(vec![sheet("a"), sheet("b")]);
        assert_eq!(wb.edit_generation(), 1);
    }

    #[test]
    fn active_sheet_survives_or_falls_back() {
        let mut wb = Workbook::default();
        wb.replace_from_host(vec![sheet("a"), sheet("b")]);
        assert_eq!(wb.active_sheet_id(), Some("a"));
        assert!(wb.set_active_sheet("b"));
        assert!(!wb.set_active_sheet("zzz"));
        wb.apply_edit(vec![sheet("a"), sheet("b")]);
        assert_eq!(wb.active_sheet_id(), Some("b"));
        wb.apply_edit(vec![sheet("a")]);
        assert_eq!(wb.active_sheet_id(), Some("a"));
        wb.apply_edit(Vec::new());
        assert_eq!(wb.active_sheet_id(), None);
    }
}

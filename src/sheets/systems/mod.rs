// src/sheets/systems/mod.rs

pub mod io; // Host sync, parsing, serialization and autosave
pub mod logic; // Sheet mutation operations and their request handlers

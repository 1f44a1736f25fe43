// src/cli/settings.rs
use std::io;

use datagrid_sync::settings::io::save_settings_to_file;

use super::DocumentOptions;

pub fn run(save: bool, options: &DocumentOptions) -> io::Result<()> {
    let path = options.settings_path()?;
    let settings = options.resolve_settings()?;
    let json = serde_json::to_string_pretty(&settings).map_err(io::Error::other)?;

    println!("# {}", path.display());
    println!("{}", json);
    if save {
        save_settings_to_file(&settings, &path)?;
        println!("Saved.");
    }
    Ok(())
}

// src/main.rs

use bevy::{
    log::{Level, LogPlugin},
    prelude::*,
};
use clap::Parser;

mod cli;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    // Only the log subscriber is needed; the app itself never runs a frame.
    App::new().add_plugins(LogPlugin {
        level: Level::WARN,
        filter: "datagrid_sync=info".to_string(),
        ..default()
    });

    let result = match &cli.command {
        Commands::Normalize { file, options } => cli::normalize::run(file, options),
        Commands::Inspect { file, options } => cli::inspect::run(file, options),
        Commands::Settings { save, options } => cli::settings::run(*save, options),
    };

    if let Err(e) = result {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

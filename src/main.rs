//! Rhythm chart editor CLI
//!
//! Command-line interface for editing and previewing rhythm game charts.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rhythm_chart::cli::{commands, Cli, Commands};
use rhythm_chart::config::EditorConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Rhythm Chart Editor v{}", env!("CARGO_PKG_VERSION"));

    let config = EditorConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Some(cmd) => handle_command(&config, cmd),
        None => {
            println!("Rhythm Chart Editor v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(config: &EditorConfig, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::New { path, bpm } => commands::new_project(config, &path, bpm),
        Commands::Info { path } => commands::show_info(config, &path),
        Commands::AddNote { path, lane, row, to } => {
            commands::add_note(config, &path, lane, row, to)
        }
        Commands::RemoveNote { path, lane, row } => {
            commands::remove_note(config, &path, lane, row)
        }
        Commands::SetBpm { path, bpm } => commands::set_bpm(config, &path, bpm),
        Commands::Song { path, file, clear } => {
            if file.is_none() && !clear {
                anyhow::bail!("pass a song file or --clear");
            }
            commands::set_song(config, &path, file.as_deref())
        }
        Commands::Export { path, output } => commands::export(config, &path, output.as_deref()),
        Commands::Preview { path, duration } => commands::preview(config, &path, duration),
    }
}

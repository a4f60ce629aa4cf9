//! CLI Module
//!
//! Command-line host for editing chart projects stored as directories.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Rhythm chart editor - place notes, export previews, dry-run playback
#[derive(Parser, Debug)]
#[command(name = "rhythm-chart")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Editor configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new, empty chart project
    #[command(name = "new")]
    New {
        /// Path for the new project directory
        path: PathBuf,

        /// Tempo in beats per minute (defaults to the configured tempo)
        #[arg(long)]
        bpm: Option<f64>,
    },

    /// Print a summary of a project
    #[command(name = "info")]
    Info {
        /// Path to the project
        path: PathBuf,
    },

    /// Place a note; with --to the note is sustained up to that row
    #[command(name = "add-note")]
    AddNote {
        /// Path to the project
        path: PathBuf,

        /// Lane index (0-based)
        lane: usize,

        /// Row index (0 is the bottom of the chart)
        row: u32,

        /// Second endpoint of a long note
        #[arg(long)]
        to: Option<u32>,
    },

    /// Delete the note covering a cell
    #[command(name = "remove-note")]
    RemoveNote {
        /// Path to the project
        path: PathBuf,

        /// Lane index (0-based)
        lane: usize,

        /// Any row covered by the note
        row: u32,
    },

    /// Change the tempo
    #[command(name = "set-bpm")]
    SetBpm {
        /// Path to the project
        path: PathBuf,

        /// New tempo in beats per minute
        bpm: f64,
    },

    /// Attach a song file to the project, or detach it
    #[command(name = "song")]
    Song {
        /// Path to the project
        path: PathBuf,

        /// Audio file to attach
        #[arg(conflicts_with = "clear")]
        file: Option<PathBuf>,

        /// Remove the attached song
        #[arg(long)]
        clear: bool,
    },

    /// Write the preview export table as JSON
    #[command(name = "export")]
    Export {
        /// Path to the project
        path: PathBuf,

        /// Output file (prints to stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Dry-run playback, printing notes as the cursor passes them
    #[command(name = "preview")]
    Preview {
        /// Path to the project
        path: PathBuf,

        /// How long to play in milliseconds (defaults to the configured duration)
        #[arg(short, long)]
        duration: Option<u64>,
    },
}

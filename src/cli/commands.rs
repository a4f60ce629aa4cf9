//! CLI Command Implementations
//!
//! Each command loads the project into a [`Workspace`], drives the same
//! operations an interactive host would, and saves it back.

use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::config::EditorConfig;
use crate::editor::{EditOutcome, EditorMode};
use crate::engine::{Clock, FrameControl, LoggingTransportFactory, SystemClock};
use crate::error::ChartError;
use crate::persist::ProjectStore;
use crate::song::SongLoader;
use crate::workspace::Workspace;

/// Load a project. Sector count is not stored, so the loaded chart is grown
/// back to the configured canvas size after compaction.
fn open(config: &EditorConfig, path: &Path) -> Result<(ProjectStore, Workspace)> {
    let store = ProjectStore::new(path);
    let archive = store
        .load()
        .with_context(|| format!("failed to read project {}", path.display()))?;
    let mut workspace =
        Workspace::default().with_transport_factory(Box::new(LoggingTransportFactory));
    workspace
        .load_archive(&archive)
        .with_context(|| format!("failed to load project {}", path.display()))?;
    workspace.chart_mut().ensure_sectors(config.default_sector_count);
    Ok((store, workspace))
}

fn save(store: &ProjectStore, workspace: &Workspace) -> Result<()> {
    let archive = workspace.save_archive()?;
    store
        .save(&archive)
        .with_context(|| format!("failed to save project {}", store.project_path().display()))
}

/// Create a new project directory.
pub fn new_project(config: &EditorConfig, path: &Path, bpm: Option<f64>) -> Result<()> {
    info!("Creating new project at: {}", path.display());

    let store = ProjectStore::new(path);
    if store.exists() {
        return Err(ChartError::ProjectAlreadyExists {
            path: path.to_path_buf(),
        }
        .into());
    }

    let mut chart = config.new_chart()?;
    if let Some(bpm) = bpm {
        chart.set_bpm(bpm)?;
    }
    save(&store, &Workspace::new(chart))?;

    println!("Project created: {}", path.display());
    Ok(())
}

/// Print a project summary.
pub fn show_info(config: &EditorConfig, path: &Path) -> Result<()> {
    let (_, workspace) = open(config, path)?;
    let chart = workspace.chart();

    println!("Project: {}", path.display());
    println!("{:-<60}", "");
    println!("Tempo:    {} bpm", chart.bpm());
    println!("Sectors:  {} ({} rows)", chart.sector_count(), chart.row_count());
    println!("Notes:    {}", chart.notes().len());
    match workspace.song() {
        Some(song) => println!("Song:     {} ({} bytes)", song.filename(), song.bytes().len()),
        None => println!("Song:     none"),
    }
    println!("{:-<60}", "");

    for note in chart.notes() {
        println!(
            "  lane {} row {:>5} {:<5} length {}",
            note.lane(),
            note.row(),
            note.kind(),
            note.length()
        );
    }

    Ok(())
}

/// Place a short note, or a long note when `to` is given.
pub fn add_note(
    config: &EditorConfig,
    path: &Path,
    lane: usize,
    row: u32,
    to: Option<u32>,
) -> Result<()> {
    let (store, mut workspace) = open(config, path)?;

    let outcome = match to {
        None => {
            workspace.set_mode(EditorMode::AddShort);
            workspace.activate(lane, row)
        }
        Some(end) => {
            workspace.set_mode(EditorMode::AddLong);
            match workspace.activate(lane, row) {
                EditOutcome::AnchorSet(_) => workspace.activate(lane, end),
                other => other,
            }
        }
    };

    match outcome {
        EditOutcome::Added(id) => {
            save(&store, &workspace)?;
            println!("Added note {}", id);
            Ok(())
        }
        EditOutcome::AnchorDiscarded => {
            bail!("a long note needs two different rows")
        }
        EditOutcome::Rejected(err) => Err(err.into()),
        other => bail!("note not added: {:?}", other),
    }
}

/// Delete the note covering a cell.
pub fn remove_note(config: &EditorConfig, path: &Path, lane: usize, row: u32) -> Result<()> {
    let (store, mut workspace) = open(config, path)?;
    workspace.set_mode(EditorMode::Delete);

    match workspace.activate(lane, row) {
        EditOutcome::Removed(id) => {
            save(&store, &workspace)?;
            println!("Removed note {}", id);
        }
        _ => {
            warn!(lane, row, "no note at cell");
            println!("No note at lane {} row {}", lane, row);
        }
    }
    Ok(())
}

/// Change the tempo.
pub fn set_bpm(config: &EditorConfig, path: &Path, bpm: f64) -> Result<()> {
    let (store, mut workspace) = open(config, path)?;
    workspace.chart_mut().set_bpm(bpm)?;
    save(&store, &workspace)?;
    println!("Tempo set to {} bpm", bpm);
    Ok(())
}

/// Attach or detach the project's song.
pub fn set_song(config: &EditorConfig, path: &Path, file: Option<&Path>) -> Result<()> {
    let (store, mut workspace) = open(config, path)?;

    match file {
        Some(file) => {
            let mut loader = SongLoader::new();
            loader.spawn_load(file);
            let song = loader
                .wait()
                .context("song load did not complete")?
                .with_context(|| format!("failed to load song {}", file.display()))?;
            println!("Attached song: {}", song.filename());
            workspace.set_song(Some(song));
        }
        None => {
            workspace.set_song(None);
            println!("Song removed");
        }
    }

    save(&store, &workspace)
}

/// Write the preview export.
pub fn export(config: &EditorConfig, path: &Path, output: Option<&Path>) -> Result<()> {
    let (_, workspace) = open(config, path)?;
    let json = workspace.export_preview().to_json_pretty()?;

    match output {
        Some(output) => {
            fs::write(output, json)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!("Exported to {}", output.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Play the chart against the wall clock, printing each note as the cursor
/// reaches it.
pub fn preview(config: &EditorConfig, path: &Path, duration_ms: Option<u64>) -> Result<()> {
    let (_, mut workspace) = open(config, path)?;
    let duration_ms = duration_ms.unwrap_or(config.preview_duration_ms) as f64;
    let interval = Duration::from_millis(config.frame_interval_ms);
    let chart_rows = f64::from(workspace.chart().row_count());

    let mut pending: Vec<_> = workspace.chart().notes().to_vec();
    pending.sort_by_key(|n| (n.row(), n.lane()));
    let mut pending = pending.into_iter().peekable();

    let clock = SystemClock::new();
    workspace.play(clock.now_ms());
    println!(
        "Previewing {} at {} bpm for {:.0}ms",
        path.display(),
        workspace.chart().bpm(),
        duration_ms
    );

    loop {
        thread::sleep(interval);

        let elapsed = workspace.timeline().elapsed_ms();
        if elapsed >= duration_ms || workspace.cursor_rows() >= chart_rows {
            workspace.stop();
        }
        if workspace.frame(clock.now_ms()) == FrameControl::Cancel {
            break;
        }

        let cursor = workspace.cursor_rows();
        while let Some(note) = pending.next_if(|n| f64::from(n.row()) <= cursor) {
            println!(
                "{:>9.1}ms  row {:>5}  lane {}  {}",
                workspace.timeline().elapsed_ms(),
                note.row(),
                note.lane(),
                note.kind()
            );
        }
    }

    println!(
        "Stopped at {:.1}ms (row {:.2})",
        workspace.timeline().elapsed_ms(),
        workspace.cursor_rows()
    );
    Ok(())
}

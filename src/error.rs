//! Error handling for the chart editor core
//!
//! Every model-level failure is a typed result. The editing loop keeps running
//! after a rejected operation, so nothing in here is ever raised as a panic.

use std::path::PathBuf;

use thiserror::Error;

use crate::chart::NoteId;

/// Result type alias for chart editor operations
pub type Result<T> = std::result::Result<T, ChartError>;

/// A note placement that intersects an existing note in the same lane.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("note at lane {lane} rows {start}..{end} overlaps note {conflicting}")]
pub struct OverlapError {
    pub lane: usize,
    /// First row of the rejected placement.
    pub start: u32,
    /// One past the last row of the rejected placement.
    pub end: u32,
    /// Existing note the placement collided with.
    pub conflicting: NoteId,
}

/// A tempo that is not a positive, finite number of beats per minute.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("invalid tempo: {bpm} (must be a positive finite bpm)")]
pub struct InvalidTempoError {
    pub bpm: f64,
}

/// Reasons an archive cannot be turned back into a project.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("archive has no `{entry}` entry, not a valid project file")]
    MissingEntry { entry: &'static str },

    #[error("chart.json is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("chart.json belongs to `{found}`, expected `{expected}`")]
    UnknownProduct { found: String, expected: &'static str },

    #[error("chart.json version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}

/// Main error type for chart editor operations
#[derive(Error, Debug)]
pub enum ChartError {
    #[error(transparent)]
    Overlap(#[from] OverlapError),

    #[error(transparent)]
    InvalidTempo(#[from] InvalidTempoError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("Invalid note: {reason}")]
    InvalidNote { reason: String },

    #[error("Note not found: {id}")]
    NoteNotFound { id: NoteId },

    #[error("Project not found: {path}")]
    ProjectNotFound { path: PathBuf },

    #[error("Project already exists: {path}")]
    ProjectAlreadyExists { path: PathBuf },

    #[error("Failed to read file: {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}: {source}")]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ChartError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            ChartError::Overlap(_) => "NOTE_OVERLAP",
            ChartError::InvalidTempo(_) => "INVALID_TEMPO",
            ChartError::Format(_) => "INVALID_FORMAT",
            ChartError::InvalidNote { .. } => "INVALID_NOTE",
            ChartError::NoteNotFound { .. } => "NOTE_NOT_FOUND",
            ChartError::ProjectNotFound { .. } => "PROJECT_NOT_FOUND",
            ChartError::ProjectAlreadyExists { .. } => "PROJECT_EXISTS",
            ChartError::FileReadError { .. } => "FILE_READ_ERROR",
            ChartError::FileWriteError { .. } => "FILE_WRITE_ERROR",
            ChartError::Config { .. } => "CONFIG_ERROR",
            ChartError::Io(_) => "IO_ERROR",
            ChartError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Returns a user-friendly recovery suggestion.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            ChartError::Overlap(_) => Some("Pick an empty cell or delete the existing note first."),
            ChartError::InvalidTempo(_) => Some("Enter a tempo greater than zero."),
            ChartError::Format(FormatError::UnsupportedVersion { .. }) => {
                Some("Update the editor to open charts saved by a newer version.")
            }
            ChartError::Format(_) => Some("Check that the file is a chart saved by this editor."),
            ChartError::ProjectNotFound { .. } => Some("Check the project path and try again."),
            ChartError::ProjectAlreadyExists { .. } => {
                Some("Choose a different path or remove the existing project.")
            }
            _ => None,
        }
    }
}

//! Project archive codec
//!
//! A saved project is a set of named entries:
//!
//! ```text
//! chart.json   {"__product", "__version", "notes", "bpm", "songMetadata"}
//! song         raw audio bytes, present iff songMetadata is not null
//! ```
//!
//! Note ids are process-local and never written; they are regenerated when
//! the chart is loaded.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::chart::{Chart, NoteData};
use crate::error::FormatError;
use crate::song::{Song, SongMetadata};

/// Product tag identifying charts written by this editor.
pub const PRODUCT: &str = "mc-rhythm-chart-editor";

/// Newest `chart.json` version this build reads and the one it writes.
pub const CURRENT_FILE_VERSION: u32 = 0;

/// Entry holding the chart document.
pub const CHART_ENTRY: &str = "chart.json";

/// Entry holding the raw song bytes.
pub const SONG_ENTRY: &str = "song";

/// The `chart.json` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartFile {
    #[serde(rename = "__product")]
    pub product: String,
    #[serde(rename = "__version")]
    pub version: u32,
    pub notes: Vec<NoteData>,
    pub bpm: f64,
    #[serde(default)]
    pub song_metadata: Option<SongMetadata>,
}

/// Only the identifying fields, checked before the body is trusted.
#[derive(Debug, Deserialize)]
struct ChartFileHeader {
    #[serde(rename = "__product", default)]
    product: Option<String>,
    #[serde(rename = "__version", default)]
    version: u32,
}

/// Named entries of a saved project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Archive {
    entries: BTreeMap<String, Vec<u8>>,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(name.into(), bytes);
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A decoded project, ready to be loaded into a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectData {
    pub notes: Vec<NoteData>,
    pub bpm: f64,
    pub song: Option<Song>,
}

/// Encode a chart and its optional song.
pub fn serialize(chart: &Chart, song: Option<&Song>) -> Result<Archive, serde_json::Error> {
    let file = ChartFile {
        product: PRODUCT.to_string(),
        version: CURRENT_FILE_VERSION,
        notes: chart.note_data(),
        bpm: chart.bpm(),
        song_metadata: song.map(|s| s.metadata.clone()),
    };

    let mut archive = Archive::new();
    archive.insert(CHART_ENTRY, serde_json::to_vec(&file)?);
    if let Some(song) = song {
        archive.insert(SONG_ENTRY, song.bytes().to_vec());
    }
    debug!(
        notes = file.notes.len(),
        with_song = song.is_some(),
        "chart serialized"
    );
    Ok(archive)
}

/// Decode an archive.
///
/// The product tag and version are checked before the rest of the document
/// is parsed. The song is attached only when both its metadata and its bytes
/// are present.
pub fn deserialize(archive: &Archive) -> Result<ProjectData, FormatError> {
    let raw = archive.get(CHART_ENTRY).ok_or(FormatError::MissingEntry {
        entry: CHART_ENTRY,
    })?;

    let header: ChartFileHeader = serde_json::from_slice(raw)?;
    match header.product.as_deref() {
        Some(PRODUCT) => {}
        other => {
            return Err(FormatError::UnknownProduct {
                found: other.unwrap_or_default().to_string(),
                expected: PRODUCT,
            })
        }
    }
    if header.version > CURRENT_FILE_VERSION {
        return Err(FormatError::UnsupportedVersion {
            found: header.version,
            supported: CURRENT_FILE_VERSION,
        });
    }

    let file: ChartFile = serde_json::from_slice(raw)?;
    let song = match (file.song_metadata, archive.get(SONG_ENTRY)) {
        (Some(metadata), Some(bytes)) => Some(Song::new(metadata.filename, bytes.to_vec())),
        (Some(metadata), None) => {
            warn!(filename = %metadata.filename, "song metadata without song entry, ignoring");
            None
        }
        (None, _) => None,
    };

    Ok(ProjectData {
        notes: file.notes,
        bpm: file.bpm,
        song,
    })
}

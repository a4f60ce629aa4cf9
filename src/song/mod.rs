//! Song Session
//!
//! The song is an opaque blob handed to the audio engine. The chart never looks
//! inside it; only the filename is recorded in saved projects.

pub mod loader;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use loader::{LoadTicket, SongLoader};

/// Song information persisted alongside the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongMetadata {
    pub filename: String,
}

/// A loaded song: metadata plus shared raw audio bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Song {
    pub metadata: SongMetadata,
    bytes: Arc<[u8]>,
}

impl fmt::Debug for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Song")
            .field("metadata", &self.metadata)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl Song {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            metadata: SongMetadata {
                filename: filename.into(),
            },
            bytes: bytes.into(),
        }
    }

    pub fn filename(&self) -> &str {
        &self.metadata.filename
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Cheap clone of the shared byte buffer.
    pub fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_song_shares_bytes() {
        let song = Song::new("track.mp3", vec![1u8, 2, 3]);
        let copy = song.clone();
        assert!(Arc::ptr_eq(&song.shared_bytes(), &copy.shared_bytes()));
        assert_eq!(copy.filename(), "track.mp3");
        assert_eq!(copy.bytes(), &[1, 2, 3]);
    }

    #[test]
    fn test_debug_hides_bytes() {
        let song = Song::new("a.ogg", vec![0u8; 4096]);
        let debug = format!("{:?}", song);
        assert!(debug.contains("4096"));
        assert!(debug.len() < 200);
    }
}

//! Note types
//!
//! A note occupies the half-open row interval `[row, row + length)` of a single
//! lane. Rows count upward from the bottom of the chart.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque note identifier, assigned by the chart and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteId(Uuid);

impl NoteId {
    pub(crate) fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Whether a note is an instantaneous hit or a sustained hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    Short,
    Long,
}

impl fmt::Display for NoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteKind::Short => write!(f, "short"),
            NoteKind::Long => write!(f, "long"),
        }
    }
}

/// Placement of a note without its identity.
///
/// This is the portable form written to `chart.json`; ids never leave the
/// process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteData {
    pub lane: usize,
    pub row: u32,
    #[serde(rename = "type")]
    pub kind: NoteKind,
    pub length: u32,
}

impl NoteData {
    pub fn short(lane: usize, row: u32) -> Self {
        Self {
            lane,
            row,
            kind: NoteKind::Short,
            length: 1,
        }
    }

    pub fn long(lane: usize, row: u32, length: u32) -> Self {
        Self {
            lane,
            row,
            kind: NoteKind::Long,
            length,
        }
    }

    /// One past the last row covered.
    pub fn end(&self) -> u32 {
        self.row.saturating_add(self.length)
    }
}

/// A committed note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub(crate) id: NoteId,
    pub(crate) data: NoteData,
}

impl Note {
    pub fn id(&self) -> NoteId {
        self.id
    }

    pub fn lane(&self) -> usize {
        self.data.lane
    }

    pub fn row(&self) -> u32 {
        self.data.row
    }

    pub fn kind(&self) -> NoteKind {
        self.data.kind
    }

    pub fn length(&self) -> u32 {
        self.data.length
    }

    /// One past the last row covered.
    pub fn end(&self) -> u32 {
        self.data.end()
    }

    /// Last row covered (inclusive).
    pub fn last_row(&self) -> u32 {
        self.data.row + self.data.length - 1
    }

    /// The id-less placement of this note.
    pub fn data(&self) -> NoteData {
        self.data
    }

    pub fn covers(&self, lane: usize, row: u32) -> bool {
        self.data.lane == lane && row >= self.data.row && row < self.end()
    }

    /// Whether the half-open interval `[start, end)` intersects this note.
    pub fn overlaps(&self, start: u32, end: u32) -> bool {
        !(start >= self.end() || end <= self.data.row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(data: NoteData) -> Note {
        Note {
            id: NoteId::fresh(),
            data,
        }
    }

    #[test]
    fn test_short_note_covers_single_row() {
        let n = note(NoteData::short(2, 5));
        assert!(n.covers(2, 5));
        assert!(!n.covers(2, 6));
        assert!(!n.covers(1, 5));
        assert_eq!(n.last_row(), 5);
    }

    #[test]
    fn test_long_note_interval() {
        let n = note(NoteData::long(0, 3, 5));
        assert_eq!(n.end(), 8);
        assert_eq!(n.last_row(), 7);
        assert!(n.overlaps(7, 8));
        assert!(!n.overlaps(8, 9));
        assert!(n.overlaps(0, 4));
        assert!(!n.overlaps(0, 3));
    }

    #[test]
    fn test_same_row_short_notes_overlap() {
        let n = note(NoteData::short(0, 4));
        assert!(n.overlaps(4, 5));
    }

    #[test]
    fn test_note_data_json_shape() {
        let json = serde_json::to_value(NoteData::long(1, 2, 3)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"lane": 1, "row": 2, "type": "long", "length": 3})
        );
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(NoteId::fresh(), NoteId::fresh());
    }
}

//! Chart model
//!
//! Owns the authoritative note list, tempo and sector count. Every mutation
//! goes through a validated operation; a rejected operation leaves the chart
//! exactly as it was.

use tracing::{debug, warn};

use super::note::{Note, NoteData, NoteId, NoteKind};
use super::{DEFAULT_BPM, DEFAULT_SECTOR_COUNT, LANES, ROWS_PER_SECTOR};
use crate::error::{ChartError, InvalidTempoError, OverlapError, Result};

/// A note chart: notes across [`LANES`] lanes, a tempo and a sector count.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    notes: Vec<Note>,
    bpm: f64,
    sector_count: u32,
}

impl Default for Chart {
    fn default() -> Self {
        Self::new()
    }
}

impl Chart {
    /// Create an empty chart at the default tempo with the default canvas size.
    ///
    /// # Example
    /// ```
    /// use rhythm_chart::chart::{Chart, DEFAULT_BPM};
    /// let chart = Chart::new();
    /// assert!(chart.notes().is_empty());
    /// assert_eq!(chart.bpm(), DEFAULT_BPM);
    /// ```
    pub fn new() -> Self {
        Self {
            notes: Vec::new(),
            bpm: DEFAULT_BPM,
            sector_count: DEFAULT_SECTOR_COUNT,
        }
    }

    /// Create an empty chart with an explicit tempo and sector count.
    pub fn with_settings(
        bpm: f64,
        sector_count: u32,
    ) -> std::result::Result<Self, InvalidTempoError> {
        validate_tempo(bpm)?;
        Ok(Self {
            notes: Vec::new(),
            bpm,
            sector_count,
        })
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Place a note, rejecting it if it is malformed or overlaps a note in the
    /// same lane.
    ///
    /// Does not grow the sector count.
    ///
    /// # Example
    /// ```
    /// use rhythm_chart::chart::{Chart, NoteKind};
    /// let mut chart = Chart::new();
    /// let id = chart.add_note(0, 3, NoteKind::Long, 5).unwrap();
    /// assert!(chart.note(id).is_some());
    /// assert!(chart.add_note(0, 7, NoteKind::Short, 1).is_err());
    /// ```
    pub fn add_note(
        &mut self,
        lane: usize,
        row: u32,
        kind: NoteKind,
        length: u32,
    ) -> Result<NoteId> {
        let data = NoteData {
            lane,
            row,
            kind,
            length,
        };
        validate_note(&data)?;

        if let Some(conflict) = find_overlap(&self.notes, &data) {
            warn!(
                lane,
                row,
                length,
                conflicting = %conflict,
                "Attempted to add note which overlaps other notes, ignoring"
            );
            return Err(OverlapError {
                lane,
                start: data.row,
                end: data.end(),
                conflicting: conflict,
            }
            .into());
        }

        let id = NoteId::fresh();
        self.notes.push(Note { id, data });
        debug!(%id, lane, row, %kind, length, "note added");
        Ok(id)
    }

    /// Remove a note by id. Returns `false` if no such note exists.
    pub fn remove_note(&mut self, id: NoteId) -> bool {
        match self.notes.iter().position(|n| n.id == id) {
            Some(idx) => {
                self.notes.remove(idx);
                debug!(%id, "note removed");
                true
            }
            None => false,
        }
    }

    /// Set the tempo in beats per minute.
    pub fn set_bpm(&mut self, bpm: f64) -> std::result::Result<(), InvalidTempoError> {
        validate_tempo(bpm)?;
        self.bpm = bpm;
        debug!(bpm, "tempo set");
        Ok(())
    }

    /// Append one empty sector. Saturates at `u32::MAX` sectors.
    pub fn add_sector(&mut self) {
        self.sector_count = self.sector_count.saturating_add(1);
    }

    /// Grow the sector count to at least `minimum`. Never shrinks.
    pub fn ensure_sectors(&mut self, minimum: u32) {
        if minimum > self.sector_count {
            debug!(from = self.sector_count, to = minimum, "sectors extended");
            self.sector_count = minimum;
        }
    }

    /// Shrink the sector count to the minimum that still covers every note.
    ///
    /// An empty chart compacts to zero sectors.
    pub fn compact_sectors(&mut self) {
        let compacted = covering_sectors(self.last_note_end());
        if compacted != self.sector_count {
            debug!(from = self.sector_count, to = compacted, "sectors compacted");
        }
        self.sector_count = compacted;
    }

    /// Replace the whole chart with imported notes and tempo.
    ///
    /// Incoming notes get fresh ids. The import is validated as a whole: if the
    /// tempo is invalid or any note is malformed or overlaps another, nothing
    /// changes.
    ///
    /// Overlap uses the same half-open intervals as [`Chart::add_note`]. Files
    /// from editors that treated a long note's last row as free, e.g. a long
    /// note over rows 3..=7 followed by a short note on row 7 of the same lane,
    /// are rejected here and have to be fixed up before they load.
    pub fn load_project(&mut self, notes: &[NoteData], bpm: f64) -> Result<()> {
        validate_tempo(bpm)?;

        let mut imported: Vec<Note> = Vec::with_capacity(notes.len());
        for data in notes {
            validate_note(data)?;
            if let Some(conflict) = find_overlap(&imported, data) {
                return Err(OverlapError {
                    lane: data.lane,
                    start: data.row,
                    end: data.end(),
                    conflicting: conflict,
                }
                .into());
            }
            imported.push(Note {
                id: NoteId::fresh(),
                data: *data,
            });
        }

        self.notes = imported;
        self.bpm = bpm;
        self.compact_sectors();
        debug!(
            notes = self.notes.len(),
            bpm,
            sectors = self.sector_count,
            "project loaded"
        );
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// All notes in insertion order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn note(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// The note covering a cell, if any.
    pub fn note_at(&self, lane: usize, row: u32) -> Option<&Note> {
        self.notes.iter().find(|n| n.covers(lane, row))
    }

    /// Notes of one lane, sorted by row ascending.
    pub fn notes_in_lane(&self, lane: usize) -> Vec<&Note> {
        let mut lane_notes: Vec<&Note> = self.notes.iter().filter(|n| n.lane() == lane).collect();
        lane_notes.sort_by_key(|n| n.row());
        lane_notes
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn sector_count(&self) -> u32 {
        self.sector_count
    }

    /// Number of rows spanned by the current sectors, saturating at `u32::MAX`.
    pub fn row_count(&self) -> u32 {
        self.sector_count.saturating_mul(ROWS_PER_SECTOR)
    }

    /// One past the furthest row covered by any note (0 when empty).
    pub fn last_note_end(&self) -> u32 {
        self.notes.iter().map(Note::end).max().unwrap_or(0)
    }

    /// Id-less snapshot of every note, used when persisting.
    pub fn note_data(&self) -> Vec<NoteData> {
        self.notes.iter().map(Note::data).collect()
    }
}

fn covering_sectors(end: u32) -> u32 {
    end.div_ceil(ROWS_PER_SECTOR)
}

fn validate_tempo(bpm: f64) -> std::result::Result<(), InvalidTempoError> {
    if !bpm.is_finite() || bpm <= 0.0 {
        warn!(bpm, "rejected invalid tempo");
        return Err(InvalidTempoError { bpm });
    }
    Ok(())
}

fn validate_note(data: &NoteData) -> Result<()> {
    let reason = if data.lane >= LANES {
        format!("lane {} is outside 0..{}", data.lane, LANES)
    } else if data.length == 0 {
        "length must be at least 1".to_string()
    } else if data.kind == NoteKind::Short && data.length != 1 {
        format!("short note must have length 1, got {}", data.length)
    } else if data.row.checked_add(data.length).is_none() {
        format!("row {} + length {} overflows", data.row, data.length)
    } else {
        return Ok(());
    };
    Err(ChartError::InvalidNote { reason })
}

fn find_overlap(notes: &[Note], candidate: &NoteData) -> Option<NoteId> {
    notes
        .iter()
        .filter(|n| n.lane() == candidate.lane)
        .find(|n| n.overlaps(candidate.row, candidate.end()))
        .map(Note::id)
}

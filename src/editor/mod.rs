//! Editing State Machine
//!
//! Turns lane/row activations into chart mutations according to the current
//! editor mode. Sustained notes take two activations in the same lane: the
//! first one sets an anchor, the second one commits the note.
//!
//! The anchor is a single slot. Activating another lane while an anchor is
//! pending starts a fresh anchor there; the earlier one is never consulted
//! again.

use std::fmt;

use tracing::debug;

use crate::chart::{Chart, NoteId, NoteKind, LANES};
use crate::engine::PlaybackState;
use crate::error::ChartError;

/// What a lane/row activation does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    AddShort,
    AddLong,
    Delete,
}

impl fmt::Display for EditorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorMode::AddShort => write!(f, "add-short"),
            EditorMode::AddLong => write!(f, "add-long"),
            EditorMode::Delete => write!(f, "delete"),
        }
    }
}

/// First endpoint of a sustained note awaiting its second endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub lane: usize,
    pub row: u32,
}

/// Result of a single activation.
#[derive(Debug)]
pub enum EditOutcome {
    /// A preview session is open; the activation was ignored.
    Locked,
    /// A note was committed.
    Added(NoteId),
    /// The chart refused the note. Nothing changed.
    Rejected(ChartError),
    /// A long-note anchor is now pending.
    AnchorSet(Anchor),
    /// The second endpoint hit the anchor row; no note and no anchor remain.
    AnchorDiscarded,
    /// A note was deleted.
    Removed(NoteId),
    /// Delete on an empty cell.
    Nothing,
}

/// Transient editing state. Not persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorSession {
    mode: EditorMode,
    anchor: Option<Anchor>,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn pending_anchor(&self) -> Option<Anchor> {
        self.anchor
    }

    /// Switch modes. Leaving [`EditorMode::AddLong`] drops any pending anchor.
    pub fn set_mode(&mut self, mode: EditorMode) {
        self.mode = mode;
        if mode != EditorMode::AddLong {
            self.anchor = None;
        }
        debug!(%mode, "editor mode set");
    }

    pub fn clear_anchor(&mut self) {
        self.anchor = None;
    }

    /// Handle an activation of the cell at `(lane, row)`.
    ///
    /// Every edit is ignored while a preview session is open, paused or not.
    ///
    /// # Example
    /// ```
    /// use rhythm_chart::chart::Chart;
    /// use rhythm_chart::editor::{EditorMode, EditorSession};
    /// use rhythm_chart::engine::PlaybackState;
    ///
    /// let mut chart = Chart::new();
    /// let mut session = EditorSession::new();
    /// let playback = PlaybackState::default();
    ///
    /// session.set_mode(EditorMode::AddLong);
    /// session.activate(&mut chart, &playback, 0, 3);
    /// session.activate(&mut chart, &playback, 0, 7);
    ///
    /// let note = &chart.notes()[0];
    /// assert_eq!((note.row(), note.length()), (3, 5));
    /// assert!(session.pending_anchor().is_none());
    /// ```
    pub fn activate(
        &mut self,
        chart: &mut Chart,
        playback: &PlaybackState,
        lane: usize,
        row: u32,
    ) -> EditOutcome {
        if playback.started {
            debug!(lane, row, "edit ignored during preview");
            return EditOutcome::Locked;
        }

        match self.mode {
            EditorMode::AddShort => commit(chart.add_note(lane, row, NoteKind::Short, 1)),
            EditorMode::AddLong => self.activate_long(chart, lane, row),
            EditorMode::Delete => match chart.note_at(lane, row).map(|n| n.id()) {
                Some(id) => {
                    chart.remove_note(id);
                    EditOutcome::Removed(id)
                }
                None => EditOutcome::Nothing,
            },
        }
    }

    fn activate_long(&mut self, chart: &mut Chart, lane: usize, row: u32) -> EditOutcome {
        let anchor = match self.anchor {
            Some(anchor) if anchor.lane == lane => anchor,
            _ => {
                if lane >= LANES {
                    return EditOutcome::Rejected(ChartError::InvalidNote {
                        reason: format!("lane {} is outside 0..{}", lane, LANES),
                    });
                }
                let anchor = Anchor { lane, row };
                self.anchor = Some(anchor);
                debug!(lane, row, "long note anchor set");
                return EditOutcome::AnchorSet(anchor);
            }
        };

        self.anchor = None;
        if anchor.row == row {
            debug!(lane, row, "long note discarded, endpoints on the same row");
            return EditOutcome::AnchorDiscarded;
        }

        let top = anchor.row.min(row);
        let Some(length) = anchor.row.abs_diff(row).checked_add(1) else {
            return EditOutcome::Rejected(ChartError::InvalidNote {
                reason: format!("long note from row {} to {} is too long", anchor.row, row),
            });
        };
        commit(chart.add_note(lane, top, NoteKind::Long, length))
    }
}

fn commit(result: crate::error::Result<NoteId>) -> EditOutcome {
    match result {
        Ok(id) => EditOutcome::Added(id),
        Err(err) => EditOutcome::Rejected(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle() -> PlaybackState {
        PlaybackState::default()
    }

    fn previewing() -> PlaybackState {
        PlaybackState {
            started: true,
            playing: false,
            elapsed_ms: 0.0,
        }
    }

    // ------------------------------------------------------------------------
    // AddShort
    // ------------------------------------------------------------------------

    #[test]
    fn test_add_short() {
        let mut chart = Chart::new();
        let mut session = EditorSession::new();
        let outcome = session.activate(&mut chart, &idle(), 2, 5);
        assert!(matches!(outcome, EditOutcome::Added(_)));
        assert_eq!(chart.notes()[0].kind(), NoteKind::Short);
    }

    #[test]
    fn test_add_short_overlap_is_reported_not_applied() {
        let mut chart = Chart::new();
        let mut session = EditorSession::new();
        session.activate(&mut chart, &idle(), 2, 5);
        let outcome = session.activate(&mut chart, &idle(), 2, 5);
        assert!(matches!(outcome, EditOutcome::Rejected(ChartError::Overlap(_))));
        assert_eq!(chart.notes().len(), 1);
        assert_eq!(session.mode(), EditorMode::AddShort);
    }

    // ------------------------------------------------------------------------
    // AddLong
    // ------------------------------------------------------------------------

    #[test]
    fn test_long_note_two_clicks() {
        let mut chart = Chart::new();
        let mut session = EditorSession::new();
        session.set_mode(EditorMode::AddLong);

        let first = session.activate(&mut chart, &idle(), 0, 3);
        assert!(matches!(first, EditOutcome::AnchorSet(Anchor { lane: 0, row: 3 })));
        assert!(chart.notes().is_empty());

        let second = session.activate(&mut chart, &idle(), 0, 7);
        assert!(matches!(second, EditOutcome::Added(_)));
        let note = &chart.notes()[0];
        assert_eq!(note.lane(), 0);
        assert_eq!(note.row(), 3);
        assert_eq!(note.length(), 5);
        assert_eq!(note.kind(), NoteKind::Long);
        assert!(session.pending_anchor().is_none());
    }

    #[test]
    fn test_long_note_reversed_endpoints() {
        let mut chart = Chart::new();
        let mut session = EditorSession::new();
        session.set_mode(EditorMode::AddLong);
        session.activate(&mut chart, &idle(), 1, 9);
        session.activate(&mut chart, &idle(), 1, 4);
        let note = &chart.notes()[0];
        assert_eq!((note.row(), note.length()), (4, 6));
    }

    #[test]
    fn test_long_note_same_row_discarded() {
        let mut chart = Chart::new();
        let mut session = EditorSession::new();
        session.set_mode(EditorMode::AddLong);
        session.activate(&mut chart, &idle(), 0, 3);
        let outcome = session.activate(&mut chart, &idle(), 0, 3);
        assert!(matches!(outcome, EditOutcome::AnchorDiscarded));
        assert!(chart.notes().is_empty());
        assert!(session.pending_anchor().is_none());
    }

    #[test]
    fn test_long_note_spanning_every_row_rejected() {
        let mut chart = Chart::new();
        let mut session = EditorSession::new();
        session.set_mode(EditorMode::AddLong);
        session.activate(&mut chart, &idle(), 0, 0);
        let outcome = session.activate(&mut chart, &idle(), 0, u32::MAX);
        assert!(matches!(outcome, EditOutcome::Rejected(ChartError::InvalidNote { .. })));
        assert!(chart.notes().is_empty());
        assert!(session.pending_anchor().is_none());
    }

    #[test]
    fn test_long_note_overlap_clears_anchor() {
        let mut chart = Chart::new();
        chart.add_note(0, 5, NoteKind::Short, 1).unwrap();
        let mut session = EditorSession::new();
        session.set_mode(EditorMode::AddLong);
        session.activate(&mut chart, &idle(), 0, 3);
        let outcome = session.activate(&mut chart, &idle(), 0, 7);
        assert!(matches!(outcome, EditOutcome::Rejected(ChartError::Overlap(_))));
        assert_eq!(chart.notes().len(), 1);
        assert!(session.pending_anchor().is_none());
    }

    #[test]
    fn test_anchor_is_lane_scoped() {
        let mut chart = Chart::new();
        let mut session = EditorSession::new();
        session.set_mode(EditorMode::AddLong);
        session.activate(&mut chart, &idle(), 0, 3);

        // Another lane starts its own anchor instead of completing lane 0
        let outcome = session.activate(&mut chart, &idle(), 1, 7);
        assert!(matches!(outcome, EditOutcome::AnchorSet(Anchor { lane: 1, row: 7 })));
        assert!(chart.notes().is_empty());

        // Back in lane 0 the old anchor is gone, so this is a new anchor too
        let outcome = session.activate(&mut chart, &idle(), 0, 8);
        assert!(matches!(outcome, EditOutcome::AnchorSet(Anchor { lane: 0, row: 8 })));
        assert!(chart.notes().is_empty());
    }

    #[test]
    fn test_mode_change_clears_anchor() {
        let mut chart = Chart::new();
        let mut session = EditorSession::new();
        session.set_mode(EditorMode::AddLong);
        session.activate(&mut chart, &idle(), 0, 3);
        session.set_mode(EditorMode::AddLong);
        assert!(session.pending_anchor().is_some());
        session.set_mode(EditorMode::Delete);
        assert!(session.pending_anchor().is_none());
    }

    #[test]
    fn test_anchor_outside_lanes_rejected() {
        let mut chart = Chart::new();
        let mut session = EditorSession::new();
        session.set_mode(EditorMode::AddLong);
        let outcome = session.activate(&mut chart, &idle(), LANES, 0);
        assert!(matches!(outcome, EditOutcome::Rejected(ChartError::InvalidNote { .. })));
        assert!(session.pending_anchor().is_none());
    }

    // ------------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------------

    #[test]
    fn test_delete_hits_long_note_body() {
        let mut chart = Chart::new();
        let id = chart.add_note(3, 10, NoteKind::Long, 4).unwrap();
        let mut session = EditorSession::new();
        session.set_mode(EditorMode::Delete);
        let outcome = session.activate(&mut chart, &idle(), 3, 12);
        assert!(matches!(outcome, EditOutcome::Removed(removed) if removed == id));
        assert!(chart.notes().is_empty());
    }

    #[test]
    fn test_delete_empty_cell() {
        let mut chart = Chart::new();
        chart.add_note(3, 10, NoteKind::Short, 1).unwrap();
        let mut session = EditorSession::new();
        session.set_mode(EditorMode::Delete);
        assert!(matches!(
            session.activate(&mut chart, &idle(), 3, 11),
            EditOutcome::Nothing
        ));
        assert_eq!(chart.notes().len(), 1);
    }

    // ------------------------------------------------------------------------
    // Playback guard
    // ------------------------------------------------------------------------

    #[test]
    fn test_all_modes_locked_during_preview() {
        let mut chart = Chart::new();
        let id = chart.add_note(0, 0, NoteKind::Short, 1).unwrap();
        let before = chart.clone();
        let mut session = EditorSession::new();

        for mode in [EditorMode::AddShort, EditorMode::AddLong, EditorMode::Delete] {
            session.set_mode(mode);
            let outcome = session.activate(&mut chart, &previewing(), 0, 0);
            assert!(matches!(outcome, EditOutcome::Locked));
            let outcome = session.activate(&mut chart, &previewing(), 1, 4);
            assert!(matches!(outcome, EditOutcome::Locked));
        }
        assert_eq!(chart, before);
        assert!(chart.note(id).is_some());
        assert!(session.pending_anchor().is_none());
    }
}

//! Preview export
//!
//! Flattens the chart into the tick-indexed lane table consumed by the game's
//! chart previewer:
//!
//! ```text
//! { "a": [...], "b": [...], "c": [...], "d": [...], "e": [...],
//!   "keys": 5, "length": <max tick>, "tick": <ticks per second> }
//! ```
//!
//! Short notes are a single tick, long notes are `"l", start, end`, and an
//! empty lane holds only [`EMPTY_LANE_SENTINEL`].

use serde::ser::Serializer;
use serde::Serialize;

use crate::chart::{Chart, NoteKind, LANES};
use crate::timing::{row_to_tick, tick_rate};

/// Value written for a lane without notes.
pub const EMPTY_LANE_SENTINEL: i64 = -99999;

/// Marker preceding the start/end ticks of a long note.
pub const LONG_NOTE_MARKER: &str = "l";

/// One element of a lane array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportValue {
    Tick(i64),
    LongMarker,
}

impl Serialize for ExportValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ExportValue::Tick(tick) => serializer.serialize_i64(*tick),
            ExportValue::LongMarker => serializer.serialize_str(LONG_NOTE_MARKER),
        }
    }
}

/// The exported table, one array per lane in fixed lane order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportTable {
    pub a: Vec<ExportValue>,
    pub b: Vec<ExportValue>,
    pub c: Vec<ExportValue>,
    pub d: Vec<ExportValue>,
    pub e: Vec<ExportValue>,
    pub keys: usize,
    pub length: u64,
    pub tick: u64,
}

impl ExportTable {
    pub fn lane(&self, lane: usize) -> Option<&[ExportValue]> {
        match lane {
            0 => Some(&self.a),
            1 => Some(&self.b),
            2 => Some(&self.c),
            3 => Some(&self.d),
            4 => Some(&self.e),
            _ => None,
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Build the preview table for a chart.
///
/// # Example
/// ```
/// use rhythm_chart::chart::{Chart, NoteKind};
/// use rhythm_chart::persist::{export_preview, ExportValue};
///
/// let mut chart = Chart::new();
/// chart.add_note(2, 5, NoteKind::Short, 1).unwrap();
/// let table = export_preview(&chart);
/// assert_eq!(table.tick, 8);
/// assert_eq!(table.c, vec![ExportValue::Tick(5)]);
/// ```
pub fn export_preview(chart: &Chart) -> ExportTable {
    let bpm = chart.bpm();
    let mut length = 0u64;

    let lanes: [Vec<ExportValue>; LANES] = std::array::from_fn(|lane| {
        let notes = chart.notes_in_lane(lane);
        if notes.is_empty() {
            return vec![ExportValue::Tick(EMPTY_LANE_SENTINEL)];
        }

        let mut values = Vec::with_capacity(notes.len());
        for note in notes {
            let start = row_to_tick(note.row(), bpm);
            match note.kind() {
                NoteKind::Short => {
                    values.push(ExportValue::Tick(start as i64));
                    length = length.max(start);
                }
                NoteKind::Long => {
                    let end = row_to_tick(note.last_row(), bpm);
                    values.push(ExportValue::LongMarker);
                    values.push(ExportValue::Tick(start as i64));
                    values.push(ExportValue::Tick(end as i64));
                    length = length.max(end);
                }
            }
        }
        values
    });

    let [a, b, c, d, e] = lanes;
    ExportTable {
        a,
        b,
        c,
        d,
        e,
        keys: LANES,
        length,
        tick: tick_rate(bpm),
    }
}

//! Property Tests
//!
//! Random edit sequences against the chart invariants.

use proptest::prelude::*;

use rhythm_chart::chart::{Chart, NoteKind, LANES};
use rhythm_chart::persist;

#[derive(Debug, Clone)]
enum Op {
    Add {
        lane: usize,
        row: u32,
        length: u32,
    },
    RemoveNth(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..LANES, 0u32..64, 1u32..8)
            .prop_map(|(lane, row, length)| Op::Add { lane, row, length }),
        1 => (0usize..32).prop_map(Op::RemoveNth),
    ]
}

fn kind_for(length: u32) -> NoteKind {
    if length == 1 {
        NoteKind::Short
    } else {
        NoteKind::Long
    }
}

fn assert_no_overlap(chart: &Chart) -> Result<(), TestCaseError> {
    for lane in 0..LANES {
        let notes = chart.notes_in_lane(lane);
        for pair in notes.windows(2) {
            prop_assert!(
                pair[0].end() <= pair[1].row(),
                "lane {} has {:?} overlapping {:?}",
                lane,
                pair[0],
                pair[1]
            );
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn committed_notes_never_overlap(ops in prop::collection::vec(op(), 1..80)) {
        let mut chart = Chart::new();
        for op in ops {
            match op {
                Op::Add { lane, row, length } => {
                    let _ = chart.add_note(lane, row, kind_for(length), length);
                }
                Op::RemoveNth(n) => {
                    if let Some(id) = chart.notes().get(n).map(|note| note.id()) {
                        prop_assert!(chart.remove_note(id));
                    }
                }
            }
            assert_no_overlap(&chart)?;
        }
    }

    #[test]
    fn rejected_add_leaves_chart_unchanged(
        ops in prop::collection::vec(op(), 1..60),
        lane in 0..LANES,
        row in 0u32..64,
        length in 1u32..8
    ) {
        let mut chart = Chart::new();
        for op in ops {
            if let Op::Add { lane, row, length } = op {
                let _ = chart.add_note(lane, row, kind_for(length), length);
            }
        }

        let before = chart.clone();
        if chart.add_note(lane, row, kind_for(length), length).is_err() {
            prop_assert_eq!(chart, before);
        } else {
            prop_assert_eq!(chart.notes().len(), before.notes().len() + 1);
        }
    }

    #[test]
    fn compact_is_idempotent(ops in prop::collection::vec(op(), 0..40), extra in 0u32..5) {
        let mut chart = Chart::new();
        for op in ops {
            if let Op::Add { lane, row, length } = op {
                let _ = chart.add_note(lane, row, kind_for(length), length);
            }
        }
        for _ in 0..extra {
            chart.add_sector();
        }

        chart.compact_sectors();
        let once = chart.sector_count();
        chart.compact_sectors();
        prop_assert_eq!(chart.sector_count(), once);
        prop_assert!(chart.row_count() >= chart.last_note_end());
    }

    #[test]
    fn archive_round_trip_keeps_intervals(
        ops in prop::collection::vec(op(), 0..40),
        bpm in 30.0f64..300.0
    ) {
        let mut chart = Chart::new();
        chart.set_bpm(bpm).unwrap();
        for op in ops {
            if let Op::Add { lane, row, length } = op {
                let _ = chart.add_note(lane, row, kind_for(length), length);
            }
        }

        let archive = persist::serialize(&chart, None).unwrap();
        let data = persist::deserialize(&archive).unwrap();
        let mut loaded = Chart::new();
        loaded.load_project(&data.notes, data.bpm).unwrap();

        prop_assert_eq!(loaded.note_data(), chart.note_data());
        prop_assert_eq!(loaded.bpm(), chart.bpm());
    }
}

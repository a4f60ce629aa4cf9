//! Chart Model
//!
//! Notes, tempo and sectors, plus the grid constants every other module
//! measures against.

pub mod model;
pub mod note;

pub use model::Chart;
pub use note::{Note, NoteData, NoteId, NoteKind};

/// Number of parallel lanes.
pub const LANES: usize = 5;

/// Rows in one sector, the unit of chart growth.
pub const ROWS_PER_SECTOR: u32 = 16;

/// Tempo of a freshly created chart.
pub const DEFAULT_BPM: f64 = 120.0;

/// Sectors of a freshly created chart.
pub const DEFAULT_SECTOR_COUNT: u32 = 4;

//! Tick/Time Conversion
//!
//! Pure functions between rows, tempo and the integer tick grid used by the
//! preview export. The grid has four rows per beat.

use crate::chart::ROWS_PER_SECTOR;

/// Rows per beat of the editing grid.
const ROWS_PER_BEAT: f64 = ROWS_PER_SECTOR as f64 / 4.0;

/// Subdivisions per beat used for the export tick rate.
const TICK_SUBDIVISIONS: f64 = 4.0;

/// Decimal places kept before rationalizing the beat rate.
///
/// Beat rates that are not exactly representable (e.g. 100 bpm → 6.666…) are
/// rounded to hundredths first, so the multiplier is always a divisor of 100.
const RATIONALIZE_SCALE: u64 = 100;

/// Tolerance for products that should be integers but land just below one.
const FLOOR_EPSILON: f64 = 1e-9;

/// Scroll rate in rows per second.
///
/// # Example
/// ```
/// use rhythm_chart::timing::rows_per_second_at;
/// assert_eq!(rows_per_second_at(120.0), 8.0);
/// ```
pub fn rows_per_second_at(bpm: f64) -> f64 {
    (bpm / 60.0) * ROWS_PER_BEAT
}

/// Smallest positive integer `m` such that `(bpm / 60) * 4 * m` is an integer,
/// after rounding the beat rate to two decimal places.
///
/// # Example
/// ```
/// use rhythm_chart::timing::integer_tick_multiplier;
/// assert_eq!(integer_tick_multiplier(120.0), 1);
/// assert_eq!(integer_tick_multiplier(127.5), 2);
/// assert_eq!(integer_tick_multiplier(100.0), 100);
/// ```
pub fn integer_tick_multiplier(bpm: f64) -> u64 {
    let rate = subdivision_rate(bpm);
    if rate.fract() == 0.0 {
        return 1;
    }

    let numerator = (rate * RATIONALIZE_SCALE as f64).round() as u64;
    RATIONALIZE_SCALE / gcd(numerator, RATIONALIZE_SCALE)
}

/// Integer ticks per second of the export grid.
pub fn tick_rate(bpm: f64) -> u64 {
    let scaled = subdivision_rate(bpm) * integer_tick_multiplier(bpm) as f64;
    (scaled + FLOOR_EPSILON).floor() as u64
}

/// Export tick of a row.
pub fn row_to_tick(row: u32, bpm: f64) -> u64 {
    u64::from(row) * integer_tick_multiplier(bpm)
}

/// Rows scrolled after `elapsed_ms` milliseconds of playback.
pub fn ms_to_rows(elapsed_ms: f64, bpm: f64) -> f64 {
    rows_per_second_at(bpm) * (elapsed_ms / 1000.0)
}

/// Milliseconds of playback until the cursor reaches `row`.
pub fn row_to_ms(row: f64, bpm: f64) -> f64 {
    row / rows_per_second_at(bpm) * 1000.0
}

fn subdivision_rate(bpm: f64) -> f64 {
    (bpm / 60.0) * TICK_SUBDIVISIONS
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

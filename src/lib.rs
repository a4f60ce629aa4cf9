//! Rhythm Chart - core of a lane-based rhythm game chart editor
//!
//! Charts are notes placed on a grid of lanes and rows, grouped into
//! fixed-size sectors, previewed by scrolling in time with a song.
//!
//! # Architecture
//!
//! - Chart model: notes, tempo and sectors with their overlap invariants
//! - Editing state machine: lane/row activations → chart mutations
//! - Playback timeline: virtual clock, derived cursor, audio transport commands
//! - Persistence: project archives and the preview export
//!
//! [`workspace::Workspace`] ties them together as one owned state object.

pub mod chart;
pub mod cli;
pub mod config;
pub mod editor;
pub mod engine;
pub mod error;
pub mod persist;
pub mod song;
pub mod timing;
pub mod workspace;

pub use error::{ChartError, Result};

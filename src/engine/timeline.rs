//! Playback Timeline
//!
//! A virtual clock for previewing the chart. `elapsed_ms` advances only from
//! the frame loop; the cursor position is always derived from it, so the two
//! can never drift apart. They can drift from the audio engine's own clock,
//! which is accepted.
//!
//! ```text
//! Stopped --play--> Playing <--pause/play--> Paused
//! Playing/Paused --stop--> Stopped
//! ```

use std::fmt;

use tracing::debug;

use super::transport::{AudioTransport, TransportCommand};
use crate::timing::ms_to_rows;

/// Snapshot of the preview session.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackState {
    /// A preview session is open (cursor visible, editing locked).
    pub started: bool,
    /// The virtual clock is advancing.
    pub playing: bool,
    /// Milliseconds of playback since the session opened.
    pub elapsed_ms: f64,
}

impl PlaybackState {
    pub fn phase(&self) -> PlaybackPhase {
        match (self.started, self.playing) {
            (_, true) => PlaybackPhase::Playing,
            (true, false) => PlaybackPhase::Paused,
            (false, false) => PlaybackPhase::Stopped,
        }
    }
}

/// Named states of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    Stopped,
    Playing,
    Paused,
}

impl fmt::Display for PlaybackPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackPhase::Stopped => write!(f, "Stopped"),
            PlaybackPhase::Playing => write!(f, "Playing"),
            PlaybackPhase::Paused => write!(f, "Paused"),
        }
    }
}

/// Owns the preview state and the transport of the loaded song.
#[derive(Default)]
pub struct PlaybackTimeline {
    state: PlaybackState,
    transport: Option<Box<dyn AudioTransport>>,
}

impl fmt::Debug for PlaybackTimeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackTimeline")
            .field("state", &self.state)
            .field("has_transport", &self.transport.is_some())
            .finish()
    }
}

impl PlaybackTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the transport of a newly loaded song, replacing any previous one.
    pub fn set_transport(&mut self, transport: Box<dyn AudioTransport>) {
        self.transport = Some(transport);
    }

    /// Detach the transport; subsequent commands become no-ops.
    pub fn clear_transport(&mut self) -> Option<Box<dyn AudioTransport>> {
        self.transport.take()
    }

    pub fn has_transport(&self) -> bool {
        self.transport.is_some()
    }

    // ========================================================================
    // Controls
    // ========================================================================

    /// Start or resume playback.
    ///
    /// Opening a new session (from Stopped) resets the clock to zero. Calling
    /// this while already playing does nothing, and in particular does not
    /// send a second `Play` to the transport.
    ///
    /// # Example
    /// ```
    /// use rhythm_chart::engine::{PlaybackPhase, PlaybackTimeline};
    /// let mut timeline = PlaybackTimeline::new();
    /// timeline.play();
    /// assert_eq!(timeline.phase(), PlaybackPhase::Playing);
    /// assert!(timeline.state().started);
    /// ```
    pub fn play(&mut self) {
        match self.phase() {
            PlaybackPhase::Playing => {
                debug!("[TIMELINE] Already playing");
                return;
            }
            PlaybackPhase::Stopped => {
                self.state.started = true;
                self.state.elapsed_ms = 0.0;
                debug!("[TIMELINE] Preview started");
            }
            PlaybackPhase::Paused => {
                debug!(elapsed_ms = self.state.elapsed_ms, "[TIMELINE] Resumed");
            }
        }
        self.state.playing = true;
        self.send(TransportCommand::Play);
    }

    /// Freeze the clock, keeping the session open.
    pub fn pause(&mut self) {
        self.state.playing = false;
        debug!(elapsed_ms = self.state.elapsed_ms, "[TIMELINE] Paused");
        self.send(TransportCommand::Pause);
    }

    /// Close the session. The elapsed time is kept until the next session opens.
    pub fn stop(&mut self) {
        self.state.playing = false;
        self.state.started = false;
        debug!("[TIMELINE] Stopped");
        self.send(TransportCommand::Stop);
    }

    /// Jump to a position within an open session. Ignored when stopped.
    pub fn seek(&mut self, position_ms: f64) {
        if !self.state.started {
            debug!("[TIMELINE] Seek ignored, no preview session");
            return;
        }
        let position_ms = position_ms.max(0.0);
        self.state.elapsed_ms = position_ms;
        debug!(position_ms, "[TIMELINE] Seek");
        self.send(TransportCommand::Seek(position_ms));
    }

    /// Add wall-clock time to the clock. Only the frame loop calls this.
    pub(crate) fn advance(&mut self, delta_ms: f64) {
        if self.state.playing {
            self.state.elapsed_ms += delta_ms;
        }
    }

    // ========================================================================
    // State Queries
    // ========================================================================

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.state.phase()
    }

    pub fn is_playing(&self) -> bool {
        self.state.playing
    }

    pub fn is_started(&self) -> bool {
        self.state.started
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.state.elapsed_ms
    }

    /// Rows between the bottom of the chart and the playback cursor.
    pub fn cursor_rows(&self, bpm: f64) -> f64 {
        ms_to_rows(self.state.elapsed_ms, bpm)
    }

    fn send(&mut self, command: TransportCommand) {
        if let Some(transport) = self.transport.as_mut() {
            transport.send(command);
        }
    }
}

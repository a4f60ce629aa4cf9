//! Frame loop
//!
//! The host calls [`FrameLoop::on_frame`] once per rendered frame while
//! [`FrameControl::Continue`] comes back. Each call receives the timeline
//! itself and reads `playing` before doing anything else, so a `stop()` or
//! `pause()` that lands between two frames ends the loop on the very next
//! call and no further frame is requested.

use tracing::debug;

use super::clock::Clock;
use super::timeline::PlaybackTimeline;

/// Whether the host should schedule another frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    Continue,
    Cancel,
}

/// Advances a [`PlaybackTimeline`] by wall-clock deltas.
#[derive(Debug, Clone, Default)]
pub struct FrameLoop {
    last_frame_ms: Option<f64>,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of a run so the first frame measures from `now_ms`.
    ///
    /// Call right after `play()`.
    pub fn arm(&mut self, now_ms: f64) {
        self.last_frame_ms = Some(now_ms);
    }

    pub fn is_armed(&self) -> bool {
        self.last_frame_ms.is_some()
    }

    /// Handle one frame.
    ///
    /// Without a prior [`arm`](Self::arm) the first frame of a run only records
    /// its timestamp.
    pub fn on_frame(&mut self, timeline: &mut PlaybackTimeline, now_ms: f64) -> FrameControl {
        if !timeline.is_playing() {
            if self.last_frame_ms.take().is_some() {
                debug!("[FRAME] Loop cancelled");
            }
            return FrameControl::Cancel;
        }

        if let Some(last) = self.last_frame_ms {
            timeline.advance((now_ms - last).max(0.0));
        }
        self.last_frame_ms = Some(now_ms);
        FrameControl::Continue
    }

    /// Convenience wrapper reading the time from a [`Clock`].
    pub fn tick(&mut self, timeline: &mut PlaybackTimeline, clock: &dyn Clock) -> FrameControl {
        self.on_frame(timeline, clock.now_ms())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::clock::ManualClock;

    #[test]
    fn test_accumulates_deltas() {
        let clock = ManualClock::new();
        let mut timeline = PlaybackTimeline::new();
        let mut frames = FrameLoop::new();

        timeline.play();
        frames.arm(clock.now_ms());
        for _ in 0..3 {
            clock.advance(16.0);
            assert_eq!(frames.tick(&mut timeline, &clock), FrameControl::Continue);
        }
        assert_eq!(timeline.elapsed_ms(), 48.0);
    }

    #[test]
    fn test_unarmed_first_frame_only_records() {
        let mut timeline = PlaybackTimeline::new();
        let mut frames = FrameLoop::new();
        timeline.play();

        frames.on_frame(&mut timeline, 1000.0);
        assert_eq!(timeline.elapsed_ms(), 0.0);
        frames.on_frame(&mut timeline, 1020.0);
        assert_eq!(timeline.elapsed_ms(), 20.0);
    }

    #[test]
    fn test_stop_between_frames_cancels_next_frame() {
        let clock = ManualClock::new();
        let mut timeline = PlaybackTimeline::new();
        let mut frames = FrameLoop::new();

        timeline.play();
        frames.arm(clock.now_ms());
        clock.advance(10.0);
        frames.tick(&mut timeline, &clock);

        timeline.stop();
        clock.advance(10.0);
        assert_eq!(frames.tick(&mut timeline, &clock), FrameControl::Cancel);
        assert_eq!(timeline.elapsed_ms(), 10.0);
        assert!(!frames.is_armed());
    }

    #[test]
    fn test_pause_gap_not_counted() {
        let clock = ManualClock::new();
        let mut timeline = PlaybackTimeline::new();
        let mut frames = FrameLoop::new();

        timeline.play();
        frames.arm(clock.now_ms());
        clock.advance(100.0);
        frames.tick(&mut timeline, &clock);

        timeline.pause();
        clock.advance(5000.0);
        assert_eq!(frames.tick(&mut timeline, &clock), FrameControl::Cancel);

        timeline.play();
        frames.arm(clock.now_ms());
        clock.advance(50.0);
        frames.tick(&mut timeline, &clock);
        assert_eq!(timeline.elapsed_ms(), 150.0);
    }

    #[test]
    fn test_clock_going_backwards_is_clamped() {
        let mut timeline = PlaybackTimeline::new();
        let mut frames = FrameLoop::new();
        timeline.play();
        frames.arm(500.0);
        frames.on_frame(&mut timeline, 400.0);
        assert_eq!(timeline.elapsed_ms(), 0.0);
    }
}

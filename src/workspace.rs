//! Editor workspace
//!
//! One owned object holding everything an editing session needs: the chart,
//! the editor session, the playback timeline and the loaded song. Hosts pass
//! it around by reference instead of reaching for global stores.

use tracing::{debug, info};

use crate::chart::Chart;
use crate::editor::{EditOutcome, EditorMode, EditorSession};
use crate::engine::{FrameControl, FrameLoop, PlaybackTimeline, TransportFactory};
use crate::error::Result;
use crate::persist::{self, Archive, ExportTable, ProjectData};
use crate::song::Song;

#[derive(Default)]
pub struct Workspace {
    chart: Chart,
    session: EditorSession,
    timeline: PlaybackTimeline,
    frames: FrameLoop,
    song: Option<Song>,
    transports: Option<Box<dyn TransportFactory>>,
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("chart", &self.chart)
            .field("session", &self.session)
            .field("timeline", &self.timeline)
            .field("song", &self.song)
            .finish()
    }
}

impl Workspace {
    pub fn new(chart: Chart) -> Self {
        Self {
            chart,
            ..Self::default()
        }
    }

    /// Use `factory` to build a transport whenever a song is attached.
    pub fn with_transport_factory(mut self, factory: Box<dyn TransportFactory>) -> Self {
        self.transports = Some(factory);
        self
    }

    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    /// Direct access for tempo and sector operations.
    pub fn chart_mut(&mut self) -> &mut Chart {
        &mut self.chart
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub fn timeline(&self) -> &PlaybackTimeline {
        &self.timeline
    }

    pub fn song(&self) -> Option<&Song> {
        self.song.as_ref()
    }

    // ========================================================================
    // Editing
    // ========================================================================

    pub fn set_mode(&mut self, mode: EditorMode) {
        self.session.set_mode(mode);
    }

    /// Activate a cell. Locked while a preview session is open.
    pub fn activate(&mut self, lane: usize, row: u32) -> EditOutcome {
        let playback = self.timeline.state();
        self.session.activate(&mut self.chart, &playback, lane, row)
    }

    // ========================================================================
    // Playback
    // ========================================================================

    pub fn play(&mut self, now_ms: f64) {
        self.timeline.play();
        self.frames.arm(now_ms);
    }

    pub fn pause(&mut self) {
        self.timeline.pause();
    }

    pub fn stop(&mut self) {
        self.timeline.stop();
    }

    pub fn seek(&mut self, position_ms: f64) {
        self.timeline.seek(position_ms);
    }

    /// Frame callback; see [`FrameLoop::on_frame`].
    pub fn frame(&mut self, now_ms: f64) -> FrameControl {
        self.frames.on_frame(&mut self.timeline, now_ms)
    }

    /// Cursor offset from the bottom of the chart, in rows.
    pub fn cursor_rows(&self) -> f64 {
        self.timeline.cursor_rows(self.chart.bpm())
    }

    // ========================================================================
    // Song and project
    // ========================================================================

    /// Replace the song. Playback stops and the transport is rebuilt.
    pub fn set_song(&mut self, song: Option<Song>) {
        self.timeline.stop();
        self.timeline.clear_transport();
        if let (Some(song), Some(factory)) = (song.as_ref(), self.transports.as_ref()) {
            self.timeline.set_transport(factory.open(song));
        }
        match &song {
            Some(song) => info!(filename = %song.filename(), "song attached"),
            None => debug!("song cleared"),
        }
        self.song = song;
    }

    /// Replace the chart and song with decoded project data.
    ///
    /// Nothing changes if the data is rejected.
    pub fn load_project(&mut self, data: ProjectData) -> Result<()> {
        self.chart.load_project(&data.notes, data.bpm)?;
        self.set_song(data.song);
        self.session.clear_anchor();
        Ok(())
    }

    /// Decode and load an archive. Format errors leave the workspace untouched.
    pub fn load_archive(&mut self, archive: &Archive) -> Result<()> {
        let data = persist::deserialize(archive)?;
        self.load_project(data)
    }

    pub fn save_archive(&self) -> Result<Archive> {
        Ok(persist::serialize(&self.chart, self.song.as_ref())?)
    }

    pub fn export_preview(&self) -> ExportTable {
        persist::export_preview(&self.chart)
    }
}

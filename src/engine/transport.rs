//! Audio transport boundary
//!
//! The audio engine is an external collaborator. The timeline only sends it
//! fire-and-forget commands; nothing it does (or fails to do) flows back into
//! timeline state.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::info;

use crate::song::Song;

/// Commands the timeline issues to the audio engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransportCommand {
    Play,
    Pause,
    Stop,
    /// Seek to a position in milliseconds from the start of the song.
    Seek(f64),
}

impl fmt::Display for TransportCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportCommand::Play => write!(f, "play"),
            TransportCommand::Pause => write!(f, "pause"),
            TransportCommand::Stop => write!(f, "stop"),
            TransportCommand::Seek(ms) => write!(f, "seek({:.1}ms)", ms),
        }
    }
}

/// An audio engine that can play the loaded song.
///
/// Implementations must not block and have no way to report failure; a
/// transport that could not start simply stays silent while the timeline
/// keeps running.
pub trait AudioTransport {
    fn play(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    fn seek(&mut self, position_ms: f64);

    /// Dispatch a [`TransportCommand`].
    fn send(&mut self, command: TransportCommand) {
        match command {
            TransportCommand::Play => self.play(),
            TransportCommand::Pause => self.pause(),
            TransportCommand::Stop => self.stop(),
            TransportCommand::Seek(ms) => self.seek(ms),
        }
    }
}

/// Builds a transport for a freshly loaded song (decoding is its business).
pub trait TransportFactory {
    fn open(&self, song: &Song) -> Box<dyn AudioTransport>;
}

/// Transport that records every command, for hosts that replay them later
/// and for tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    log: Rc<RefCell<Vec<TransportCommand>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared view of the command log that outlives the boxed transport.
    pub fn handle(&self) -> Rc<RefCell<Vec<TransportCommand>>> {
        Rc::clone(&self.log)
    }

    pub fn commands(&self) -> Vec<TransportCommand> {
        self.log.borrow().clone()
    }
}

impl AudioTransport for RecordingTransport {
    fn play(&mut self) {
        self.log.borrow_mut().push(TransportCommand::Play);
    }

    fn pause(&mut self) {
        self.log.borrow_mut().push(TransportCommand::Pause);
    }

    fn stop(&mut self) {
        self.log.borrow_mut().push(TransportCommand::Stop);
    }

    fn seek(&mut self, position_ms: f64) {
        self.log.borrow_mut().push(TransportCommand::Seek(position_ms));
    }
}

/// Transport that only logs, used by the command line preview.
#[derive(Debug, Clone)]
pub struct LoggingTransport {
    filename: String,
}

impl LoggingTransport {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
        }
    }
}

impl AudioTransport for LoggingTransport {
    fn play(&mut self) {
        info!(song = %self.filename, "[TRANSPORT] play");
    }

    fn pause(&mut self) {
        info!(song = %self.filename, "[TRANSPORT] pause");
    }

    fn stop(&mut self) {
        info!(song = %self.filename, "[TRANSPORT] stop");
    }

    fn seek(&mut self, position_ms: f64) {
        info!(song = %self.filename, position_ms, "[TRANSPORT] seek");
    }
}

/// Factory producing [`LoggingTransport`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingTransportFactory;

impl TransportFactory for LoggingTransportFactory {
    fn open(&self, song: &Song) -> Box<dyn AudioTransport> {
        Box::new(LoggingTransport::new(song.metadata.filename.clone()))
    }
}

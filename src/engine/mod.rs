//! Playback Timeline Engine
//!
//! Preview playback for the chart:
//! - Timeline state machine and derived cursor
//! - Frame loop driving the virtual clock
//! - Audio transport boundary

pub mod clock;
pub mod frame;
pub mod timeline;
pub mod transport;

pub use clock::{Clock, ManualClock, SystemClock};
pub use frame::{FrameControl, FrameLoop};
pub use timeline::{PlaybackPhase, PlaybackState, PlaybackTimeline};
pub use transport::{
    AudioTransport, LoggingTransport, LoggingTransportFactory, RecordingTransport,
    TransportCommand, TransportFactory,
};

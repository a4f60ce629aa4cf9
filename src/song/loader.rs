//! Background song loading
//!
//! Reading a song can take a while, and the user may pick another file before
//! the first one finishes. Every request gets a ticket; only a result carrying
//! the newest ticket may be committed, older completions are dropped.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tracing::{debug, warn};

use super::Song;
use crate::error::{ChartError, Result};

/// Identifies one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

type Completion = (LoadTicket, Result<Song>);

/// Issues load tickets and filters stale completions.
#[derive(Debug)]
pub struct SongLoader {
    latest: u64,
    in_flight: usize,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl Default for SongLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SongLoader {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            latest: 0,
            in_flight: 0,
            tx,
            rx,
        }
    }

    /// Start a new request, superseding every earlier one.
    pub fn begin(&mut self) -> LoadTicket {
        self.latest += 1;
        LoadTicket(self.latest)
    }

    /// Invalidate all outstanding requests without starting a new one.
    pub fn cancel(&mut self) {
        self.begin();
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.latest
    }

    /// Filter a completion. Returns `None` for a stale ticket.
    pub fn complete(&self, ticket: LoadTicket, result: Result<Song>) -> Option<Result<Song>> {
        if !self.is_current(ticket) {
            warn!(
                ticket = ticket.0,
                latest = self.latest,
                "discarding stale song load"
            );
            return None;
        }
        Some(result)
    }

    /// Read a song file on a background thread.
    pub fn spawn_load(&mut self, path: &Path) -> LoadTicket {
        let ticket = self.begin();
        let tx = self.tx.clone();
        self.in_flight += 1;
        let path = path.to_path_buf();
        debug!(ticket = ticket.0, path = %path.display(), "song load started");

        thread::spawn(move || {
            let result = read_song(&path);
            // The loader may have been dropped; nobody is waiting then.
            let _ = tx.send((ticket, result));
        });
        ticket
    }

    /// Collect finished loads, returning the result of the current request if
    /// it has arrived.
    pub fn poll(&mut self) -> Option<Result<Song>> {
        let mut current = None;
        while let Ok((ticket, result)) = self.rx.try_recv() {
            self.in_flight -= 1;
            if let Some(result) = self.complete(ticket, result) {
                current = Some(result);
            }
        }
        current
    }

    /// Block until the current request completes.
    ///
    /// Returns `None` once no spawned load is left in flight.
    pub fn wait(&mut self) -> Option<Result<Song>> {
        while self.in_flight > 0 {
            let Ok((ticket, result)) = self.rx.recv() else {
                break;
            };
            self.in_flight -= 1;
            if let Some(result) = self.complete(ticket, result) {
                return Some(result);
            }
        }
        None
    }
}

/// Read a song file synchronously.
pub fn read_song(path: &Path) -> Result<Song> {
    let bytes = fs::read(path).map_err(|e| ChartError::FileReadError {
        path: PathBuf::from(path),
        source: e,
    })?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "song".to_string());
    Ok(Song::new(filename, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_latest_ticket_wins() {
        let mut loader = SongLoader::new();
        let first = loader.begin();
        let second = loader.begin();

        assert!(loader
            .complete(first, Ok(Song::new("old.mp3", vec![1u8])))
            .is_none());
        let committed = loader
            .complete(second, Ok(Song::new("new.mp3", vec![2u8])))
            .unwrap()
            .unwrap();
        assert_eq!(committed.filename(), "new.mp3");
    }

    #[test]
    fn test_cancel_invalidates_pending() {
        let mut loader = SongLoader::new();
        let ticket = loader.begin();
        loader.cancel();
        assert!(!loader.is_current(ticket));
    }

    #[test]
    fn test_spawn_load_reads_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("beat.mp3");
        fs::write(&path, b"ID3fake").unwrap();

        let mut loader = SongLoader::new();
        loader.spawn_load(&path);
        let song = loader.wait().unwrap().unwrap();
        assert_eq!(song.filename(), "beat.mp3");
        assert_eq!(song.bytes(), b"ID3fake");
    }

    #[test]
    fn test_stale_background_load_discarded() {
        let dir = tempdir().unwrap();
        let old = dir.path().join("old.mp3");
        let new = dir.path().join("new.mp3");
        fs::write(&old, b"old").unwrap();
        fs::write(&new, b"new").unwrap();

        let mut loader = SongLoader::new();
        loader.spawn_load(&old);
        loader.spawn_load(&new);
        let song = loader.wait().unwrap().unwrap();
        assert_eq!(song.filename(), "new.mp3");
    }

    #[test]
    fn test_wait_without_requests() {
        let mut loader = SongLoader::new();
        assert!(loader.wait().is_none());
        assert!(loader.poll().is_none());
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempdir().unwrap();
        let mut loader = SongLoader::new();
        loader.spawn_load(&dir.path().join("missing.mp3"));
        assert!(matches!(
            loader.wait(),
            Some(Err(ChartError::FileReadError { .. }))
        ));
    }
}

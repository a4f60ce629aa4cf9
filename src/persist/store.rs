//! Project directory storage
//!
//! Persists an [`Archive`] as a directory with one file per entry. Packing the
//! directory into a single compressed file is left to the host.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::archive::{Archive, CHART_ENTRY, SONG_ENTRY};
use crate::error::{ChartError, Result};

/// Entries a project directory may hold.
const KNOWN_ENTRIES: [&str; 2] = [CHART_ENTRY, SONG_ENTRY];

/// Reads and writes archives in a project directory.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    project_path: PathBuf,
}

impl ProjectStore {
    pub fn new(project_path: &Path) -> Self {
        Self {
            project_path: project_path.to_path_buf(),
        }
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    /// Whether the directory holds a chart document.
    pub fn exists(&self) -> bool {
        self.project_path.join(CHART_ENTRY).is_file()
    }

    /// Write every entry, removing known entries the archive no longer has.
    pub fn save(&self, archive: &Archive) -> Result<()> {
        fs::create_dir_all(&self.project_path).map_err(|e| ChartError::FileWriteError {
            path: self.project_path.clone(),
            source: e,
        })?;

        for (name, bytes) in archive.entries() {
            let path = self.project_path.join(name);
            fs::write(&path, bytes).map_err(|e| ChartError::FileWriteError { path, source: e })?;
        }

        for name in KNOWN_ENTRIES {
            let path = self.project_path.join(name);
            if !archive.contains(name) && path.exists() {
                fs::remove_file(&path)
                    .map_err(|e| ChartError::FileWriteError { path, source: e })?;
            }
        }

        debug!(path = %self.project_path.display(), entries = archive.len(), "project saved");
        Ok(())
    }

    /// Read the known entries present in the directory.
    pub fn load(&self) -> Result<Archive> {
        if !self.project_path.is_dir() {
            return Err(ChartError::ProjectNotFound {
                path: self.project_path.clone(),
            });
        }

        let mut archive = Archive::new();
        for name in KNOWN_ENTRIES {
            let path = self.project_path.join(name);
            if !path.is_file() {
                continue;
            }
            let bytes = fs::read(&path).map_err(|e| ChartError::FileReadError {
                path: path.clone(),
                source: e,
            })?;
            archive.insert(name, bytes);
        }

        debug!(path = %self.project_path.display(), entries = archive.len(), "project read");
        Ok(archive)
    }
}

//! Current vs. last-recorded host version

use crate::config::VERSION_MARKER_FILE;
use crate::paths;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Versions seen by this session and the backup directories they map to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRecord {
    /// Version reported by the host right now
    pub current_version: String,
    /// Version recorded by the previous session (or `current_version` if unknown)
    pub last_version: String,
    /// `<backup>/<current_version>`
    pub current_version_path: PathBuf,
    /// `<backup>/<last_version>`
    pub last_version_path: PathBuf,
}

impl VersionRecord {
    /// Whether the host version differs from the recorded one
    #[must_use]
    pub fn version_changed(&self) -> bool {
        self.current_version != self.last_version
    }
}

/// Reads and writes the one-line version marker in the live data directory
#[derive(Debug, Clone)]
pub struct VersionResolver {
    marker_path: PathBuf,
    backup_root: PathBuf,
}

impl VersionResolver {
    pub fn new(marker_path: impl Into<PathBuf>, backup_root: impl Into<PathBuf>) -> Self {
        Self {
            marker_path: marker_path.into(),
            backup_root: backup_root.into(),
        }
    }

    /// Path of the version marker file
    #[must_use]
    pub fn marker_path(&self) -> &Path {
        &self.marker_path
    }

    /// Whether the marker file is present
    #[must_use]
    pub fn marker_exists(&self) -> bool {
        self.marker_path.is_file()
    }

    /// Build the version record for this session
    ///
    /// An absent, empty or unreadable marker means "same version as now".
    #[must_use]
    pub fn resolve(&self, current_version: &str) -> VersionRecord {
        let current_version_path = paths::version_dir(&self.backup_root, current_version);

        let record = match self.read_marker() {
            Some(last_version) => VersionRecord {
                current_version: current_version.to_string(),
                last_version_path: paths::version_dir(&self.backup_root, &last_version),
                last_version,
                current_version_path,
            },
            None => VersionRecord {
                current_version: current_version.to_string(),
                last_version: current_version.to_string(),
                last_version_path: current_version_path.clone(),
                current_version_path,
            },
        };

        info!("Current Version {}", record.current_version);
        info!("Last Version {}", record.last_version);
        record
    }

    fn read_marker(&self) -> Option<String> {
        if !self.marker_path.exists() {
            return None;
        }

        match crate::error::read_to_string(&self.marker_path) {
            Ok(content) => content
                .lines()
                .next()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
            Err(e) => {
                warn!("Unable to read version marker, assuming unchanged version: {e}");
                None
            }
        }
    }

    /// Record `version` as the last seen version
    ///
    /// Failures are retried up to `attempts` times in total and then only
    /// logged: a stale marker degrades to "same version" on the next run.
    /// Returns whether the marker was written.
    pub fn write_marker(&self, version: &str, attempts: u32) -> bool {
        info!("Creating version file");

        let attempts = attempts.max(1);
        let mut first_error = None;
        for _ in 0..attempts {
            match crate::error::write_file(&self.marker_path, version) {
                Ok(()) => {
                    if first_error.is_some() {
                        warn!("{VERSION_MARKER_FILE} overwritten after a failed attempt");
                    }
                    return true;
                }
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        if let Some(e) = first_error {
            warn!("Failed to overwrite version marker: {e}");
        }
        false
    }

    /// Delete the marker so it cannot go stale while per-version saving is off
    pub fn remove_marker(&self) {
        if let Err(e) = crate::fs_ops::delete_file(&self.marker_path) {
            warn!("Unable to delete version marker: {e}");
        }
    }
}

/// Resolve versions using the default marker file inside `data_dir`
#[must_use]
pub fn resolve(data_dir: &Path, backup_root: &Path, current_version: &str) -> VersionRecord {
    VersionResolver::new(data_dir.join(VERSION_MARKER_FILE), backup_root).resolve(current_version)
}

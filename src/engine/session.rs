//! Per-session context carried between startup and shutdown

use crate::version::VersionRecord;
use std::fmt;
use std::path::PathBuf;

/// Lifecycle position of a [`BackupEngine`](super::BackupEngine)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineState {
    #[default]
    Idle,
    Resolving,
    Reconciling,
    SessionActive,
    ShuttingDown,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineState::Idle => "idle",
            EngineState::Resolving => "resolving",
            EngineState::Reconciling => "reconciling",
            EngineState::SessionActive => "session active",
            EngineState::ShuttingDown => "shutting down",
        };
        f.write_str(name)
    }
}

/// Everything one host session decided at startup
///
/// Created by `startup`, consumed by `shutdown`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub record: VersionRecord,

    /// Per-version saving as it was when the session started
    pub per_version_at_startup: bool,

    /// Startup reconciliation ran, so shutdown folds live saves back
    pub reconciled: bool,

    /// Crash sentinel to delete at shutdown
    pub sentinel: Option<PathBuf>,

    /// Staging directory receiving displaced files for the whole session
    pub overwrite_dir: PathBuf,

    /// The user created at least one backup this session
    pub user_backups_created: bool,

    /// A restore-safety snapshot was already taken this session
    pub safety_snapshot_taken: bool,

    /// The previous session did not shut down cleanly
    pub unclean_shutdown_detected: bool,
}

impl Session {
    pub(crate) fn new(
        record: VersionRecord,
        per_version_at_startup: bool,
        overwrite_dir: PathBuf,
    ) -> Self {
        Self {
            record,
            per_version_at_startup,
            reconciled: false,
            sentinel: None,
            overwrite_dir,
            user_backups_created: false,
            safety_snapshot_taken: false,
            unclean_shutdown_detected: false,
        }
    }
}

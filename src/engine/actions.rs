//! User-triggered actions: status reporting and rate limiting

use crate::transfer::TransferOutcome;
use std::fmt;
use std::path::PathBuf;

/// Frame counter that blocks repeated submissions of the same action
///
/// Not a queue: a request made while the counter runs is rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionCooldown {
    remaining: u32,
}

impl ActionCooldown {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.remaining == 0
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Start blocking for `frames` host frames
    pub fn start(&mut self, frames: u32) {
        self.remaining = frames;
    }

    /// Advance one host frame
    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }
}

/// Result of a manual backup or restore request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionStatus {
    /// A user backup was written to the given directory
    BackupCreated(PathBuf),
    /// Live saves were replaced from `source`; the host must reload them
    Restored {
        source: PathBuf,
        outcome: TransferOutcome,
    },
    NothingToBackup,
    NothingToRestore,
    CooldownActive,
    /// `startup` has not run, or `shutdown` already did
    NotRunning,
    /// The operation failed; details are in the log
    Failed(String),
}

impl ActionStatus {
    /// Text to show the user
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            ActionStatus::BackupCreated(_) => "Process complete - Backup restore state has changed",
            ActionStatus::Restored { .. } => "Save states have been reloaded",
            ActionStatus::NothingToBackup => "No save files to back up",
            ActionStatus::NothingToRestore => "Nothing to restore",
            ActionStatus::CooldownActive => "Operation could not be applied. Cooldown ACTIVE",
            ActionStatus::NotRunning => "Save manager is not running",
            ActionStatus::Failed(_) => "Operation failed, see the log for details",
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            ActionStatus::BackupCreated(_) | ActionStatus::Restored { .. }
        )
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

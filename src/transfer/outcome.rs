//! Aggregated result of a save set transfer

use std::fmt;

/// What went wrong across a whole transfer, folded into one value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferOutcome {
    /// Every attempted copy succeeded, or nothing needed copying
    #[default]
    Ok,
    /// At least one copy into the destination failed
    CopyFailed,
    /// At least one move into the staging area failed
    StageFailed,
    /// Both kinds of failure occurred
    MixedFailure,
}

/// Kind of single-file failure fed into [`TransferOutcome::record`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Copy,
    Stage,
}

impl TransferOutcome {
    /// Fold another failure into the outcome
    #[must_use]
    pub fn record(self, failure: FailureKind) -> Self {
        match (self, failure) {
            (TransferOutcome::Ok, FailureKind::Copy) => TransferOutcome::CopyFailed,
            (TransferOutcome::Ok, FailureKind::Stage) => TransferOutcome::StageFailed,
            (TransferOutcome::CopyFailed, FailureKind::Copy) => TransferOutcome::CopyFailed,
            (TransferOutcome::StageFailed, FailureKind::Stage) => TransferOutcome::StageFailed,
            _ => TransferOutcome::MixedFailure,
        }
    }

    #[must_use]
    pub fn is_ok(self) -> bool {
        self == TransferOutcome::Ok
    }

    /// One-line description used for the aggregated warning
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            TransferOutcome::Ok => "Save files transferred",
            TransferOutcome::CopyFailed => "One or more save files failed to copy",
            TransferOutcome::StageFailed => {
                "One or more save files failed to move to the overwrite backup directory"
            }
            TransferOutcome::MixedFailure => "Multiple issues occurred while copying save files",
        }
    }
}

impl fmt::Display for TransferOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Per-file tally of a transfer alongside its folded outcome
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferReport {
    pub outcome: TransferOutcome,
    /// Files copied into the destination
    pub copied: Vec<String>,
    /// Destination files moved into the staging area first
    pub staged: Vec<String>,
    /// Files that failed at either step
    pub failed: Vec<String>,
}

impl TransferReport {
    pub(crate) fn fail(&mut self, name: &str, kind: FailureKind) {
        self.outcome = self.outcome.record(kind);
        if !self.failed.iter().any(|n| n == name) {
            self.failed.push(name.to_string());
        }
    }

    /// Merge another report into this one
    pub(crate) fn absorb(&mut self, other: TransferReport) {
        for kind in [FailureKind::Copy, FailureKind::Stage] {
            let hit = match kind {
                FailureKind::Copy => matches!(
                    other.outcome,
                    TransferOutcome::CopyFailed | TransferOutcome::MixedFailure
                ),
                FailureKind::Stage => matches!(
                    other.outcome,
                    TransferOutcome::StageFailed | TransferOutcome::MixedFailure
                ),
            };
            if hit {
                self.outcome = self.outcome.record(kind);
            }
        }
        self.copied.extend(other.copied);
        self.staged.extend(other.staged);
        for name in other.failed {
            if !self.failed.contains(&name) {
                self.failed.push(name);
            }
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

//! Hooks the host calls from its own save routines

use super::BackupEngine;
use crate::error::create_dir;
use crate::fs_ops;
use crate::transfer::{FailureKind, TransferOutcome};
use log::{debug, warn};
use std::path::{Path, PathBuf};

impl BackupEngine {
    /// Correct the directory the host's own "copy saves" routine writes to
    ///
    /// Returns `base/<hostVersion>` while per-version saving is on.
    #[must_use]
    pub fn redirect_backup_path(&self, base: &Path) -> PathBuf {
        if self.settings.per_version_saving() {
            base.join(&self.config.host_version)
        } else {
            base.to_path_buf()
        }
    }

    /// Copy one live save file into `dest_dir` on behalf of the host
    ///
    /// An existing destination is overwritten instead of failing, and the
    /// declared companions of `name` are copied along with it. Missing live
    /// files are skipped.
    pub fn host_copy_save_file(&self, name: &str, dest_dir: &Path) -> TransferOutcome {
        let files = self.transfer.files();
        let names = std::iter::once(name)
            .chain(files.companions_of(name).iter().map(String::as_str));

        let mut outcome = TransferOutcome::Ok;
        for file in names {
            let src = self.config.data_dir.join(file);
            if !src.is_file() {
                debug!("Skipping {file}, not present in live directory");
                continue;
            }

            let result = create_dir(dest_dir).and_then(|()| {
                fs_ops::safe_copy_file(&src, &dest_dir.join(file), self.config.transfer_attempts)
            });
            if let Err(e) = result {
                debug!("Unable to copy {file}: {e}");
                outcome = outcome.record(FailureKind::Copy);
            }
        }

        if !outcome.is_ok() {
            warn!("{outcome}");
        }
        outcome
    }
}

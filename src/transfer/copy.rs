//! Copying a save set between the live directory and a backup directory

use super::files::SaveFileSet;
use super::outcome::{FailureKind, TransferReport};
use super::staging::StagingArea;
use crate::error::{Result, create_dir};
use crate::fs_ops;
use crate::paths;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Copy every tracked file present in `source_dir` into `dest_dir`
///
/// A destination file that already exists is moved into `staging` before it
/// is overwritten; if that move fails the file is left untouched and not
/// copied over. Tracked files missing from `source_dir` are skipped and
/// never created in `dest_dir`. Per-file failures are folded into the
/// returned report; only failing to create `dest_dir` or the staging area
/// is an error.
pub fn copy_set(
    files: &SaveFileSet,
    source_dir: &Path,
    dest_dir: &Path,
    staging: &StagingArea,
    attempts: u32,
) -> Result<TransferReport> {
    staging.ensure()?;
    create_dir(dest_dir)?;

    let mut report = TransferReport::default();
    for name in files.iter() {
        let src = source_dir.join(name);
        let dest = dest_dir.join(name);

        if dest.is_file() {
            match staging.stage(&dest, name, attempts) {
                Ok(()) => report.staged.push(name.to_string()),
                Err(e) => {
                    // The destination keeps its content until it has a staged copy
                    debug!("Unable to stage {name}, leaving it in place: {e}");
                    report.fail(name, FailureKind::Stage);
                    continue;
                }
            }
        }

        if src.is_file() {
            match fs_ops::safe_copy_file(&src, &dest, attempts) {
                Ok(()) => report.copied.push(name.to_string()),
                Err(e) => {
                    debug!("Unable to copy {name}: {e}");
                    report.fail(name, FailureKind::Copy);
                }
            }
        } else {
            debug!("Skipping {name}, not present in {}", source_dir.display());
        }
    }

    if !report.is_ok() {
        warn!("{}", report.outcome);
    }
    Ok(report)
}

/// Moves a save set in and out of one live data directory
#[derive(Debug, Clone)]
pub struct SaveTransfer {
    files: SaveFileSet,
    live_dir: PathBuf,
    temp_dir: PathBuf,
    attempts: u32,
}

impl SaveTransfer {
    /// `temp_dir` is the double-staging area used when a staging directory is
    /// itself the source or target of a transfer.
    pub fn new(
        files: SaveFileSet,
        live_dir: impl Into<PathBuf>,
        temp_dir: impl Into<PathBuf>,
        attempts: u32,
    ) -> Self {
        Self {
            files,
            live_dir: live_dir.into(),
            temp_dir: temp_dir.into(),
            attempts: attempts.max(1),
        }
    }

    #[must_use]
    pub fn files(&self) -> &SaveFileSet {
        &self.files
    }

    #[must_use]
    pub fn live_dir(&self) -> &Path {
        &self.live_dir
    }

    /// Copy the live save files into `target`
    ///
    /// Files already in `target` are staged into `overwrite`. When `target`
    /// is the overwrite directory itself, displaced files go through the temp
    /// area and are dropped afterwards.
    pub fn backup_saves(&self, target: &Path, overwrite: &Path) -> Result<TransferReport> {
        info!("Backing up save files to {}", target.display());

        if paths::same_path(target, overwrite) {
            let temp = StagingArea::new(&self.temp_dir);
            let report = copy_set(&self.files, &self.live_dir, target, &temp, self.attempts)?;
            if temp.holds_any(&report.failed) {
                warn!("Keeping {} with files displaced by failed copies", temp.path().display());
            } else {
                temp.discard()?;
            }
            return Ok(report);
        }

        let staging = StagingArea::new(overwrite);
        copy_set(&self.files, &self.live_dir, target, &staging, self.attempts)
    }

    /// Copy the save files in `source` over the live ones
    ///
    /// Displaced live files land in `overwrite`. Restoring from the overwrite
    /// directory stages through the temp area first and then swaps the temp
    /// contents into `overwrite`, so the directory is never read and written
    /// at once. Files that failed to transfer are left out of the swap, so
    /// their copy in `overwrite` survives.
    pub fn restore_from(&self, source: &Path, overwrite: &Path) -> Result<TransferReport> {
        info!("Restoring save files from {}", source.display());

        if paths::same_path(source, overwrite) {
            let temp = StagingArea::new(&self.temp_dir);
            let report = copy_set(&self.files, source, &self.live_dir, &temp, self.attempts)?;
            temp.commit_into(overwrite, &report.failed, self.attempts)?;
            return Ok(report);
        }

        let staging = StagingArea::new(overwrite);
        copy_set(&self.files, source, &self.live_dir, &staging, self.attempts)
    }

    /// Delete every tracked file from the live directory
    ///
    /// Returns the names that could not be removed.
    pub fn clear_live(&self) -> Vec<String> {
        let mut failed = Vec::new();
        for name in self.files.iter() {
            if let Err(e) = fs_ops::delete_file(&self.live_dir.join(name)) {
                warn!("{e}");
                failed.push(name.to_string());
            }
        }
        failed
    }

    /// Whether `dir` holds any tracked save file
    #[must_use]
    pub fn contains_save_files(&self, dir: &Path) -> bool {
        self.files.contained_in(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_copy_set_stages_then_copies() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let dest = dir.path().join("dest");
        let staging = StagingArea::new(dir.path().join("stage"));

        write(&src, "sav", "new");
        write(&dest, "sav", "old");
        write(&dest, "exp1", "old-exp1");
        write(&dest, "readme", "untouched");

        let report = copy_set(&SaveFileSet::default(), &src, &dest, &staging, 2).unwrap();

        assert!(report.is_ok());
        assert_eq!(report.copied, vec!["sav".to_string()]);
        assert_eq!(fs::read_to_string(dest.join("sav")).unwrap(), "new");
        assert_eq!(fs::read_to_string(staging.path().join("sav")).unwrap(), "old");
        // Staged even though the source lacks it
        assert!(!dest.join("exp1").exists());
        assert!(staging.path().join("exp1").exists());
        assert!(dest.join("readme").exists());
    }

    #[test]
    fn test_copy_set_missing_source_creates_nothing() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();
        let dest = dir.path().join("dest");
        let staging = StagingArea::new(dir.path().join("stage"));

        let report = copy_set(&SaveFileSet::default(), &src, &dest, &staging, 1).unwrap();
        assert!(report.is_ok());
        assert!(report.copied.is_empty());
        assert_eq!(fs_ops::file_count(&dest), 0);
    }

    #[test]
    fn test_restore_from_overwrite_swaps() {
        let dir = tempdir().unwrap();
        let live = dir.path().join("live");
        let backup = dir.path().join("backup");
        let overwrite = backup.join("last-overwrite");

        write(&live, "sav", "current");
        write(&overwrite, "sav", "previous");

        let transfer = SaveTransfer::new(SaveFileSet::default(), &live, backup.join("temp"), 2);
        transfer.restore_from(&overwrite, &overwrite).unwrap();

        assert_eq!(fs::read_to_string(live.join("sav")).unwrap(), "previous");
        assert_eq!(fs::read_to_string(overwrite.join("sav")).unwrap(), "current");
        assert!(!backup.join("temp").exists());

        // A second restore swaps back
        transfer.restore_from(&overwrite, &overwrite).unwrap();
        assert_eq!(fs::read_to_string(live.join("sav")).unwrap(), "current");
    }

    #[test]
    fn test_clear_live_only_removes_tracked_files() {
        let dir = tempdir().unwrap();
        let live = dir.path().join("live");
        write(&live, "sav", "x");
        write(&live, "options", "keep");

        let transfer = SaveTransfer::new(SaveFileSet::default(), &live, dir.path().join("temp"), 1);
        assert!(transfer.clear_live().is_empty());
        assert!(!live.join("sav").exists());
        assert!(live.join("options").exists());
    }
}

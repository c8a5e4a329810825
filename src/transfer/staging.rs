//! Holding area for files that are about to be overwritten
//!
//! Any destination file a transfer would replace is first moved here under
//! its own name, so the previous content survives a failed copy or a crash.

use crate::error::{Result, create_dir, read_dir};
use crate::fs_ops;
use log::{debug, info, warn};
use std::fs::DirEntry;
use std::path::{Path, PathBuf};

/// A staging directory (`last-overwrite` or `temp`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Create the directory if it is missing
    pub fn ensure(&self) -> Result<()> {
        create_dir(&self.dir)
    }

    /// Move `file` into the staging area as `name`, replacing any older copy
    pub fn stage(&self, file: &Path, name: &str, attempts: u32) -> Result<()> {
        fs_ops::safe_move_file(file, &self.dir.join(name), attempts)
    }

    /// Replace the files of `target` with the files held here, then remove
    /// this staging directory
    ///
    /// The old top-level files of `target` are deleted first. Names in `keep`
    /// are left alone on both sides; if any of them is still staged here the
    /// staging directory is kept instead of removed.
    pub fn commit_into(&self, target: &Path, keep: &[String], attempts: u32) -> Result<()> {
        info!("Replacing contents of {} with staged files", target.display());

        create_dir(target)?;
        for entry in read_dir(target)?.flatten() {
            if entry.file_type().is_ok_and(|t| t.is_file()) && !is_kept(&entry, keep) {
                fs_ops::delete_file(&entry.path())?;
            }
        }

        let mut held_back = false;
        if self.dir.is_dir() {
            for entry in read_dir(&self.dir)?.flatten() {
                if !entry.file_type().is_ok_and(|t| t.is_file()) {
                    continue;
                }
                if is_kept(&entry, keep) {
                    held_back = true;
                    continue;
                }
                let dest = target.join(entry.file_name());
                fs_ops::safe_move_file(&entry.path(), &dest, attempts)?;
            }
        }

        if held_back {
            warn!("Keeping {} with files that were not swapped", self.dir.display());
            return Ok(());
        }
        self.discard()
    }

    /// Whether any of `names` is currently staged here
    #[must_use]
    pub fn holds_any(&self, names: &[String]) -> bool {
        names.iter().any(|name| self.dir.join(name).is_file())
    }

    /// Delete the staging directory and everything in it
    pub fn discard(&self) -> Result<()> {
        debug!("Discarding staging directory {}", self.dir.display());
        fs_ops::delete_directory(&self.dir)
    }
}

fn is_kept(entry: &DirEntry, keep: &[String]) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| keep.iter().any(|k| k == name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_stage_moves_file() {
        let dir = tempdir().unwrap();
        let staging = StagingArea::new(dir.path().join("last-overwrite"));
        staging.ensure().unwrap();
        staging.ensure().unwrap();

        let live = dir.path().join("sav");
        fs::write(&live, "old").unwrap();
        staging.stage(&live, "sav", 2).unwrap();

        assert!(!live.exists());
        assert_eq!(
            fs::read_to_string(staging.path().join("sav")).unwrap(),
            "old"
        );
    }

    #[test]
    fn test_commit_replaces_target_contents() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("last-overwrite");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("sav"), "stale").unwrap();
        fs::write(target.join("exp1"), "stale").unwrap();

        let temp = StagingArea::new(dir.path().join("temp"));
        temp.ensure().unwrap();
        fs::write(temp.path().join("sav"), "fresh").unwrap();

        temp.commit_into(&target, &[], 2).unwrap();

        assert_eq!(fs::read_to_string(target.join("sav")).unwrap(), "fresh");
        assert!(!target.join("exp1").exists());
        assert!(!temp.path().exists());
    }

    #[test]
    fn test_commit_leaves_kept_names_on_both_sides() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("last-overwrite");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("sav"), "only-copy").unwrap();
        fs::write(target.join("sav2"), "stale").unwrap();

        let temp = StagingArea::new(dir.path().join("temp"));
        temp.ensure().unwrap();
        fs::write(temp.path().join("sav2"), "fresh").unwrap();
        fs::write(temp.path().join("sav"), "displaced").unwrap();

        temp.commit_into(&target, &["sav".to_string()], 2).unwrap();

        assert_eq!(fs::read_to_string(target.join("sav")).unwrap(), "only-copy");
        assert_eq!(fs::read_to_string(target.join("sav2")).unwrap(), "fresh");
        // Still holds a file that has nowhere else to go
        assert!(temp.holds_any(&["sav".to_string()]));
        assert!(!temp.holds_any(&["sav2".to_string()]));
    }
}

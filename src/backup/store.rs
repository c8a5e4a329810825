//! Creation, lookup and reconciliation of timestamped backups

use super::name::{BackupName, BackupOrigin};
use crate::config::{Clock, EngineConfig};
use crate::error::{Error, Result, create_dir};
use crate::fs_ops;
use crate::paths;
use crate::transfer::{FailureKind, SaveFileSet, TransferReport};
use log::{debug, error, info, warn};
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Which root receives a new backup
///
/// The per-version root is only used when per-version saving is on and
/// either it was on when the session started or the version directory
/// already exists. Toggling the setting mid-session therefore never moves
/// the layout under the user's feet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Placement {
    pub per_version_saving: bool,
    pub enabled_at_startup: bool,
}

impl Placement {
    pub fn new(per_version_saving: bool, enabled_at_startup: bool) -> Self {
        Self {
            per_version_saving,
            enabled_at_startup,
        }
    }
}

/// A timestamped backup directory found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupEntry {
    pub path: PathBuf,
    pub dir_name: String,
    pub epoch: u64,
}

impl BackupEntry {
    /// Fully parsed name, if the directory follows the complete format
    #[must_use]
    pub fn name(&self) -> Option<BackupName> {
        self.dir_name.parse().ok()
    }

    /// Newest first: larger epoch, then lexically greater name
    fn recency(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| self.dir_name.cmp(&other.dir_name))
    }
}

/// The backup tree under one backup root
#[derive(Clone)]
pub struct BackupStore {
    root: PathBuf,
    host_version: String,
    files: SaveFileSet,
    attempts: u32,
    stray_name_threshold: usize,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for BackupStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackupStore")
            .field("root", &self.root)
            .field("host_version", &self.host_version)
            .field("stray_name_threshold", &self.stray_name_threshold)
            .finish_non_exhaustive()
    }
}

impl BackupStore {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            root: config.backup_dir.clone(),
            host_version: config.host_version.clone(),
            files: config.save_files.clone(),
            attempts: config.transfer_attempts,
            stray_name_threshold: config.stray_name_threshold,
            clock: Arc::clone(&config.clock),
        }
    }

    /// Global backup root
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<hostVersion>`
    #[must_use]
    pub fn version_root(&self) -> PathBuf {
        paths::version_dir(&self.root, &self.host_version)
    }

    /// Directory that new backups are created in
    #[must_use]
    pub fn target_root(&self, placement: Placement) -> PathBuf {
        if placement.per_version_saving {
            let version_root = self.version_root();
            if placement.enabled_at_startup || version_root.is_dir() {
                return version_root;
            }
        }
        self.root.clone()
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Copy the tracked files of `source_dir` into a new timestamped backup
    ///
    /// Refuses with [`Error::NothingToBackup`] when `source_dir` holds none of
    /// the tracked files. Individual copy failures are tolerated as long as
    /// at least one file made it.
    pub fn create_timestamped_backup(
        &self,
        source_dir: &Path,
        placement: Placement,
        origin: BackupOrigin,
    ) -> Result<PathBuf> {
        let present = self.files.present_in(source_dir);
        if present.is_empty() {
            return Err(Error::NothingToBackup(source_dir.to_path_buf()));
        }

        let target = self.allocate(placement, origin)?;
        create_dir(&target)?;

        let mut report = TransferReport::default();
        for name in present {
            match fs_ops::safe_copy_file(&source_dir.join(name), &target.join(name), self.attempts)
            {
                Ok(()) => report.copied.push(name.to_string()),
                Err(e) => {
                    debug!("Unable to copy {name}: {e}");
                    report.fail(name, FailureKind::Copy);
                }
            }
        }

        if report.copied.is_empty() {
            fs_ops::delete_directory(&target)?;
            return Err(Error::BackupFailed(format!(
                "no save file could be copied from {}",
                source_dir.display()
            )));
        }
        if !report.is_ok() {
            warn!("{}", report.outcome);
        }

        info!("✅ Backup created: {}", target.display());
        Ok(target)
    }

    /// Turn `dir` into a timestamped backup by moving it
    ///
    /// A directory without tracked files is deleted instead and `None` is
    /// returned.
    pub fn convert_to_backup(&self, dir: &Path, placement: Placement) -> Result<Option<PathBuf>> {
        if !self.files.contained_in(dir) {
            debug!("Nothing worth keeping in {}, discarding", dir.display());
            fs_ops::delete_directory(dir)?;
            return Ok(None);
        }

        let target = self.allocate(placement, BackupOrigin::Automatic)?;
        fs_ops::move_directory(dir, &target)?;

        info!("✅ Converted {} into backup {}", dir.display(), target.display());
        Ok(Some(target))
    }

    /// Copy the files of `dir` into a new timestamped backup, leaving `dir` intact
    pub fn snapshot(&self, dir: &Path, placement: Placement) -> Result<PathBuf> {
        if !self.files.contained_in(dir) {
            return Err(Error::NothingToBackup(dir.to_path_buf()));
        }

        let target = self.allocate(placement, BackupOrigin::Automatic)?;
        fs_ops::copy_directory(dir, &target, false)?;

        info!("📸 Snapshot of {} stored in {}", dir.display(), target.display());
        Ok(target)
    }

    /// Pick a free backup path under the placement root
    ///
    /// Names that collide with an existing directory move forward one second
    /// at a time, keeping creation order and name order aligned.
    fn allocate(&self, placement: Placement, origin: BackupOrigin) -> Result<PathBuf> {
        let parent = self.target_root(placement);
        create_dir(&parent)?;

        let mut name = BackupName::now(self.clock.as_ref(), origin);
        let mut target = parent.join(name.to_string());
        while target.exists() {
            name = name.next_second();
            target = parent.join(name.to_string());
        }
        Ok(target)
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Timestamped backups with tracked files directly under `root`, newest first
    ///
    /// A missing root yields an empty list.
    #[must_use]
    pub fn list(&self, root: &Path) -> Vec<BackupEntry> {
        let Ok(entries) = fs::read_dir(root) else {
            return Vec::new();
        };

        let mut backups: Vec<BackupEntry> = entries
            .flatten()
            .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
            .filter_map(|e| {
                let dir_name = e.file_name().to_str()?.to_string();
                if paths::is_reserved_name(&dir_name) {
                    return None;
                }
                let epoch = BackupName::epoch_of(&dir_name)?;
                let path = e.path();
                self.files.contained_in(&path).then_some(BackupEntry {
                    path,
                    dir_name,
                    epoch,
                })
            })
            .collect();

        backups.sort_by(|a, b| b.recency(a));
        backups
    }

    /// Newest backup directly under `root`
    #[must_use]
    pub fn most_recent_in(&self, root: &Path) -> Option<BackupEntry> {
        self.list(root).into_iter().next()
    }

    /// Directory the next restore should read from
    ///
    /// Until the user creates a backup this session, a staging directory
    /// holding save files is the answer, so repeated restores swap the live
    /// files with the ones they displaced. Otherwise the per-version root and
    /// the global root are searched and the newest backup across both wins.
    /// The staging directory is the last resort.
    #[must_use]
    pub fn most_recent_backup(
        &self,
        overwrite_dir: &Path,
        user_backups_created: bool,
    ) -> Option<PathBuf> {
        let staging_usable = self.files.contained_in(overwrite_dir);
        if !user_backups_created && staging_usable {
            return Some(overwrite_dir.to_path_buf());
        }

        let newest = [self.version_root(), self.root.clone()]
            .iter()
            .filter_map(|root| self.most_recent_in(root))
            .max_by(BackupEntry::recency);

        match newest {
            Some(entry) => Some(entry.path),
            None if user_backups_created && staging_usable => {
                debug!("No timestamped backups found, falling back to staging directory");
                Some(overwrite_dir.to_path_buf())
            }
            None => None,
        }
    }

    // =========================================================================
    // Stray reconciliation
    // =========================================================================

    /// Whether a backup root child looks like a backup made outside any
    /// version directory
    #[must_use]
    pub fn is_stray(&self, dir_name: &str) -> bool {
        dir_name.chars().count() > self.stray_name_threshold && !paths::is_reserved_name(dir_name)
    }

    /// Move stray backups from the global root under `target`
    ///
    /// Failures are logged and leave the stray in place. Returns the number
    /// of directories moved.
    pub fn migrate_strays(&self, target: &Path) -> usize {
        info!("Checking for stray backup directories");

        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Unable to scan {}: {e}", self.root.display());
                return 0;
            }
        };

        let strays: Vec<String> = entries
            .flatten()
            .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .filter(|name| self.is_stray(name))
            .collect();

        let mut moved = 0;
        for name in strays {
            let src = self.root.join(&name);
            if paths::same_path(&src, target) {
                continue;
            }

            info!("Found {name}");
            match fs_ops::move_directory(&src, &target.join(&name)) {
                Ok(()) => moved += 1,
                Err(e) => error!("Unable to move backup directory {name}: {e}"),
            }
        }
        moved
    }
}

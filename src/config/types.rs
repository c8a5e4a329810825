//! Static engine configuration

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Local, Utc};

use crate::transfer::SaveFileSet;
use crate::version::CompatibilityRules;

/// Default name of the one-line version marker kept in the live data directory
pub const VERSION_MARKER_FILE: &str = "LastGameVersion.txt";

/// Default name of the crash sentinel kept in the live data directory
pub const SENTINEL_FILE: &str = "savemanager-check.txt";

/// Default name of the backup root inside the live data directory
pub const BACKUP_DIR_NAME: &str = "backup";

/// Source of wall-clock time used to name backups
///
/// Injected so backup names can be made deterministic in tests.
pub trait Clock: Send + Sync {
    /// Current UTC time, used for the epoch-seconds part of a backup name
    fn now_utc(&self) -> DateTime<Utc>;

    /// Current local time, used for the human-readable part of a backup name
    fn now_local(&self) -> DateTime<Local>;
}

/// Clock backed by the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn now_local(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Configuration for a [`BackupEngine`](crate::BackupEngine)
#[derive(Clone)]
pub struct EngineConfig {
    /// Live data directory holding the active save files
    pub data_dir: PathBuf,

    /// Root of all backups (default: `<data_dir>/backup`)
    pub backup_dir: PathBuf,

    /// Version string reported by the host, without a leading `v`
    pub host_version: String,

    /// Save files managed by the engine
    pub save_files: SaveFileSet,

    /// File name of the version marker inside `data_dir`
    pub version_marker_file: String,

    /// File name of the crash sentinel inside `data_dir`
    pub sentinel_file: String,

    /// Backup root children with names longer than this are treated as strays
    pub stray_name_threshold: usize,

    /// Attempts allowed for each file copy or move
    pub transfer_attempts: u32,

    /// Attempts allowed when writing the version marker
    pub marker_write_attempts: u32,

    /// Frames a manual backup/restore request blocks further requests
    pub action_cooldown_frames: u32,

    /// Version-compatibility heuristic
    pub compatibility: CompatibilityRules,

    /// Time source for backup names
    pub clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineConfig")
            .field("data_dir", &self.data_dir)
            .field("backup_dir", &self.backup_dir)
            .field("host_version", &self.host_version)
            .field("save_files", &self.save_files)
            .field("version_marker_file", &self.version_marker_file)
            .field("sentinel_file", &self.sentinel_file)
            .field("stray_name_threshold", &self.stray_name_threshold)
            .field("transfer_attempts", &self.transfer_attempts)
            .field("marker_write_attempts", &self.marker_write_attempts)
            .field("action_cooldown_frames", &self.action_cooldown_frames)
            .field("compatibility", &self.compatibility)
            .finish_non_exhaustive()
    }
}

impl EngineConfig {
    /// Create a new builder for EngineConfig
    ///
    /// # Example
    /// ```rust
    /// use saveguard::EngineConfig;
    ///
    /// let config = EngineConfig::builder("/games/rw/data", "v1.9.15")
    ///     .stray_name_threshold(30)
    ///     .build();
    ///
    /// assert_eq!(config.host_version, "1.9.15");
    /// ```
    pub fn builder(
        data_dir: impl Into<PathBuf>,
        host_version: impl Into<String>,
    ) -> EngineConfigBuilder {
        EngineConfigBuilder::new(data_dir, host_version)
    }

    /// Full path of the version marker file
    #[must_use]
    pub fn version_marker_path(&self) -> PathBuf {
        self.data_dir.join(&self.version_marker_file)
    }

    /// Full path of the crash sentinel file
    #[must_use]
    pub fn sentinel_path(&self) -> PathBuf {
        self.data_dir.join(&self.sentinel_file)
    }
}

/// Builder for creating EngineConfig with a fluent API
#[derive(Clone)]
pub struct EngineConfigBuilder {
    data_dir: PathBuf,
    backup_dir: Option<PathBuf>,
    host_version: String,
    save_files: SaveFileSet,
    version_marker_file: String,
    sentinel_file: String,
    stray_name_threshold: usize,
    transfer_attempts: u32,
    marker_write_attempts: u32,
    action_cooldown_frames: u32,
    compatibility: CompatibilityRules,
    clock: Arc<dyn Clock>,
}

impl EngineConfigBuilder {
    /// Create a new builder with the live data directory and host version
    pub fn new(data_dir: impl Into<PathBuf>, host_version: impl Into<String>) -> Self {
        Self {
            data_dir: expand_home(data_dir.into()),
            backup_dir: None,
            host_version: normalize_host_version(&host_version.into()),
            save_files: SaveFileSet::default(),
            version_marker_file: VERSION_MARKER_FILE.into(),
            sentinel_file: SENTINEL_FILE.into(),
            stray_name_threshold: 25,
            transfer_attempts: 2,
            marker_write_attempts: 2,
            action_cooldown_frames: 80,
            compatibility: CompatibilityRules::default(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Set the backup root directory
    ///
    /// Supports `~` expansion for home directory.
    pub fn backup_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.backup_dir = Some(expand_home(path.into()));
        self
    }

    /// Replace the managed save file set
    pub fn save_files(mut self, files: SaveFileSet) -> Self {
        self.save_files = files;
        self
    }

    /// Set the version marker file name (default: "LastGameVersion.txt")
    pub fn version_marker_file(mut self, name: impl Into<String>) -> Self {
        self.version_marker_file = name.into();
        self
    }

    /// Set the crash sentinel file name (default: "savemanager-check.txt")
    pub fn sentinel_file(mut self, name: impl Into<String>) -> Self {
        self.sentinel_file = name.into();
        self
    }

    /// Set the name length above which a backup root child counts as a stray
    pub fn stray_name_threshold(mut self, threshold: usize) -> Self {
        self.stray_name_threshold = threshold;
        self
    }

    /// Set the attempts allowed per file copy or move (minimum 1)
    pub fn transfer_attempts(mut self, attempts: u32) -> Self {
        self.transfer_attempts = attempts.max(1);
        self
    }

    /// Set the attempts allowed for the version marker write (minimum 1)
    pub fn marker_write_attempts(mut self, attempts: u32) -> Self {
        self.marker_write_attempts = attempts.max(1);
        self
    }

    /// Set the cooldown, in host frames, after a manual backup or restore
    pub fn action_cooldown_frames(mut self, frames: u32) -> Self {
        self.action_cooldown_frames = frames;
        self
    }

    /// Replace the version-compatibility rules
    pub fn compatibility(mut self, rules: CompatibilityRules) -> Self {
        self.compatibility = rules;
        self
    }

    /// Replace the clock used to name backups
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Build the EngineConfig
    ///
    /// If `backup_dir` is not set, uses `<data_dir>/backup`.
    pub fn build(self) -> EngineConfig {
        let backup_dir = self
            .backup_dir
            .unwrap_or_else(|| self.data_dir.join(BACKUP_DIR_NAME));

        EngineConfig {
            data_dir: self.data_dir,
            backup_dir,
            host_version: self.host_version,
            save_files: self.save_files,
            version_marker_file: self.version_marker_file,
            sentinel_file: self.sentinel_file,
            stray_name_threshold: self.stray_name_threshold,
            transfer_attempts: self.transfer_attempts,
            marker_write_attempts: self.marker_write_attempts,
            action_cooldown_frames: self.action_cooldown_frames,
            compatibility: self.compatibility,
            clock: self.clock,
        }
    }
}

/// Strip surrounding whitespace and a leading `v` from a host version string
#[must_use]
pub fn normalize_host_version(version: &str) -> String {
    version.trim().trim_start_matches('v').to_string()
}

fn expand_home(path: PathBuf) -> PathBuf {
    if !path.starts_with("~") {
        return path;
    }
    match dirs::home_dir() {
        Some(home) => home.join(path.strip_prefix("~").unwrap_or(&path)),
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = EngineConfig::builder("/data", "v1.9.15").build();

        assert_eq!(config.host_version, "1.9.15");
        assert_eq!(config.backup_dir, PathBuf::from("/data/backup"));
        assert_eq!(config.version_marker_path(), PathBuf::from("/data/LastGameVersion.txt"));
        assert_eq!(config.sentinel_path(), PathBuf::from("/data/savemanager-check.txt"));
        assert_eq!(config.stray_name_threshold, 25);
        assert_eq!(config.transfer_attempts, 2);
        assert_eq!(config.save_files.len(), 10);
    }

    #[test]
    fn test_builder_with_options() {
        let config = EngineConfig::builder("/data", "1.9.07")
            .backup_dir("/elsewhere/backups")
            .sentinel_file("check.txt")
            .transfer_attempts(0)
            .action_cooldown_frames(10)
            .build();

        assert_eq!(config.backup_dir, PathBuf::from("/elsewhere/backups"));
        assert_eq!(config.sentinel_path(), PathBuf::from("/data/check.txt"));
        assert_eq!(config.transfer_attempts, 1);
        assert_eq!(config.action_cooldown_frames, 10);
    }

    #[test]
    fn test_home_expansion() {
        if let Some(home) = dirs::home_dir() {
            let config = EngineConfig::builder("~/rw", "1.0").build();
            assert_eq!(config.data_dir, home.join("rw"));
        }
    }

    #[test]
    fn test_normalize_host_version() {
        assert_eq!(normalize_host_version(" v1.9.15 "), "1.9.15");
        assert_eq!(normalize_host_version("1.9.15"), "1.9.15");
    }
}

//! Common test utilities for saveguard integration tests
//!
//! Provides a temporary live data directory, a controllable clock and
//! helpers for writing and reading save files.

#![allow(dead_code)]

use chrono::{DateTime, Local, TimeZone, Utc};
use saveguard::{BackupEngine, Clock, EngineConfig, SettingsHandle};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tempfile::TempDir;

/// 2024-06-10 06:13:20 UTC
pub const START_EPOCH: i64 = 1_718_000_000;

// =============================================================================
// Clock
// =============================================================================

/// Clock that only moves when told to
#[derive(Clone)]
pub struct TestClock(Arc<AtomicI64>);

impl TestClock {
    pub fn new(epoch: i64) -> Self {
        Self(Arc::new(AtomicI64::new(epoch)))
    }

    pub fn advance(&self, seconds: i64) {
        self.0.fetch_add(seconds, Ordering::SeqCst);
    }

    pub fn epoch(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

impl Clock for TestClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.epoch(), 0).unwrap()
    }

    fn now_local(&self) -> DateTime<Local> {
        Local.timestamp_opt(self.epoch(), 0).unwrap()
    }
}

// =============================================================================
// Test Fixtures
// =============================================================================

/// Temporary live data directory with shared settings
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub clock: TestClock,
    pub settings: SettingsHandle,
}

impl TestFixture {
    /// Create a fixture with per-version saving off
    pub fn new() -> Self {
        init_logging();
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(temp_dir.path().join("data")).expect("Failed to create data dir");

        Self {
            temp_dir,
            clock: TestClock::new(START_EPOCH),
            settings: SettingsHandle::default(),
        }
    }

    /// Create a fixture with per-version saving on
    pub fn per_version() -> Self {
        let fixture = Self::new();
        fixture.settings.set_per_version_saving(true);
        fixture
    }

    pub fn data_dir(&self) -> PathBuf {
        self.temp_dir.path().join("data")
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.data_dir().join("backup")
    }

    pub fn version_dir(&self, version: &str) -> PathBuf {
        self.backup_dir().join(version)
    }

    pub fn config(&self, version: &str) -> EngineConfig {
        EngineConfig::builder(self.data_dir(), version)
            .clock(self.clock.clone())
            .build()
    }

    pub fn engine(&self, version: &str) -> BackupEngine {
        BackupEngine::new(self.config(version), self.settings.clone())
    }

    pub fn write_live(&self, name: &str, content: &str) {
        write_save(&self.data_dir(), name, content);
    }

    pub fn read_live(&self, name: &str) -> Option<String> {
        read_save(&self.data_dir(), name)
    }

    pub fn marker_path(&self) -> PathBuf {
        self.data_dir().join("LastGameVersion.txt")
    }

    pub fn sentinel_path(&self) -> PathBuf {
        self.data_dir().join("savemanager-check.txt")
    }

    pub fn write_marker(&self, version: &str) {
        fs::write(self.marker_path(), version).expect("Failed to write marker");
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn write_save(dir: &Path, name: &str, content: &str) {
    fs::create_dir_all(dir).expect("Failed to create save dir");
    fs::write(dir.join(name), content).expect("Failed to write save file");
}

pub fn read_save(dir: &Path, name: &str) -> Option<String> {
    fs::read_to_string(dir.join(name)).ok()
}

/// Names of the directories directly under `dir`, sorted
pub fn subdirs(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .flatten()
        .filter(|e| e.path().is_dir())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Directories under `dir` that look like timestamped backups
pub fn timestamped_subdirs(dir: &Path) -> Vec<String> {
    subdirs(dir)
        .into_iter()
        .filter(|name| saveguard::BackupName::epoch_of(name).is_some())
        .collect()
}

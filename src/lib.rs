//! # saveguard - versioned save-file backups
//!
//! A backup and restore engine for applications that keep a fixed set of
//! save files in one data directory and change their save format between
//! versions.
//!
//! ## Features
//!
//! - **Per-version saving**: keep a separate copy of the saves for every host
//!   version and restore the right one on startup
//! - **Forward carry or reset**: on a version change, seed the new version
//!   from the old saves when the formats are compatible, otherwise start clean
//! - **Overwrite staging**: every file the engine replaces is moved to a
//!   staging directory first and kept as a timestamped backup at shutdown
//! - **Crash sentinel**: an unclean shutdown is detected on the next start
//!   and the live saves are backed up before anything else happens
//! - **Manual backup/restore**: rate-limited actions for an options panel
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use saveguard::{BackupEngine, EngineConfig, SettingsHandle};
//!
//! let config = EngineConfig::builder("~/.local/share/game", "v1.9.15").build();
//! let settings = SettingsHandle::default();
//! settings.set_per_version_saving(true);
//!
//! let mut engine = BackupEngine::new(config, settings);
//! engine.startup();
//!
//! // Options panel
//! let status = engine.request_backup();
//! println!("{}", status.message());
//!
//! engine.shutdown();
//! ```
//!
//! ## Backup layout
//!
//! ```text
//! <data>/backup/
//!   last-overwrite/                      staging while per-version saving is off
//!   1.9.15/                              saves of version 1.9.15
//!     last-overwrite/                    staging for this session
//!     1718003600_2024-06-10_09-13_USR/   user backup
//!     1718007200_2024-06-10_10-13/       staging kept at shutdown
//! ```
//!
//! ## Host integration
//!
//! Hosts that run their own "copy saves" routine should route its target
//! through [`BackupEngine::redirect_backup_path`] and its per-file copy
//! through [`BackupEngine::host_copy_save_file`].

// Core modules
mod error;
mod events;
mod sync;
pub mod fs_ops;
pub mod paths;
pub mod storage;

// Grouped modules
pub mod backup;
pub mod config;
pub mod engine;
pub mod transfer;
pub mod version;

// Re-exports from core
pub use error::{Error, Result};
pub use events::{ChangeCallback, EventManager};
pub use storage::{JsonStorage, StorageBackend};

// Re-exports from config
pub use config::{
    Clock, EngineConfig, EngineConfigBuilder, SettingKey, Settings, SettingsHandle, SystemClock,
};

// Engine re-exports
pub use backup::{BackupName, BackupOrigin, BackupStore};
pub use engine::{ActionStatus, BackupEngine, EngineState, Session};
pub use transfer::{SaveFileSet, TransferOutcome};
pub use version::{CompatibilityRules, VersionRecord, is_problematic_change};

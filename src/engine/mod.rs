//! The backup engine: session lifecycle, manual actions and host hooks
//!
//! A host drives the engine from one thread:
//!
//! 1. [`BackupEngine::startup`] when the host starts, before it loads saves
//! 2. [`BackupEngine::request_backup`] / [`BackupEngine::request_restore`]
//!    from the options panel, with [`BackupEngine::tick`] once per frame
//! 3. [`BackupEngine::shutdown`] when the host exits
//!
//! # Example
//!
//! ```rust,no_run
//! use saveguard::{BackupEngine, EngineConfig, SettingsHandle};
//!
//! let config = EngineConfig::builder("/games/rw/data", "v1.9.15").build();
//! let settings = SettingsHandle::load(std::path::Path::new("/games/rw/saveguard.json"));
//!
//! let mut engine = BackupEngine::new(config, settings);
//! engine.startup();
//! // ... host session ...
//! engine.shutdown();
//! ```

mod actions;
mod host;
mod lifecycle;
mod manual;
mod session;

pub use actions::{ActionCooldown, ActionStatus};
pub use session::{EngineState, Session};

use crate::backup::{BackupStore, Placement};
use crate::config::{EngineConfig, SettingKey, SettingsHandle};
use crate::paths;
use crate::transfer::SaveTransfer;
use crate::version::VersionResolver;
use log::info;

/// Orchestrates backups of one live data directory
#[derive(Debug)]
pub struct BackupEngine {
    config: EngineConfig,
    settings: SettingsHandle,
    resolver: VersionResolver,
    store: BackupStore,
    transfer: SaveTransfer,
    state: EngineState,
    session: Option<Session>,
    backup_cooldown: ActionCooldown,
    restore_cooldown: ActionCooldown,
}

impl BackupEngine {
    pub fn new(config: EngineConfig, settings: SettingsHandle) -> Self {
        let resolver = VersionResolver::new(config.version_marker_path(), &config.backup_dir);
        let store = BackupStore::new(&config);
        let transfer = SaveTransfer::new(
            config.save_files.clone(),
            &config.data_dir,
            paths::temp_dir(&config.backup_dir),
            config.transfer_attempts,
        );

        settings.watch(SettingKey::PerVersionSaving, |_, _, enabled| {
            if enabled {
                info!("Per-version saving enabled, takes full effect on next start");
            } else {
                info!("Per-version saving disabled, the inherit option has no effect");
            }
        });

        Self {
            config,
            settings,
            resolver,
            store,
            transfer,
            state: EngineState::Idle,
            session: None,
            backup_cooldown: ActionCooldown::default(),
            restore_cooldown: ActionCooldown::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn settings(&self) -> &SettingsHandle {
        &self.settings
    }

    #[must_use]
    pub fn store(&self) -> &BackupStore {
        &self.store
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Context of the running session, if any
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Advance both action cooldowns by one host frame
    pub fn tick(&mut self) {
        self.backup_cooldown.tick();
        self.restore_cooldown.tick();
    }

    /// Where new backups go given the current settings
    fn placement(&self, session: &Session) -> Placement {
        Placement::new(
            self.settings.per_version_saving(),
            session.per_version_at_startup,
        )
    }
}

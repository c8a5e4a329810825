//! User-facing settings consumed by the backup engine
//!
//! The values are owned by an external configuration panel. The engine only
//! reads them, but it reads them more than once per session, so they sit
//! behind a shared handle that reports every change.

use crate::error::Result;
use crate::events::EventManager;
use crate::storage::{JsonStorage, StorageBackend};
use crate::sync::RwLockExt;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Named settings understood by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKey {
    /// Store save data per host version
    PerVersionSaving,
    /// Carry save data across a compatible version change
    InheritVersionSaves,
}

impl SettingKey {
    /// Label shown next to the option in the configuration panel
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SettingKey::PerVersionSaving => "Store save data per game version",
            SettingKey::InheritVersionSaves => {
                "Inherit save data on game version change (if compatible)"
            }
        }
    }
}

/// Snapshot of all settings values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub per_version_saving: bool,
    pub inherit_version_saves: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            per_version_saving: false,
            inherit_version_saves: true,
        }
    }
}

impl Settings {
    /// Read one value by key
    #[must_use]
    pub fn get(&self, key: SettingKey) -> bool {
        match key {
            SettingKey::PerVersionSaving => self.per_version_saving,
            SettingKey::InheritVersionSaves => self.inherit_version_saves,
        }
    }

    fn slot(&mut self, key: SettingKey) -> &mut bool {
        match key {
            SettingKey::PerVersionSaving => &mut self.per_version_saving,
            SettingKey::InheritVersionSaves => &mut self.inherit_version_saves,
        }
    }
}

/// Shared, observable settings
///
/// Cloning the handle shares the underlying values and listeners.
#[derive(Debug, Clone, Default)]
pub struct SettingsHandle {
    values: Arc<RwLock<Settings>>,
    events: Arc<EventManager>,
}

impl SettingsHandle {
    /// Create a handle holding the given values
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            values: Arc::new(RwLock::new(settings)),
            events: Arc::new(EventManager::new()),
        }
    }

    /// Load settings from a JSON file
    ///
    /// A missing file yields defaults. A file that cannot be parsed also
    /// yields defaults, with a warning, so a damaged settings file never
    /// blocks host startup.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        Self::load_with(path, &JsonStorage::new())
    }

    /// Load settings through a custom storage backend
    #[must_use]
    pub fn load_with<S: StorageBackend>(path: &Path, storage: &S) -> Self {
        if !path.exists() {
            debug!("No settings file at {}, using defaults", path.display());
            return Self::default();
        }

        match storage.read::<Settings>(path) {
            Ok(settings) => Self::new(settings),
            Err(e) => {
                warn!("Settings file is malformed, using defaults: {e}");
                Self::default()
            }
        }
    }

    /// Persist the current values as JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        self.save_with(path, &JsonStorage::new())
    }

    /// Persist the current values through a custom storage backend
    pub fn save_with<S: StorageBackend>(&self, path: &Path, storage: &S) -> Result<()> {
        storage.write(path, &self.snapshot())
    }

    /// Copy of the current values
    #[must_use]
    pub fn snapshot(&self) -> Settings {
        *self.values.read_recovered()
    }

    /// Whether per-version saving is currently enabled
    #[must_use]
    pub fn per_version_saving(&self) -> bool {
        self.values.read_recovered().per_version_saving
    }

    /// Whether saves carry over on a compatible version change
    #[must_use]
    pub fn inherit_version_saves(&self) -> bool {
        self.values.read_recovered().inherit_version_saves
    }

    pub fn set_per_version_saving(&self, enabled: bool) {
        self.set(SettingKey::PerVersionSaving, enabled);
    }

    pub fn set_inherit_version_saves(&self, enabled: bool) {
        self.set(SettingKey::InheritVersionSaves, enabled);
    }

    /// Change one value, notifying listeners if it actually changed
    pub fn set(&self, key: SettingKey, value: bool) {
        let old = {
            let mut guard = self.values.write_recovered();
            let slot = guard.slot(key);
            std::mem::replace(slot, value)
        };

        if old != value {
            debug!("Setting {key:?} changed: {old} -> {value}");
            self.events.notify(key, old, value);
        }
    }

    /// Register a listener for every settings change
    pub fn on_change<F>(&self, callback: F)
    where
        F: Fn(SettingKey, bool, bool) + Send + Sync + 'static,
    {
        self.events.on_change(callback);
    }

    /// Register a listener for one setting
    pub fn watch<F>(&self, key: SettingKey, callback: F)
    where
        F: Fn(SettingKey, bool, bool) + Send + Sync + 'static,
    {
        self.events.watch(key, callback);
    }

    /// Access the underlying event manager
    #[must_use]
    pub fn events(&self) -> &EventManager {
        &self.events
    }
}

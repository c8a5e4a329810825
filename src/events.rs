//! Event system for settings changes
//!
//! The configuration panel lives outside this crate. It flips settings through
//! [`SettingsHandle`](crate::SettingsHandle), which reports each change here so
//! the engine and the host can react without polling.

use crate::config::SettingKey;
use crate::sync::RwLockExt;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Type alias for a change callback receiving (key, old value, new value)
pub type ChangeCallback = Arc<dyn Fn(SettingKey, bool, bool) + Send + Sync>;

/// Manages event listeners for settings changes
pub struct EventManager {
    /// Global listeners (called for all changes)
    global_listeners: RwLock<Vec<ChangeCallback>>,

    /// Per-key listeners (called only for specific setting changes)
    key_listeners: RwLock<HashMap<SettingKey, Vec<ChangeCallback>>>,
}

impl EventManager {
    /// Create a new event manager
    #[must_use]
    pub fn new() -> Self {
        Self {
            global_listeners: RwLock::new(Vec::new()),
            key_listeners: RwLock::new(HashMap::new()),
        }
    }

    /// Register a listener called for every settings change
    pub fn on_change<F>(&self, callback: F)
    where
        F: Fn(SettingKey, bool, bool) + Send + Sync + 'static,
    {
        self.global_listeners
            .write_recovered()
            .push(Arc::new(callback));
    }

    /// Register a listener for a single setting
    pub fn watch<F>(&self, key: SettingKey, callback: F)
    where
        F: Fn(SettingKey, bool, bool) + Send + Sync + 'static,
    {
        self.key_listeners
            .write_recovered()
            .entry(key)
            .or_default()
            .push(Arc::new(callback));
    }

    /// Notify all listeners about a change
    ///
    /// Callbacks are cloned out of the lock first, so a listener may register
    /// further listeners without deadlocking.
    pub fn notify(&self, key: SettingKey, old_value: bool, new_value: bool) {
        let mut callbacks: Vec<ChangeCallback> =
            self.global_listeners.read_recovered().iter().cloned().collect();

        if let Some(listeners) = self.key_listeners.read_recovered().get(&key) {
            callbacks.extend(listeners.iter().cloned());
        }

        for callback in callbacks {
            callback(key, old_value, new_value);
        }
    }

    /// Remove all listeners for a specific key
    pub fn unwatch(&self, key: SettingKey) {
        self.key_listeners.write_recovered().remove(&key);
    }

    /// Clear all listeners
    pub fn clear(&self) {
        self.global_listeners.write_recovered().clear();
        self.key_listeners.write_recovered().clear();
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventManager")
            .field("global_listeners", &self.global_listeners.read_recovered().len())
            .field("key_listeners", &self.key_listeners.read_recovered().len())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

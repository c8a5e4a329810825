//! Configuration for the backup engine
//!
//! - `EngineConfig` - static shape of an engine: paths, save file set, limits
//! - `Settings` / `SettingsHandle` - user toggles owned by the host's config panel
//! - `Clock` - time source for backup names

mod settings;
mod types;

pub use settings::{SettingKey, Settings, SettingsHandle};
pub use types::{
    BACKUP_DIR_NAME, Clock, EngineConfig, EngineConfigBuilder, SENTINEL_FILE, SystemClock,
    VERSION_MARKER_FILE, normalize_host_version,
};

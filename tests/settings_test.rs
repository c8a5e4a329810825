//! Settings workflow integration tests
//!
//! Tests for persisting settings, change notifications and how the engine
//! picks settings up across sessions.

mod common;

use common::TestFixture;
use saveguard::{BackupEngine, JsonStorage, SettingKey, Settings, SettingsHandle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[test]
fn test_persisted_settings_drive_next_session() {
    let fixture = TestFixture::new();
    let settings_path = fixture.temp_dir.path().join("saveguard.json");
    fixture.write_live("sav", "live");

    let settings = SettingsHandle::default();
    settings.set_per_version_saving(true);
    settings.save(&settings_path).unwrap();

    let loaded = SettingsHandle::load(&settings_path);
    assert!(loaded.per_version_saving());
    assert!(loaded.inherit_version_saves());

    let mut engine = BackupEngine::new(fixture.config("1.9.15"), loaded);
    engine.startup();
    assert!(engine.session().unwrap().per_version_at_startup);
    assert!(fixture.version_dir("1.9.15").join("sav").exists());
    engine.shutdown();
}

#[test]
fn test_compact_storage_round_trip() {
    let fixture = TestFixture::new();
    let path = fixture.temp_dir.path().join("compact.json");
    let storage = JsonStorage::compact();

    let settings = SettingsHandle::new(Settings {
        per_version_saving: true,
        inherit_version_saves: false,
    });
    settings.save_with(&path, &storage).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(!raw.contains('\n'));

    let loaded = SettingsHandle::load_with(&path, &storage);
    assert_eq!(loaded.snapshot(), settings.snapshot());
}

#[test]
fn test_watchers_see_only_their_key() {
    let settings = SettingsHandle::default();
    let per_version_changes = Arc::new(Mutex::new(Vec::new()));
    let all_changes = Arc::new(AtomicUsize::new(0));

    let seen = Arc::clone(&per_version_changes);
    settings.watch(SettingKey::PerVersionSaving, move |key, old, new| {
        seen.lock().unwrap().push((key, old, new));
    });
    let count = Arc::clone(&all_changes);
    settings.on_change(move |_, _, _| {
        count.fetch_add(1, Ordering::SeqCst);
    });

    settings.set_per_version_saving(true);
    settings.set_inherit_version_saves(false);
    settings.set_per_version_saving(true);

    assert_eq!(
        *per_version_changes.lock().unwrap(),
        vec![(SettingKey::PerVersionSaving, false, true)]
    );
    assert_eq!(all_changes.load(Ordering::SeqCst), 2);
}

#[test]
fn test_mode_is_locked_in_at_startup() {
    let fixture = TestFixture::per_version();
    fixture.write_live("sav", "live");

    let mut engine = fixture.engine("1.9.15");
    engine.startup();
    let overwrite = engine.session().unwrap().overwrite_dir.clone();

    // Turning the option off mid-session keeps the session's staging area
    fixture.settings.set_per_version_saving(false);
    assert_eq!(engine.session().unwrap().overwrite_dir, overwrite);
    assert!(engine.session().unwrap().per_version_at_startup);

    // Progress still reaches the version directory at shutdown
    fixture.write_live("sav", "progress");
    engine.shutdown();
    assert_eq!(
        common::read_save(&fixture.version_dir("1.9.15"), "sav").as_deref(),
        Some("progress")
    );
    assert!(!fixture.sentinel_path().exists());
}

#[test]
fn test_engine_shares_handle_with_host() {
    let fixture = TestFixture::new();
    let engine = fixture.engine("1.9.15");

    fixture.settings.set_per_version_saving(true);
    assert!(engine.settings().per_version_saving());
}

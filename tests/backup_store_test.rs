//! Backup store integration tests
//!
//! Tests for timestamped backup creation, most-recent lookup across the two
//! backup roots, and stray migration.

mod common;

use common::{START_EPOCH, TestFixture, read_save, subdirs, timestamped_subdirs, write_save};
use saveguard::backup::Placement;
use saveguard::{BackupName, BackupOrigin, BackupStore, Error};
use std::fs;

fn store(fixture: &TestFixture) -> BackupStore {
    BackupStore::new(&fixture.config("1.9.15"))
}

// =============================================================================
// Creation
// =============================================================================

#[test]
fn test_two_backups_in_succession_are_distinct() {
    let fixture = TestFixture::new();
    fixture.write_live("sav", "slot-1");
    fixture.write_live("exp1", "expedition");
    let store = store(&fixture);

    let first = store
        .create_timestamped_backup(&fixture.data_dir(), Placement::default(), BackupOrigin::User)
        .unwrap();
    fixture.clock.advance(1);
    let second = store
        .create_timestamped_backup(&fixture.data_dir(), Placement::default(), BackupOrigin::User)
        .unwrap();

    assert_ne!(first, second);
    for dir in [&first, &second] {
        assert_eq!(read_save(dir, "sav").as_deref(), Some("slot-1"));
        assert_eq!(read_save(dir, "exp1").as_deref(), Some("expedition"));
        // The backup root itself is never copied into a backup
        assert!(!dir.join("backup").exists());
    }
}

#[test]
fn test_backup_name_format() {
    let fixture = TestFixture::new();
    fixture.write_live("sav", "x");
    let store = store(&fixture);

    let path = store
        .create_timestamped_backup(&fixture.data_dir(), Placement::default(), BackupOrigin::User)
        .unwrap();
    let dir_name = path.file_name().unwrap().to_str().unwrap();

    let name: BackupName = dir_name.parse().unwrap();
    assert_eq!(name.epoch, START_EPOCH as u64);
    assert_eq!(name.origin, BackupOrigin::User);
    assert!(dir_name.ends_with("_USR"));
    assert_eq!(path.parent().unwrap(), fixture.backup_dir());
}

#[test]
fn test_no_empty_backups() {
    let fixture = TestFixture::new();
    fixture.write_live("options", "not a save");
    let store = store(&fixture);

    let result = store.create_timestamped_backup(
        &fixture.data_dir(),
        Placement::default(),
        BackupOrigin::User,
    );

    assert!(matches!(result, Err(Error::NothingToBackup(_))));
    assert!(timestamped_subdirs(&fixture.backup_dir()).is_empty());
}

#[test]
fn test_per_version_placement() {
    let fixture = TestFixture::new();
    fixture.write_live("sav", "x");
    let store = store(&fixture);

    let path = store
        .create_timestamped_backup(
            &fixture.data_dir(),
            Placement::new(true, true),
            BackupOrigin::Automatic,
        )
        .unwrap();
    assert_eq!(path.parent().unwrap(), fixture.version_dir("1.9.15"));
}

#[test]
fn test_convert_discards_empty_staging() {
    let fixture = TestFixture::new();
    let staging = fixture.backup_dir().join("last-overwrite");
    write_save(&staging, "notes", "untracked");
    let store = store(&fixture);

    let converted = store.convert_to_backup(&staging, Placement::default()).unwrap();
    assert!(converted.is_none());
    assert!(!staging.exists());
}

#[test]
fn test_convert_moves_staging() {
    let fixture = TestFixture::new();
    let staging = fixture.backup_dir().join("last-overwrite");
    write_save(&staging, "sav", "displaced");
    let store = store(&fixture);

    let converted = store
        .convert_to_backup(&staging, Placement::default())
        .unwrap()
        .unwrap();
    assert!(!staging.exists());
    assert_eq!(read_save(&converted, "sav").as_deref(), Some("displaced"));
}

// =============================================================================
// Lookup
// =============================================================================

#[test]
fn test_most_recent_none_without_parseable_dirs() {
    let fixture = TestFixture::new();
    let root = fixture.backup_dir();
    write_save(&root.join("1.9.15"), "sav", "x");
    write_save(&root.join("random"), "sav", "x");
    write_save(&root.join("abc_2024-01-01_00-00"), "sav", "x");
    let store = store(&fixture);

    let overwrite = root.join("1.9.15").join("last-overwrite");
    assert_eq!(store.most_recent_backup(&overwrite, false), None);
    assert_eq!(store.most_recent_backup(&overwrite, true), None);
}

#[test]
fn test_most_recent_across_roots() {
    let fixture = TestFixture::new();
    let root = fixture.backup_dir();
    let older = fixture.version_dir("1.9.15").join("1000_2024-01-01_00-00");
    let newer = root.join("2000_2024-01-02_00-00");
    write_save(&older, "sav", "old");
    write_save(&newer, "sav", "new");
    let store = store(&fixture);

    let overwrite = fixture.version_dir("1.9.15").join("last-overwrite");
    assert_eq!(store.most_recent_backup(&overwrite, true), Some(newer.clone()));

    // And the other way round
    let newest = fixture.version_dir("1.9.15").join("3000_2024-01-03_00-00");
    write_save(&newest, "sav", "newest");
    assert_eq!(store.most_recent_backup(&overwrite, true), Some(newest));
}

#[test]
fn test_most_recent_skips_backups_without_saves() {
    let fixture = TestFixture::new();
    let root = fixture.backup_dir();
    write_save(&root.join("1000_2024-01-01_00-00"), "sav", "x");
    write_save(&root.join("2000_2024-01-02_00-00"), "readme", "x");
    let store = store(&fixture);

    let found = store
        .most_recent_backup(&root.join("last-overwrite"), true)
        .unwrap();
    assert!(found.ends_with("1000_2024-01-01_00-00"));
}

// =============================================================================
// Strays
// =============================================================================

#[test]
fn test_migrate_strays() {
    let fixture = TestFixture::new();
    let root = fixture.backup_dir();
    write_save(&root.join("1718000000_2024-06-10_08-13"), "sav", "stray");
    write_save(&root.join("1.9.07"), "sav", "version");
    write_save(&root.join("last-overwrite"), "sav", "staging");
    fs::create_dir_all(root.join("temp")).unwrap();
    let store = store(&fixture);

    let target = fixture.version_dir("1.9.07");
    assert_eq!(store.migrate_strays(&target), 1);

    assert_eq!(subdirs(&root), vec!["1.9.07", "last-overwrite", "temp"]);
    assert_eq!(
        read_save(&target.join("1718000000_2024-06-10_08-13"), "sav").as_deref(),
        Some("stray")
    );
}

#[test]
fn test_migrate_strays_without_root() {
    let fixture = TestFixture::new();
    let store = store(&fixture);
    assert_eq!(store.migrate_strays(&fixture.version_dir("1.9.15")), 0);
}

//! Startup reconciliation and shutdown bookkeeping
//!
//! Neither entry point returns an error. A failing step is logged and
//! skipped so the host's own startup and shutdown are never blocked.

use super::{BackupEngine, EngineState, Session};
use crate::error::{create_dir, write_file};
use crate::fs_ops;
use crate::paths;
use crate::version::VersionRecord;
use log::{debug, error, info, warn};

impl BackupEngine {
    /// Resolve versions and bring the live saves in line with the backups
    ///
    /// With per-version saving on, this restores the current version's saves
    /// (or seeds them from the live files), migrates stray backups and arms
    /// the crash sentinel. With it off, only the version marker is removed.
    pub fn startup(&mut self) {
        if self.state != EngineState::Idle {
            warn!("Startup requested while {}, ignoring", self.state);
            return;
        }

        self.state = EngineState::Resolving;
        let per_version = self.settings.per_version_saving();
        let record = self.resolver.resolve(&self.config.host_version);
        let default_overwrite =
            paths::overwrite_dir(&self.config.backup_dir, &record.current_version, per_version);
        let mut session = Session::new(record, per_version, default_overwrite);

        if !self.config.data_dir.is_dir() {
            warn!(
                "Could not locate live data directory {}",
                self.config.data_dir.display()
            );
            self.begin(session);
            return;
        }

        if let Err(e) = create_dir(&self.config.backup_dir) {
            error!("Unable to create backup root: {e}");
            self.begin(session);
            return;
        }

        if per_version {
            self.state = EngineState::Reconciling;
            self.reconcile(&mut session);

            let current = &session.record.current_version;
            if session.record.version_changed() || !self.resolver.marker_exists() {
                self.resolver
                    .write_marker(current, self.config.marker_write_attempts);
            }
        } else {
            // A marker left behind would be stale once per-version saving returns
            self.resolver.remove_marker();
        }

        self.begin(session);
    }

    fn begin(&mut self, session: Session) {
        debug!("Session staging directory: {}", session.overwrite_dir.display());
        self.session = Some(session);
        self.state = EngineState::SessionActive;
    }

    fn reconcile(&self, session: &mut Session) {
        let sentinel = self.config.sentinel_path();
        let record = session.record.clone();
        session.reconciled = true;

        if sentinel.exists() {
            session.unclean_shutdown_detected = true;
            session.sentinel = Some(sentinel);
            self.recover_unclean_shutdown(session, &record);
            return;
        }

        session.overwrite_dir =
            paths::overwrite_dir(&self.config.backup_dir, &record.current_version, true);

        match write_file(&sentinel, "") {
            Ok(()) => session.sentinel = Some(sentinel),
            Err(e) => error!("Unable to create crash sentinel: {e}"),
        }

        if self.transfer.contains_save_files(&record.current_version_path) {
            info!("Checking for save data for version {}", record.current_version);
            self.restore_version_saves(session, &record);
        } else if self.should_reset(&record) {
            self.reset_live_saves(session, &record);
        } else {
            info!("🌱 Seeding saves for version {}", record.current_version);
            if let Err(e) = self
                .transfer
                .backup_saves(&record.current_version_path, &session.overwrite_dir)
            {
                error!("Error occurred while copying save files: {e}");
            }
        }

        // On a version change the strays most likely belong to the old version
        let stray_target = if record.version_changed() {
            &record.last_version_path
        } else {
            &record.current_version_path
        };
        let moved = self.store.migrate_strays(stray_target);
        if moved > 0 {
            info!("Moved {moved} stray backup(s) to {}", stray_target.display());
        }
    }

    /// Previous session never reached shutdown
    fn recover_unclean_shutdown(&self, session: &mut Session, record: &VersionRecord) {
        warn!("Save data backup was unsuccessful on game exit. Backing up current saves.");

        let problematic = self
            .config
            .compatibility
            .is_problematic_change(&record.current_version, &record.last_version);

        if record.version_changed() && problematic {
            warn!(
                "Live saves may not be readable after {} -> {}, leaving backups untouched",
                record.last_version, record.current_version
            );
            session.overwrite_dir =
                paths::overwrite_dir(&self.config.backup_dir, &record.current_version, true);
            return;
        }

        session.overwrite_dir =
            paths::overwrite_dir(&self.config.backup_dir, &record.last_version, true);
        if let Err(e) = self
            .transfer
            .backup_saves(&record.last_version_path, &session.overwrite_dir)
        {
            error!("Error occurred while copying save files: {e}");
        }
    }

    /// Whether a version change should start the host from a clean slate
    fn should_reset(&self, record: &VersionRecord) -> bool {
        if !record.version_changed() {
            return false;
        }
        !self.settings.inherit_version_saves()
            || self
                .config
                .compatibility
                .is_problematic_change(&record.current_version, &record.last_version)
    }

    fn restore_version_saves(&self, session: &Session, record: &VersionRecord) {
        info!("Restoring save files");
        match self
            .transfer
            .restore_from(&record.current_version_path, &session.overwrite_dir)
        {
            Ok(report) if report.copied.is_empty() => {
                info!("No save data available to restore");
            }
            Ok(_) => {}
            Err(e) => error!("Error occurred while copying save files: {e}"),
        }
    }

    /// Quarantine the live saves under the last version, then clear them
    fn reset_live_saves(&self, session: &Session, record: &VersionRecord) {
        info!(
            "Starting version {} without saves from {}",
            record.current_version, record.last_version
        );

        let saved = match self
            .transfer
            .backup_saves(&record.last_version_path, &session.overwrite_dir)
        {
            Ok(report) => report.failed.is_empty(),
            Err(e) => {
                error!("Error occurred while copying save files: {e}");
                false
            }
        };

        if !saved {
            warn!("Live saves were not fully backed up, keeping them in place");
            return;
        }

        let failed = self.transfer.clear_live();
        if !failed.is_empty() {
            warn!("Unable to remove live save files: {}", failed.join(", "));
        }
    }

    /// Fold the session into the backups and disarm the crash sentinel
    ///
    /// The sentinel is deleted last; its absence means bookkeeping
    /// completed.
    pub fn shutdown(&mut self) {
        let Some(session) = self.session.take() else {
            debug!("Shutdown requested without an active session");
            self.state = EngineState::Idle;
            return;
        };
        self.state = EngineState::ShuttingDown;

        let per_version_now = self.settings.per_version_saving();
        let enabled_mid_session = per_version_now && !session.per_version_at_startup;

        if session.reconciled || enabled_mid_session {
            info!("Applying session progress to version {}", session.record.current_version);
            if let Err(e) = self
                .transfer
                .backup_saves(&self.store.version_root(), &session.overwrite_dir)
            {
                error!("Error occurred while copying save files: {e}");
            }
        }

        let placement = self.placement(&session);
        match self.store.convert_to_backup(&session.overwrite_dir, placement) {
            Ok(Some(path)) => debug!("Staged files kept in {}", path.display()),
            Ok(None) => {}
            Err(e) => error!("Unable to convert staging directory: {e}"),
        }

        if let Some(sentinel) = &session.sentinel {
            if let Err(e) = fs_ops::delete_file(sentinel) {
                error!("Unable to remove crash sentinel: {e}");
            }
        }

        self.state = EngineState::Idle;
    }
}

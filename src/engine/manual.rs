//! Backup and restore requests from the options panel

use super::{ActionStatus, BackupEngine};
use crate::backup::BackupOrigin;
use crate::error::Error;
use log::{error, info};

impl BackupEngine {
    /// Copy the live saves into a new user backup
    pub fn request_backup(&mut self) -> ActionStatus {
        let Some(session) = self.session.as_ref() else {
            return ActionStatus::NotRunning;
        };
        if !self.backup_cooldown.is_ready() {
            return ActionStatus::CooldownActive;
        }
        self.backup_cooldown.start(self.config.action_cooldown_frames);

        let placement = self.placement(session);

        info!("📦 Creating backups");
        let status = match self.store.create_timestamped_backup(
            &self.config.data_dir,
            placement,
            BackupOrigin::User,
        ) {
            Ok(path) => ActionStatus::BackupCreated(path),
            Err(Error::NothingToBackup(_)) => ActionStatus::NothingToBackup,
            Err(e) => {
                error!("Unable to create backup: {e}");
                ActionStatus::Failed(e.to_string())
            }
        };

        if let (ActionStatus::BackupCreated(_), Some(session)) = (&status, self.session.as_mut()) {
            session.user_backups_created = true;
        }

        info!("{}", status.message());
        status
    }

    /// Replace the live saves with the most recent backup
    ///
    /// Until the user makes a backup of their own, restores swap the live
    /// saves with the staging directory. The first such swap also keeps a
    /// timestamped copy of the staging directory so no state is lost.
    pub fn request_restore(&mut self) -> ActionStatus {
        let Some(session) = self.session.as_ref() else {
            return ActionStatus::NotRunning;
        };
        if !self.restore_cooldown.is_ready() {
            return ActionStatus::CooldownActive;
        }
        self.restore_cooldown.start(self.config.action_cooldown_frames);
        let overwrite = session.overwrite_dir.clone();
        let user_backups_created = session.user_backups_created;
        let needs_snapshot = !user_backups_created && !session.safety_snapshot_taken;
        let placement = self.placement(session);

        info!("Restoring latest backup...");

        let Some(source) = self.store.most_recent_backup(&overwrite, user_backups_created) else {
            info!("{}", ActionStatus::NothingToRestore.message());
            return ActionStatus::NothingToRestore;
        };
        if !self.transfer.contains_save_files(&source) {
            return ActionStatus::NothingToRestore;
        }
        info!("Backup found: {}", source.display());

        if needs_snapshot && self.transfer.contains_save_files(&overwrite) {
            info!("Creating safety backup");
            // Marked even on failure; a second attempt would hit the same problem
            if let Some(session) = self.session.as_mut() {
                session.safety_snapshot_taken = true;
            }
            if let Err(e) = self.store.snapshot(&overwrite, placement) {
                error!("Unable to create safety backup: {e}");
            }
        }

        let status = match self.transfer.restore_from(&source, &overwrite) {
            Ok(report) => ActionStatus::Restored {
                source,
                outcome: report.outcome,
            },
            Err(e) => {
                error!("Error occurred while copying save files: {e}");
                ActionStatus::Failed(e.to_string())
            }
        };

        info!("{}", status.message());
        status
    }
}

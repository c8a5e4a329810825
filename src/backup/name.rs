//! Timestamped backup directory names
//!
//! Format: `<epochSeconds>_<yyyy-MM-dd>_<HH-mm>[_USR]`. The epoch is UTC,
//! the date part is local time and only informative.

use crate::config::Clock;
use crate::error::{Error, Result};
use chrono::{DateTime, Local, Utc};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

const USER_SUFFIX: &str = "USR";

static FULL_NAME: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^(\d+)_(\d{4}-\d{2}-\d{2}_\d{2}-\d{2})(?:_(USR))?$").ok()
});

/// Who asked for a backup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BackupOrigin {
    /// Created by the engine itself (staging conversion, safety snapshot)
    #[default]
    Automatic,
    /// Requested by the user; carries the `_USR` suffix
    User,
}

/// Parsed name of a timestamped backup directory
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BackupName {
    /// Seconds since the Unix epoch (UTC)
    pub epoch: u64,
    /// `yyyy-MM-dd_HH-mm` in local time
    pub stamp: String,
    pub origin: BackupOrigin,
}

impl BackupName {
    /// Name for a backup taken at the given instant
    #[must_use]
    pub fn at(utc: DateTime<Utc>, local: DateTime<Local>, origin: BackupOrigin) -> Self {
        Self {
            epoch: u64::try_from(utc.timestamp()).unwrap_or(0),
            stamp: local.format("%Y-%m-%d_%H-%M").to_string(),
            origin,
        }
    }

    /// Name for a backup taken now according to `clock`
    #[must_use]
    pub fn now(clock: &dyn Clock, origin: BackupOrigin) -> Self {
        Self::at(clock.now_utc(), clock.now_local(), origin)
    }

    /// Same name one second later
    #[must_use]
    pub fn next_second(&self) -> Self {
        Self {
            epoch: self.epoch.saturating_add(1),
            ..self.clone()
        }
    }

    /// Leading epoch of a directory name, if it has one
    ///
    /// Lookups only need this part; anything after the first `_` is ignored.
    #[must_use]
    pub fn epoch_of(name: &str) -> Option<u64> {
        let (epoch, _) = name.split_once('_')?;
        if epoch.is_empty() || !epoch.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        epoch.parse().ok()
    }
}

impl fmt::Display for BackupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.epoch, self.stamp)?;
        if self.origin == BackupOrigin::User {
            write!(f, "_{USER_SUFFIX}")?;
        }
        Ok(())
    }
}

impl FromStr for BackupName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let caps = FULL_NAME
            .as_ref()
            .and_then(|re| re.captures(s))
            .ok_or_else(|| Error::InvalidBackupName(s.to_string()))?;

        let epoch = caps[1]
            .parse()
            .map_err(|_| Error::InvalidBackupName(s.to_string()))?;
        let origin = if caps.get(3).is_some() {
            BackupOrigin::User
        } else {
            BackupOrigin::Automatic
        };

        Ok(Self {
            epoch,
            stamp: caps[2].to_string(),
            origin,
        })
    }
}

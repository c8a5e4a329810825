//! Timestamped backups under the backup root

mod name;
mod store;

pub use name::{BackupName, BackupOrigin};
pub use store::{BackupEntry, BackupStore, Placement};

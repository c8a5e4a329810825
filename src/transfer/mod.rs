//! Save set transfers with overwrite staging

mod copy;
mod files;
mod outcome;
pub mod staging;

pub use copy::{SaveTransfer, copy_set};
pub use files::{DEFAULT_SAVE_FILES, SaveFileSet};
pub use outcome::{FailureKind, TransferOutcome, TransferReport};
pub use staging::StagingArea;

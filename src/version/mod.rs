//! Host version tracking and the save-compatibility heuristic

mod compat;
mod resolver;

pub use compat::{CompatibilityRules, VersionFamily, is_problematic_change};
pub use resolver::{VersionRecord, VersionResolver, resolve};

//! Canonical layout of the backup tree
//!
//! ```text
//! <backup>/
//!   last-overwrite/                 global staging area
//!   temp/                           double staging while restoring from a staging area
//!   1718000000_2024-06-10_08-13/    backup made while per-version saving was off
//!   1.9.15/                         per-version root (its files are that version's saves)
//!     last-overwrite/               per-version staging area
//!     1718003600_2024-06-10_09-13_USR/
//! ```
//!
//! Everything here is pure; nothing touches the filesystem.

use std::path::{Component, Path, PathBuf};

/// Directory that receives live files just before they are overwritten
pub const OVERWRITE_DIR_NAME: &str = "last-overwrite";

/// Directory used when the staging area itself is the restore source
pub const TEMP_DIR_NAME: &str = "temp";

/// `<root>/<version>`
#[must_use]
pub fn version_dir(root: &Path, version: &str) -> PathBuf {
    normalize(&root.join(version))
}

/// Staging directory for the given saving mode
///
/// Per-version mode stages under the version directory, otherwise the global
/// staging area directly under the root is used.
#[must_use]
pub fn overwrite_dir(root: &Path, version: &str, per_version: bool) -> PathBuf {
    if per_version {
        normalize(&root.join(version).join(OVERWRITE_DIR_NAME))
    } else {
        normalize(&root.join(OVERWRITE_DIR_NAME))
    }
}

/// `<root>/temp`
#[must_use]
pub fn temp_dir(root: &Path) -> PathBuf {
    normalize(&root.join(TEMP_DIR_NAME))
}

/// Whether a directory name is one of the reserved staging names
#[must_use]
pub fn is_reserved_name(name: &str) -> bool {
    name == OVERWRITE_DIR_NAME || name == TEMP_DIR_NAME
}

/// Final component of a path, ignoring trailing separators
#[must_use]
pub fn directory_name(path: &Path) -> Option<String> {
    normalize(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

/// Bring a path into one canonical form
///
/// Backslashes become forward slashes, repeated and trailing separators
/// collapse, and `.` components are dropped. `..` is kept as-is since
/// resolving it would require touching the filesystem.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let unified = path.to_string_lossy().replace('\\', "/");
    let mut out = PathBuf::new();
    for component in Path::new(&unified).components() {
        match component {
            Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() && !unified.is_empty() {
        out.push(".");
    }
    out
}

/// Compare two paths after normalization
#[must_use]
pub fn same_path(a: &Path, b: &Path) -> bool {
    normalize(a) == normalize(b)
}

//! Filesystem primitives tolerant of outside interference
//!
//! The host reads and writes the same save files the engine copies, so a file
//! can be locked or vanish between an existence check and the operation it
//! gates. Copies and moves therefore retry a bounded number of times and
//! report the failure instead of panicking or aborting the caller.

use crate::error::{Error, Result, create_dir, read_dir};
use log::{debug, error, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

const RETRY_DELAY: Duration = Duration::from_millis(25);

/// Whether a directory exists and holds at least one regular file
#[must_use]
pub fn has_files(dir: &Path) -> bool {
    file_count(dir) > 0
}

/// Number of regular files directly inside `dir` (0 if it does not exist)
#[must_use]
pub fn file_count(dir: &Path) -> usize {
    match fs::read_dir(dir) {
        Ok(entries) => entries
            .flatten()
            .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
            .count(),
        Err(_) => 0,
    }
}

/// Copy `src` over `dest`, retrying transient failures
///
/// A missing source is reported immediately; retrying cannot make it appear.
pub fn safe_copy_file(src: &Path, dest: &Path, attempts: u32) -> Result<()> {
    retry(attempts, src, |_| match fs::copy(src, dest) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound && !src.exists() => {
            error!("Copy target file {} could not be found", src.display());
            Err(Attempt::Fatal(Error::FileCopy {
                path: src.to_path_buf(),
                source: e,
            }))
        }
        Err(e) => Err(Attempt::Retry(Error::FileCopy {
            path: src.to_path_buf(),
            source: e,
        })),
    })
}

/// Move `src` to `dest`, replacing whatever is at `dest`
///
/// Falls back to copy-then-delete when a rename is not possible (for example
/// across filesystems).
pub fn safe_move_file(src: &Path, dest: &Path, attempts: u32) -> Result<()> {
    debug!("Moving {} to {}", src.display(), dest.display());

    if crate::paths::same_path(src, dest) {
        debug!("Same filepath for {}", src.display());
        return Ok(());
    }

    retry(attempts, src, |_| {
        if dest.exists() {
            fs::remove_file(dest).map_err(|e| {
                Attempt::Retry(Error::FileDelete {
                    path: dest.to_path_buf(),
                    source: e,
                })
            })?;
        }

        match fs::rename(src, dest) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound && !src.exists() => {
                error!("Move target file {} could not be found", src.display());
                Err(Attempt::Fatal(Error::FileMove {
                    path: src.to_path_buf(),
                    source: e,
                }))
            }
            Err(rename_err) => {
                debug!("Rename failed ({rename_err}), falling back to copy");
                fs::copy(src, dest)
                    .and_then(|_| fs::remove_file(src))
                    .map_err(|e| {
                        Attempt::Retry(Error::FileMove {
                            path: src.to_path_buf(),
                            source: e,
                        })
                    })
            }
        }
    })
}

/// Delete a file if it exists
pub fn delete_file(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::FileDelete {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Delete a directory and everything in it, if it exists
pub fn delete_directory(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::DirectoryDelete {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Copy the contents of `src` into `dest`
///
/// With `recursive` unset only the files directly inside `src` are copied.
/// Stops at the first file that fails to copy.
pub fn copy_directory(src: &Path, dest: &Path, recursive: bool) -> Result<()> {
    if !src.is_dir() {
        return Err(Error::PathNotFound(src.to_path_buf()));
    }

    // Collect first so copying into a child of src cannot feed the iteration
    let entries: Vec<_> = read_dir(src)?.flatten().collect();

    create_dir(dest)?;

    for entry in entries {
        let path = entry.path();
        let target = dest.join(entry.file_name());
        let file_type = entry.file_type().map_err(|e| Error::DirectoryRead {
            path: path.clone(),
            source: e,
        })?;

        if file_type.is_dir() {
            if recursive {
                copy_directory(&path, &target, true)?;
            }
        } else {
            fs::copy(&path, &target).map_err(|e| Error::FileCopy {
                path: path.clone(),
                source: e,
            })?;
        }
    }
    Ok(())
}

/// Move a directory tree to `dest`
///
/// Uses a rename when `dest` does not exist yet, otherwise merges by copying
/// and then deletes the source.
pub fn move_directory(src: &Path, dest: &Path) -> Result<()> {
    if crate::paths::same_path(src, dest) {
        debug!("No move necessary for {}", src.display());
        return Ok(());
    }
    if !src.is_dir() {
        return Err(Error::PathNotFound(src.to_path_buf()));
    }

    if !dest.exists() {
        if let Some(parent) = dest.parent() {
            create_dir(parent)?;
        }
        if fs::rename(src, dest).is_ok() {
            return Ok(());
        }
        debug!("Rename of {} failed, copying instead", src.display());
    }

    copy_directory(src, dest, true)?;
    delete_directory(src)
}

enum Attempt {
    Retry(Error),
    Fatal(Error),
}

fn retry<F>(attempts: u32, subject: &Path, mut op: F) -> Result<()>
where
    F: FnMut(u32) -> std::result::Result<(), Attempt>,
{
    let attempts = attempts.max(1);
    let mut first_error: Option<Error> = None;

    for attempt in 1..=attempts {
        match op(attempt) {
            Ok(()) => return Ok(()),
            Err(Attempt::Fatal(e)) => return Err(first_error.unwrap_or(e)),
            Err(Attempt::Retry(e)) => {
                if first_error.is_none() {
                    error!("{e}");
                    first_error = Some(e);
                } else {
                    warn!("Attempt {attempt} on {} failed again", subject.display());
                }
                if attempt < attempts {
                    std::thread::sleep(RETRY_DELAY);
                }
            }
        }
    }

    Err(first_error.unwrap_or_else(|| Error::PathNotFound(subject.to_path_buf())))
}

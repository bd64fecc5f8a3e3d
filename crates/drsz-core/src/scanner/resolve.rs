//! Path resolution — turn user input into a canonical, existing directory.
//!
//! Only read-only `stat`/`canonicalize` calls are made here.

use crate::error::{DrszError, InvalidPathReason, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Resolve `input` to a canonical absolute directory path.
///
/// Rejects empty input, missing paths, permission-denied targets, and
/// anything that is not a directory, each with its own
/// [`InvalidPathReason`].
pub fn resolve_dir(input: impl AsRef<Path>) -> Result<PathBuf> {
    let input = input.as_ref();
    if input.as_os_str().is_empty() {
        return Err(DrszError::invalid_path(input, InvalidPathReason::Empty));
    }

    let canonical = fs::canonicalize(input)
        .map_err(|e| DrszError::invalid_path(input, InvalidPathReason::from_io(e)))?;

    let meta = fs::metadata(&canonical)
        .map_err(|e| DrszError::invalid_path(&canonical, InvalidPathReason::from_io(e)))?;

    if !meta.is_dir() {
        return Err(DrszError::invalid_path(
            canonical,
            InvalidPathReason::NotADirectory,
        ));
    }

    Ok(canonical)
}

//! Top-level enumeration — list the root's immediate child directories.
//!
//! Children are taken in whatever order the OS listing returns them.
//! Symlinks are not followed, so a link to a directory is not a target.

use crate::error::{DrszError, Result};
use crate::model::DirectoryRecord;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Enumerate the directories directly under `root`.
///
/// `root` must already be canonical (see [`super::resolve::resolve_dir`]).
/// Any listing failure, including one caused by permissions changing after
/// validation, is returned as [`DrszError::Enumeration`]. A root with no
/// subdirectories yields an empty vec.
pub fn enumerate_top_level(root: &Path) -> Result<Vec<DirectoryRecord>> {
    let enumeration_error = |path: &Path, source: std::io::Error| DrszError::Enumeration {
        path: path.to_path_buf(),
        source,
    };

    let listing = fs::read_dir(root).map_err(|e| enumeration_error(root, e))?;

    let mut records = Vec::new();
    for entry in listing {
        let entry = entry.map_err(|e| enumeration_error(root, e))?;
        let file_type = entry.file_type().map_err(|e| enumeration_error(&entry.path(), e))?;
        if !file_type.is_dir() {
            continue;
        }

        // Re-check with the same stat semantics the root was validated with.
        let path = entry.path();
        let meta = fs::metadata(&path).map_err(|e| enumeration_error(&path, e))?;
        if !meta.is_dir() {
            debug!("{} stopped being a directory during enumeration", path.display());
            continue;
        }

        records.push(DirectoryRecord::new(path));
    }

    info!(
        "Found {} top level directories in {}",
        records.len(),
        root.display()
    );
    Ok(records)
}

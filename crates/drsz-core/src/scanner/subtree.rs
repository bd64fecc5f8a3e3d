//! Subtree scanner — the unit of work dispatched per top-level directory.
//!
//! Walks a directory recursively with `jwalk` and folds every regular file
//! into a [`SubtreeTotals`]. The walk runs serially inside the calling
//! thread: concurrency between subtrees is bounded by the scheduler's
//! admission gate, not by the walker.
//!
//! # Error policy
//!
//! The scan stops at the **first** entry that cannot be read (a directory
//! that cannot be listed, a file whose metadata cannot be read) and returns
//! a [`ScanError`] naming that entry. Partial totals are discarded, never
//! returned.
//!
//! Symbolic links are not followed and do not contribute to the totals;
//! only regular files count. Directories themselves contribute zero bytes.

use crate::error::ScanError;
use crate::model::SubtreeTotals;
use std::io;
use std::path::Path;
use tracing::trace;

/// Compute total regular-file bytes and the latest file mtime under `dir`.
pub fn scan_subtree(dir: &Path) -> Result<SubtreeTotals, ScanError> {
    fold_entries(dir, walker(dir))
}

fn walker(dir: &Path) -> jwalk::WalkDir {
    jwalk::WalkDir::new(dir)
        .skip_hidden(false)
        .follow_links(false)
        .sort(false)
        .parallelism(jwalk::Parallelism::Serial)
}

/// Fold walk entries into totals, stopping at the first failure.
///
/// A directory that cannot be listed is still yielded by the walker, with
/// the failure parked in `read_children_error`; it must be checked on every
/// directory entry or the subtree silently comes back short.
fn fold_entries<I>(dir: &Path, entries: I) -> Result<SubtreeTotals, ScanError>
where
    I: IntoIterator<Item = jwalk::Result<jwalk::DirEntry<((), ())>>>,
{
    let mut totals = SubtreeTotals::default();
    let mut visited: u64 = 0;

    for entry_result in entries {
        let mut entry = entry_result.map_err(|err| {
            let path = err
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| dir.to_path_buf());
            ScanError {
                path,
                source: io::Error::from(err),
            }
        })?;
        visited += 1;

        if let Some(err) = entry.read_children_error.take() {
            return Err(ScanError {
                path: entry.path(),
                source: io::Error::from(err),
            });
        }

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let meta = entry.metadata().map_err(|err| ScanError {
            path: path.clone(),
            source: io::Error::from(err),
        })?;
        let modified = meta.modified().map_err(|source| ScanError {
            path: path.clone(),
            source,
        })?;

        totals.add_file(meta.len(), modified);
    }

    trace!(
        "{}: {} entries, {} bytes",
        dir.display(),
        visited,
        totals.size_bytes
    );
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn write_file(path: &Path, n: usize, modified: SystemTime) {
        let mut f = File::create(path).unwrap();
        f.write_all(&vec![0u8; n]).unwrap();
        f.set_modified(modified).unwrap();
    }

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn sums_nested_files_and_keeps_latest_mtime() {
        let tmp = TempDir::new().unwrap();
        let deep = tmp.path().join("x").join("y");
        fs::create_dir_all(&deep).unwrap();

        write_file(&tmp.path().join("top.bin"), 100, at(1_600_000_000));
        write_file(&tmp.path().join("x").join("mid.bin"), 250, at(1_700_000_000));
        write_file(&deep.join("deep.bin"), 650, at(1_650_000_000));

        let totals = scan_subtree(tmp.path()).unwrap();
        assert_eq!(totals.size_bytes, 1_000);
        assert_eq!(totals.last_modified, Some(at(1_700_000_000)));
    }

    #[test]
    fn directories_only_subtree_has_unset_mtime() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("a").join("b").join("c")).unwrap();

        let totals = scan_subtree(tmp.path()).unwrap();
        assert_eq!(totals.size_bytes, 0);
        assert_eq!(totals.last_modified, None);
    }

    #[test]
    fn empty_files_still_set_mtime() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("empty"), 0, at(1_234_567_890));

        let totals = scan_subtree(tmp.path()).unwrap();
        assert_eq!(totals.size_bytes, 0);
        assert_eq!(totals.last_modified, Some(at(1_234_567_890)));
    }

    #[test]
    fn missing_directory_fails() {
        let tmp = TempDir::new().unwrap();
        assert!(scan_subtree(&tmp.path().join("missing")).is_err());
    }

    /// A directory that vanishes between its parent's listing and its own
    /// `read_dir` fails the whole subtree, whatever the caller's privileges.
    #[test]
    fn unlistable_directory_fails_the_subtree() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("a.bin"), 600, at(1_600_000_000));
        let doomed = tmp.path().join("b");
        fs::create_dir(&doomed).unwrap();
        write_file(&doomed.join("two.bin"), 400, at(1_600_000_000));

        // Sorted serial walk: `a.bin` is yielded before `b` is read.
        let entries = walker(tmp.path()).sort(true).into_iter().inspect(|entry| {
            if let Ok(entry) = entry {
                if entry.file_name() == "a.bin" {
                    fs::remove_dir_all(&doomed).unwrap();
                }
            }
        });

        let err = fold_entries(tmp.path(), entries).unwrap_err();
        assert_eq!(err.path, doomed);
        assert_eq!(err.source.kind(), io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn locked_directory_fails_the_subtree() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let locked = tmp.path().join("deep");
        fs::create_dir(&locked).unwrap();
        write_file(&tmp.path().join("one.bin"), 600, at(1_600_000_000));
        write_file(&locked.join("two.bin"), 400, at(1_600_000_000));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Mode bits do not apply to privileged users.
        let privileged = fs::read_dir(&locked).is_ok();
        let result = scan_subtree(tmp.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        if privileged {
            return;
        }

        let err = result.unwrap_err();
        assert_eq!(err.path, locked);
        assert_eq!(err.source.kind(), io::ErrorKind::PermissionDenied);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_not_followed() {
        let tmp = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        write_file(&outside.path().join("big.bin"), 4_096, at(1_700_000_000));
        write_file(&tmp.path().join("small.bin"), 10, at(1_600_000_000));
        std::os::unix::fs::symlink(outside.path(), tmp.path().join("dirlink")).unwrap();
        std::os::unix::fs::symlink(
            outside.path().join("big.bin"),
            tmp.path().join("filelink"),
        )
        .unwrap();

        let totals = scan_subtree(tmp.path()).unwrap();
        assert_eq!(totals.size_bytes, 10);
        assert_eq!(totals.last_modified, Some(at(1_600_000_000)));
    }
}

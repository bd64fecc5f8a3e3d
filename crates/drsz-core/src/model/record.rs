//! Per-directory scan records and the root context that owns them.
//!
//! A record's totals are write-once: the scheduler hands each worker an
//! exclusive `&mut DirectoryRecord`, the worker fills it in exactly once,
//! and nothing reads it until every worker has been joined.

use crate::model::size::format_size;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Lifecycle of a single top-level directory within a run.
///
/// `Completed` and `Failed` are terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScanState {
    /// Enumerated, waiting for its worker to obtain an admission slot.
    #[default]
    Pending,
    /// Holds an admission slot; the walk has not started yet.
    Admitted,
    /// Walking the subtree.
    Scanning,
    /// Totals are final.
    Completed,
    /// The walk stopped at an unreadable entry; totals stay at zero.
    Failed,
}

impl ScanState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Totals for one subtree, as produced by the subtree scanner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SubtreeTotals {
    pub size_bytes: u64,
    /// `None` when the subtree contains no regular files.
    pub last_modified: Option<SystemTime>,
}

impl SubtreeTotals {
    /// Fold one regular file into the running totals.
    #[inline]
    pub fn add_file(&mut self, size: u64, modified: SystemTime) {
        self.size_bytes = self.size_bytes.saturating_add(size);
        if self.last_modified.is_none_or(|latest| modified > latest) {
            self.last_modified = Some(modified);
        }
    }
}

/// One top-level directory and its computed totals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectoryRecord {
    path: PathBuf,
    size_bytes: u64,
    last_modified: Option<SystemTime>,
    state: ScanState,
}

impl DirectoryRecord {
    /// Create a pending record. `path` must already be canonical.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            size_bytes: 0,
            last_modified: None,
            state: ScanState::Pending,
        }
    }

    /// Canonical absolute path of the directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sum of all regular-file sizes under the directory; 0 until completed.
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Most recent regular-file modification time, if any file was found.
    pub fn last_modified(&self) -> Option<SystemTime> {
        self.last_modified
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == ScanState::Completed
    }

    /// Base name of the directory, for display.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }

    /// Human-readable size, for display.
    pub fn size_string(&self) -> String {
        format_size(self.size_bytes)
    }

    pub(crate) fn set_state(&mut self, state: ScanState) {
        debug_assert!(
            !self.state.is_terminal(),
            "record {} left terminal state {:?}",
            self.path.display(),
            self.state
        );
        self.state = state;
    }

    /// Store the final totals. Called once, by the worker that owns the record.
    pub(crate) fn complete(&mut self, totals: SubtreeTotals) {
        self.set_state(ScanState::Completed);
        self.size_bytes = totals.size_bytes;
        self.last_modified = totals.last_modified;
    }

    pub(crate) fn fail(&mut self) {
        self.set_state(ScanState::Failed);
    }
}

/// The validated scan root and its top-level directories.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RootContext {
    path: PathBuf,
    records: Vec<DirectoryRecord>,
}

impl RootContext {
    pub fn new(path: PathBuf, records: Vec<DirectoryRecord>) -> Self {
        Self { path, records }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records in enumeration order.
    pub fn records(&self) -> &[DirectoryRecord] {
        &self.records
    }

    pub(crate) fn records_mut(&mut self) -> &mut [DirectoryRecord] {
        &mut self.records
    }

    pub fn into_records(self) -> Vec<DirectoryRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records whose scan finished successfully, in enumeration order.
    pub fn completed(&self) -> impl Iterator<Item = &DirectoryRecord> {
        self.records.iter().filter(|r| r.is_completed())
    }

    /// Sum of every completed record's size.
    pub fn total_bytes(&self) -> u64 {
        self.completed()
            .fold(0u64, |acc, r| acc.saturating_add(r.size_bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn totals_keep_latest_mtime() {
        let t0 = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let t1 = t0 + Duration::from_secs(60);

        let mut totals = SubtreeTotals::default();
        totals.add_file(10, t1);
        totals.add_file(5, t0);

        assert_eq!(totals.size_bytes, 15);
        assert_eq!(totals.last_modified, Some(t1));
    }

    #[test]
    fn empty_totals_have_unset_mtime() {
        let totals = SubtreeTotals::default();
        assert_eq!(totals.size_bytes, 0);
        assert_eq!(totals.last_modified, None);
    }

    #[test]
    fn record_name_is_base_name() {
        let rec = DirectoryRecord::new(PathBuf::from("/data/projects"));
        assert_eq!(rec.name(), "projects");
        assert_eq!(rec.size_string(), "0 B");
        assert_eq!(rec.state(), ScanState::Pending);
    }

    #[test]
    fn complete_moves_to_terminal_state() {
        let mut rec = DirectoryRecord::new(PathBuf::from("/data/a"));
        rec.set_state(ScanState::Admitted);
        rec.set_state(ScanState::Scanning);
        rec.complete(SubtreeTotals {
            size_bytes: 1_000,
            last_modified: None,
        });
        assert!(rec.is_completed());
        assert!(rec.state().is_terminal());
        assert_eq!(rec.size_bytes(), 1_000);
    }

    #[test]
    fn failed_records_are_excluded_from_totals() {
        let mut ok = DirectoryRecord::new(PathBuf::from("/r/ok"));
        ok.complete(SubtreeTotals {
            size_bytes: 300,
            last_modified: None,
        });
        let mut bad = DirectoryRecord::new(PathBuf::from("/r/bad"));
        bad.fail();

        let root = RootContext::new(PathBuf::from("/r"), vec![ok, bad]);
        assert_eq!(root.len(), 2);
        assert_eq!(root.completed().count(), 1);
        assert_eq!(root.total_bytes(), 300);
    }
}

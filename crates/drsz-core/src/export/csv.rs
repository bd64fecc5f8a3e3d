//! CSV export of top-level directory records.
//!
//! Layout: a `directory,bytes,lastModified` header, then one row per
//! completed record in enumeration order. The target must carry a `.csv`
//! extension (any case) and must not exist yet; an existing file is never
//! overwritten.

use crate::error::{DrszError, InvalidPathReason, Result};
use crate::export::format_timestamp;
use crate::model::DirectoryRecord;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const CSV_HEADER: [&str; 3] = ["directory", "bytes", "lastModified"];

/// One exported row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvRow {
    pub directory: PathBuf,
    pub bytes: u64,
    /// Local timestamp text; empty when the directory holds no files.
    #[serde(rename = "lastModified")]
    pub last_modified: String,
}

impl From<&DirectoryRecord> for CsvRow {
    fn from(record: &DirectoryRecord) -> Self {
        Self {
            directory: record.path().to_path_buf(),
            bytes: record.size_bytes(),
            last_modified: format_timestamp(record.last_modified()),
        }
    }
}

/// `true` if `path` names a `.csv` file, ignoring case.
pub fn is_csv_path(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Check an export target before any scan work starts.
pub fn validate_export_target(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if !is_csv_path(path) {
        return Err(DrszError::invalid_path(path, InvalidPathReason::NotCsv));
    }
    // symlink_metadata so a dangling link at the target also counts as taken.
    if path.symlink_metadata().is_ok() {
        return Err(DrszError::invalid_path(
            path,
            InvalidPathReason::AlreadyExists,
        ));
    }
    Ok(())
}

/// Write completed records to a new CSV file at `path`.
///
/// Records that did not complete are skipped. Returns the number of data
/// rows written.
pub fn export_csv(records: &[DirectoryRecord], path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    if !is_csv_path(path) {
        return Err(DrszError::invalid_path(path, InvalidPathReason::NotCsv));
    }

    let export_error = |source: io::Error| DrszError::Export {
        path: path.to_path_buf(),
        source,
    };

    let file: File = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(export_error)?;

    let mut writer = ::csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    writer
        .write_record(CSV_HEADER)
        .map_err(|e| export_error(e.into()))?;

    let mut rows = 0usize;
    for record in records {
        if !record.is_completed() {
            warn!(
                "Skipping {} in CSV export: scan did not complete",
                record.path().display()
            );
            continue;
        }
        writer
            .serialize(CsvRow::from(record))
            .map_err(|e| export_error(e.into()))?;
        rows += 1;
    }

    writer.flush().map_err(export_error)?;

    info!("Exported CSV file {}", path.display());
    Ok(rows)
}

/// Read a file written by [`export_csv`] back into rows.
pub fn read_csv(path: impl AsRef<Path>) -> Result<Vec<CsvRow>> {
    let path = path.as_ref();
    let read_error = |source: io::Error| DrszError::Export {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ::csv::Reader::from_path(path).map_err(|e| read_error(e.into()))?;
    reader
        .deserialize()
        .map(|row| row.map_err(|e: ::csv::Error| read_error(e.into())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SubtreeTotals;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn completed(path: &str, bytes: u64, secs: Option<u64>) -> DirectoryRecord {
        let mut rec = DirectoryRecord::new(PathBuf::from(path));
        rec.complete(SubtreeTotals {
            size_bytes: bytes,
            last_modified: secs.map(|s| SystemTime::UNIX_EPOCH + Duration::from_secs(s)),
        });
        rec
    }

    #[test]
    fn csv_extension_is_case_insensitive() {
        assert!(is_csv_path("some/dir/a.csv"));
        assert!(is_csv_path("some/dir/A.CSV"));
        assert!(is_csv_path("report.CsV"));
    }

    #[test]
    fn non_csv_paths_are_rejected() {
        assert!(!is_csv_path("some/dir/a.txt"));
        assert!(!is_csv_path("some/dir/csv"));
        assert!(!is_csv_path("some/dir/a.csv.bak"));
        assert!(!is_csv_path(""));
    }

    #[test]
    fn wrong_extension_creates_nothing() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("out.txt");

        let err = export_csv(&[completed("/r/a", 1, None)], &target).unwrap_err();
        assert!(matches!(
            err,
            DrszError::InvalidPath {
                reason: InvalidPathReason::NotCsv,
                ..
            }
        ));
        assert!(!target.exists());
        assert!(validate_export_target(&target).is_err());
    }

    #[test]
    fn existing_target_is_never_overwritten() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("out.csv");
        std::fs::write(&target, b"keep me").unwrap();

        assert!(matches!(
            validate_export_target(&target),
            Err(DrszError::InvalidPath {
                reason: InvalidPathReason::AlreadyExists,
                ..
            })
        ));

        let err = export_csv(&[completed("/r/a", 1, None)], &target).unwrap_err();
        match err {
            DrszError::Export { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::AlreadyExists)
            }
            other => panic!("expected Export error, got {other:?}"),
        }
        assert_eq!(std::fs::read(&target).unwrap(), b"keep me");
    }

    #[test]
    fn header_is_written_even_without_rows() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("empty.csv");

        assert_eq!(export_csv(&[], &target).unwrap(), 0);
        let text = std::fs::read_to_string(&target).unwrap();
        assert_eq!(text, "directory,bytes,lastModified\n");
    }

    #[test]
    fn incomplete_records_are_skipped() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("partial.csv");
        let mut failed = DirectoryRecord::new(PathBuf::from("/r/bad"));
        failed.fail();

        let rows = export_csv(&[completed("/r/good", 42, Some(1)), failed], &target).unwrap();
        assert_eq!(rows, 1);

        let parsed = read_csv(&target).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].directory, PathBuf::from("/r/good"));
    }

    #[test]
    fn rows_read_back_unchanged() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("rt.csv");
        let records = vec![
            completed("/r/with, comma", 1_000, Some(1_600_000_000)),
            completed("/r/empty", 0, None),
            completed("/r/big", 2_048, Some(1_700_000_000)),
        ];

        export_csv(&records, &target).unwrap();
        let parsed = read_csv(&target).unwrap();

        let expected: Vec<CsvRow> = records.iter().map(CsvRow::from).collect();
        assert_eq!(parsed, expected);
        assert_eq!(parsed[1].last_modified, "");
    }
}

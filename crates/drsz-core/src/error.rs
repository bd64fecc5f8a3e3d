//! Error taxonomy for a drsz run.
//!
//! Validation and enumeration errors are fatal and returned immediately.
//! Per-subtree [`ScanError`]s are collected by the scheduler and surfaced
//! together as an [`AggregateScanError`] once every worker has finished.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a path was rejected by validation.
#[derive(Debug, Error)]
pub enum InvalidPathReason {
    #[error("no path was provided")]
    Empty,
    #[error("path does not exist")]
    NotFound,
    #[error("permission denied")]
    PermissionDenied,
    #[error("path is not a directory")]
    NotADirectory,
    #[error("output path is not a CSV filename")]
    NotCsv,
    #[error("output file already exists")]
    AlreadyExists,
    #[error("path could not be resolved: {0}")]
    Unresolvable(#[source] io::Error),
}

impl InvalidPathReason {
    /// Map a failed `stat`/`canonicalize` onto a distinguishable reason.
    pub(crate) fn from_io(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::Unresolvable(err),
        }
    }
}

/// A single subtree walk that stopped at its first unreadable entry.
#[derive(Debug, Error)]
#[error("error while searching in {}: {source}", path.display())]
pub struct ScanError {
    /// The entry that could not be read (or the subtree root when the
    /// walker could not name the entry).
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// All per-subtree failures from one run, in enumeration order.
///
/// Never constructed empty.
#[derive(Debug)]
pub struct AggregateScanError {
    errors: Vec<ScanError>,
}

impl AggregateScanError {
    pub(crate) fn new(errors: Vec<ScanError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn first(&self) -> &ScanError {
        &self.errors[0]
    }

    pub fn errors(&self) -> &[ScanError] {
        &self.errors
    }
}

impl fmt::Display for AggregateScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "encountered {} errors, the first being: {}",
            self.errors.len(),
            self.first()
        )
    }
}

impl std::error::Error for AggregateScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.first())
    }
}

/// Top-level error type for the engine.
#[derive(Debug, Error)]
pub enum DrszError {
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        path: PathBuf,
        #[source]
        reason: InvalidPathReason,
    },

    #[error("failed to list {}: {source}", path.display())]
    Enumeration {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Scan(#[from] AggregateScanError),

    #[error("failed to export {}: {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DrszError {
    pub(crate) fn invalid_path(path: impl Into<PathBuf>, reason: InvalidPathReason) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason,
        }
    }
}

pub type Result<T> = std::result::Result<T, DrszError>;

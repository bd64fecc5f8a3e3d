//! Scan progress reporting — lightweight messages sent from the scan
//! thread to the frontend via a crossbeam channel.
//!
//! Progress is observational only: a full or disconnected channel never
//! changes what the scheduler does.

use std::path::PathBuf;
use std::time::Duration;

/// Progress updates sent from the scan thread to the frontend.
#[derive(Debug, Clone)]
pub enum ScanProgress {
    /// The root was resolved and enumerated; `total` subtrees will be scanned.
    Enumerated { root: PathBuf, total: usize },
    /// One subtree finished, successfully or not.
    ///
    /// `completed` counts finished subtrees so far and never exceeds `total`.
    DirFinished {
        index: usize,
        path: PathBuf,
        completed: usize,
        total: usize,
        ok: bool,
    },
    /// Every subtree has been joined.
    Complete {
        duration: Duration,
        error_count: usize,
    },
}

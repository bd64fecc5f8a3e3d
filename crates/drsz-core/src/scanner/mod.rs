//! Scanner module — orchestrates a drsz run.
//!
//! A run is three fatal-on-error steps followed by one collecting step:
//! 1. [`resolve::resolve_dir`] validates the root.
//! 2. [`enumerate::enumerate_top_level`] lists its child directories.
//! 3. [`schedule::Scheduler`] fans [`subtree::scan_subtree`] out over them,
//!    bounded by the [`gate::AdmissionGate`], and collects failures.
//!
//! [`scan_root`] runs all of it on the calling thread. [`start_scan`] runs it
//! on a background thread and streams [`ScanProgress`] over a channel.

pub mod enumerate;
pub mod gate;
pub mod progress;
pub mod resolve;
pub mod schedule;
pub mod subtree;

pub use enumerate::enumerate_top_level;
pub use gate::{AdmissionGate, GatePermit};
pub use progress::ScanProgress;
pub use resolve::resolve_dir;
pub use schedule::{ScanSummary, Scheduler};
pub use subtree::scan_subtree;

use crate::config::ScanConfig;
use crate::error::Result;
use crate::model::RootContext;
use crossbeam_channel::{Receiver, Sender};
use std::path::{Path, PathBuf};
use std::thread;
use tracing::info;

/// Maximum number of progress messages that may queue up in the channel.
///
/// Every message is sent with `try_send`, so a consumer that falls further
/// behind than this loses messages but never stalls a scan. Consumers should
/// drain until the channel disconnects rather than wait for `Complete`.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 4_096;

/// Handle to a scan running on a background thread.
pub struct ScanHandle {
    /// Receiver for progress updates from the scan thread.
    pub progress_rx: Receiver<ScanProgress>,
    thread: thread::JoinHandle<Result<ScanSummary>>,
}

impl ScanHandle {
    /// Wait for the scan thread and return its outcome.
    ///
    /// Resolution and enumeration failures come back as `Err`; per-subtree
    /// failures are inside the [`ScanSummary`].
    pub fn join(self) -> Result<ScanSummary> {
        match self.thread.join() {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
}

/// Resolve, enumerate, and scan `root` on the calling thread.
pub fn scan_root(root: impl AsRef<Path>, config: ScanConfig) -> Result<ScanSummary> {
    run(root.as_ref(), config, None)
}

/// Start a scan on a background thread.
pub fn start_scan(root: PathBuf, config: ScanConfig) -> ScanHandle {
    let (progress_tx, progress_rx) =
        crossbeam_channel::bounded::<ScanProgress>(PROGRESS_CHANNEL_CAPACITY);

    let thread = thread::Builder::new()
        .name("drsz-scanner".into())
        .spawn(move || run(&root, config, Some(&progress_tx)))
        .expect("failed to spawn scanner thread");

    ScanHandle {
        progress_rx,
        thread,
    }
}

fn run(
    root: &Path,
    config: ScanConfig,
    progress: Option<&Sender<ScanProgress>>,
) -> Result<ScanSummary> {
    info!("Calculating top-level subdirectory sizes in {}", root.display());

    let root = resolve_dir(root)?;
    let records = enumerate_top_level(&root)?;

    if let Some(tx) = progress {
        let _ = tx.try_send(ScanProgress::Enumerated {
            root: root.clone(),
            total: records.len(),
        });
    }

    let context = RootContext::new(root, records);
    Ok(Scheduler::new(config).run(context, progress))
}

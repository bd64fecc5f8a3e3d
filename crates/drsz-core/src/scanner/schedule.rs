//! Concurrent scheduler: runs one subtree scan per top-level directory
//! under a bounded admission gate.
//!
//! # Model
//!
//! Every record is queued up front on a work channel as an
//! `(index, &mut DirectoryRecord)` pair. A fixed pool of
//! `min(effective_limit, records)` scoped worker threads drains the queue,
//! and each walk additionally holds an [`AdmissionGate`] slot. The end of the
//! `std::thread::scope` is the completion barrier.
//!
//! Each worker has exclusive `&mut` access to the records it pulls and hands
//! back an explicit `Result<(), ScanError>` per index, so no lock guards
//! either the records or the error list: outcomes land in per-index slots and
//! are folded in enumeration order once every worker has been joined. A
//! failure never cancels siblings, and a panicking scan fails only its own
//! record.
//!
//! There is no cancellation. A worker stuck on an unresponsive filesystem
//! keeps its slot for the rest of the run.
use crate::config::ScanConfig;
use crate::error::{AggregateScanError, ScanError};
use crate::model::{DirectoryRecord, RootContext, ScanState, SubtreeTotals};
use crate::scanner::gate::AdmissionGate;
use crate::scanner::progress::ScanProgress;
use crate::scanner::subtree::scan_subtree;
use crossbeam_channel::{Receiver, Sender};
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Final state of a run: the scanned root plus every per-subtree failure.
#[derive(Debug)]
pub struct ScanSummary {
    /// Records in enumeration order. Failed records keep zero totals and
    /// [`ScanState::Failed`].
    pub root: RootContext,
    /// `Some` when at least one subtree failed.
    pub failure: Option<AggregateScanError>,
    pub duration: Duration,
    /// Largest number of subtrees that held an admission slot at once.
    pub peak_concurrency: usize,
}

impl ScanSummary {
    pub fn error_count(&self) -> usize {
        self.failure.as_ref().map_or(0, AggregateScanError::len)
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

type Outcome = (usize, Result<(), ScanError>);

/// Fans subtree scans out over a root's records.
#[derive(Debug)]
pub struct Scheduler {
    config: ScanConfig,
}

impl Scheduler {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Scan every record of `root` with the real filesystem walker.
    pub fn run(
        &self,
        root: RootContext,
        progress: Option<&Sender<ScanProgress>>,
    ) -> ScanSummary {
        self.run_with(root, progress, scan_subtree)
    }

    /// Scan every record of `root` with a caller-supplied subtree scanner.
    ///
    /// `scan` is called exactly once per record, only while an admission
    /// slot is held for it.
    pub fn run_with<F>(
        &self,
        mut root: RootContext,
        progress: Option<&Sender<ScanProgress>>,
        scan: F,
    ) -> ScanSummary
    where
        F: Fn(&Path) -> Result<SubtreeTotals, ScanError> + Sync,
    {
        let start = Instant::now();
        let total = root.len();
        let gate = AdmissionGate::new(self.config.concurrency.effective());
        let pool_size = gate.capacity().min(total);
        let completed = AtomicUsize::new(0);

        info!(
            "Scanning {} directories under {} (concurrency {}, {} workers)",
            total,
            root.path().display(),
            gate.capacity(),
            pool_size
        );

        let mut slots: Vec<Option<Result<(), ScanError>>> = (0..total).map(|_| None).collect();

        let (work_tx, work_rx) = crossbeam_channel::unbounded();
        for item in root.records_mut().iter_mut().enumerate() {
            let _ = work_tx.send(item);
        }
        drop(work_tx);

        let worker = Worker {
            total,
            gate: &gate,
            completed: &completed,
            progress,
        };

        let outcomes: Vec<Outcome> = thread::scope(|s| {
            let worker = &worker;
            let scan = &scan;
            let rx = &work_rx;

            let mut handles = Vec::with_capacity(pool_size);
            for id in 0..pool_size {
                let spawned = thread::Builder::new()
                    .name(format!("drsz-scan-{id}"))
                    .spawn_scoped(s, move || worker.drain(rx, scan));
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(err) => {
                        warn!("Could not start scan worker {id}: {err}");
                        break;
                    }
                }
            }

            // Without any pool thread the queue is drained right here.
            let mut outcomes = if handles.is_empty() {
                worker.drain(rx, scan)
            } else {
                Vec::new()
            };
            for handle in handles {
                match handle.join() {
                    Ok(done) => outcomes.extend(done),
                    Err(_) => warn!("A scan worker exited abnormally"),
                }
            }
            outcomes
        });
        drop(work_rx);

        for (index, outcome) in outcomes {
            slots[index] = Some(outcome);
        }

        let mut errors = Vec::new();
        for (record, slot) in root.records_mut().iter_mut().zip(slots) {
            let err = match slot {
                Some(Ok(())) => continue,
                Some(Err(err)) => err,
                None => {
                    if !record.state().is_terminal() {
                        record.fail();
                    }
                    ScanError {
                        path: record.path().to_path_buf(),
                        source: io::Error::other("scan worker exited before finishing"),
                    }
                }
            };
            warn!("{err}");
            errors.push(err);
        }

        let duration = start.elapsed();
        let error_count = errors.len();
        info!(
            "Scan complete: {} directories, {} errors in {:?}",
            total, error_count, duration
        );

        if let Some(tx) = progress {
            let _ = tx.try_send(ScanProgress::Complete {
                duration,
                error_count,
            });
        }

        ScanSummary {
            root,
            failure: AggregateScanError::new(errors),
            duration,
            peak_concurrency: gate.peak(),
        }
    }
}

/// Shared, read-only context for the worker pool.
struct Worker<'a> {
    total: usize,
    gate: &'a AdmissionGate,
    completed: &'a AtomicUsize,
    progress: Option<&'a Sender<ScanProgress>>,
}

impl Worker<'_> {
    /// Scan queued records until the work channel is empty.
    fn drain<'r, F>(
        &self,
        rx: &Receiver<(usize, &'r mut DirectoryRecord)>,
        scan: &F,
    ) -> Vec<Outcome>
    where
        F: Fn(&Path) -> Result<SubtreeTotals, ScanError>,
    {
        rx.iter()
            .map(|(index, record)| (index, self.scan_one(index, record, scan)))
            .collect()
    }

    fn scan_one<F>(
        &self,
        index: usize,
        record: &mut DirectoryRecord,
        scan: &F,
    ) -> Result<(), ScanError>
    where
        F: Fn(&Path) -> Result<SubtreeTotals, ScanError>,
    {
        let permit = self.gate.acquire();
        record.set_state(ScanState::Admitted);

        record.set_state(ScanState::Scanning);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| scan(record.path())))
            .unwrap_or_else(|_| {
                Err(ScanError {
                    path: record.path().to_path_buf(),
                    source: io::Error::other("subtree scan panicked"),
                })
            });
        match &outcome {
            Ok(totals) => record.complete(*totals),
            Err(_) => record.fail(),
        }
        drop(permit);

        let ok = outcome.is_ok();
        debug!(
            "{} finished: {:?}, {} bytes",
            record.path().display(),
            record.state(),
            record.size_bytes()
        );

        let completed = (self.completed.fetch_add(1, Ordering::SeqCst) + 1).min(self.total);
        if let Some(tx) = self.progress {
            // Never block a worker on a slow consumer.
            let _ = tx.try_send(ScanProgress::DirFinished {
                index,
                path: record.path().to_path_buf(),
                completed,
                total: self.total,
                ok,
            });
        }

        outcome.map(|_| ())
    }
}

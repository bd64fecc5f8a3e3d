//! One CLI invocation: validate, scan with a progress bar, print, export.
//!
//! Fatal input errors are returned before any scan starts. A partial scan
//! failure still prints and exports whatever completed, then comes back as
//! an error so the process exits non-zero.

use crate::args::Args;
use crate::progress::ScanBar;
use crate::report::render_table;
use anyhow::Context;
use drsz_core::export::{export_csv, validate_export_target};
use drsz_core::model::format_count;
use drsz_core::scanner::{start_scan, ScanProgress};
use drsz_core::ScanConfig;
use std::io::Write;
use std::time::Instant;
use tracing::{debug, info};

pub fn run(args: &Args, out: &mut dyn Write) -> anyhow::Result<()> {
    let started = Instant::now();

    let (concurrency, warning) = args.concurrency();
    if let Some(warning) = warning {
        eprintln!("{warning}");
    }

    if let Some(target) = &args.output {
        validate_export_target(target)?;
    }

    writeln!(
        out,
        "Calculating top-level subdirectory sizes in {}",
        args.root.display()
    )?;

    let config = ScanConfig::with_concurrency(concurrency);
    debug!("Scan configuration: {config:?}");

    let handle = start_scan(args.root.clone(), config);
    let bar = ScanBar::new();

    // Drain until the scan thread drops its sender.
    for message in handle.progress_rx.iter() {
        match message {
            ScanProgress::Enumerated { root, total } => {
                bar.set_total(total);
                writeln!(
                    out,
                    "Found {} top level directories in {}",
                    format_count(total as u64),
                    root.display()
                )?;
            }
            ScanProgress::DirFinished {
                path, completed, ..
            } => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                bar.advance_to(completed, &name);
            }
            ScanProgress::Complete {
                duration,
                error_count,
            } => {
                info!("Scanner finished in {duration:?} with {error_count} errors");
            }
        }
    }
    bar.finish();

    let summary = handle.join()?;

    write!(out, "{}", render_table(summary.root.records()))?;

    if let Some(failure) = &summary.failure {
        for err in failure.errors() {
            eprintln!("{err}");
        }
    }

    if let Some(target) = &args.output {
        let rows = export_csv(summary.root.records(), target)?;
        writeln!(out, "Exported CSV file {} ({rows} rows)", target.display())?;
    }

    writeln!(out, "Completed in {:.2?}", started.elapsed())?;

    match summary.failure {
        Some(failure) => {
            Err(anyhow::Error::new(failure)).context("some directories could not be scanned")
        }
        None => Ok(()),
    }
}

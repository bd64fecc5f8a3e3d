//! drsz Core — scanning engine, data model, and CSV export.
//!
//! This crate contains all business logic with zero terminal dependencies.
//! The CLI crate drives it, but any frontend can.
//!
//! # Modules
//!
//! - [`config`] — Scan configuration (concurrency limit).
//! - [`error`] — Error taxonomy for resolution, enumeration, scanning, and export.
//! - [`model`] — Per-directory records and the root context that owns them.
//! - [`scanner`] — Path resolution, enumeration, subtree walking, and the bounded scheduler.
//! - [`export`] — CSV export and timestamp formatting.

pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod scanner;

pub use config::{Concurrency, ScanConfig, DEFAULT_CONCURRENCY};
pub use error::{AggregateScanError, DrszError, InvalidPathReason, ScanError};
pub use model::{DirectoryRecord, RootContext, ScanState};
pub use scanner::{scan_root, start_scan, ScanHandle, ScanSummary};

//! Data model for a drsz run.
//!
//! A [`RootContext`] owns one [`DirectoryRecord`] per top-level directory.

pub mod record;
pub mod size;

pub use record::{DirectoryRecord, RootContext, ScanState, SubtreeTotals};
pub use size::{format_count, format_size};

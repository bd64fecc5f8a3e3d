//! drsz CLI — argument parsing, progress bar, and report rendering.
//!
//! This crate contains all terminal code. Scanning lives in `drsz-core`.

pub mod app;
pub mod args;
pub mod progress;
pub mod report;

pub use app::run;
pub use args::Args;

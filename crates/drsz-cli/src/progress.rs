//! Progress bar for a running scan.
//!
//! One tick per finished top-level directory. Drawn on stderr and hidden
//! automatically when stderr is not a terminal.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} dirs {msg}";

pub struct ScanBar {
    bar: ProgressBar,
}

impl ScanBar {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// The number of directories to scan is known.
    pub fn set_total(&self, total: usize) {
        self.bar.set_length(total as u64);
    }

    /// `completed` directories have finished; `last` is the most recent one.
    pub fn advance_to(&self, completed: usize, last: &str) {
        // Messages can arrive out of order; never move backwards.
        if completed as u64 > self.bar.position() {
            self.bar.set_position(completed as u64);
        }
        self.bar.set_message(last.to_string());
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ScanBar {
    fn default() -> Self {
        Self::new()
    }
}

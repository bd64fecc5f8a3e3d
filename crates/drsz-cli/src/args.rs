//! Command-line arguments.

use clap::Parser;
use drsz_core::config::{Clamped, Concurrency};
use drsz_core::DEFAULT_CONCURRENCY;
use std::path::PathBuf;
use tracing::Level;

const EXAMPLES: &str = "\
Examples:
  drsz ./some_directory
  drsz -o ./results.csv ./some_directory      (creates an output file)
  drsz -c 5 ./some_directory                  (5 concurrent searches)";

/// Report the total size and latest modification time of every
/// top-level subdirectory of ROOT.
#[derive(Parser, Debug, Clone)]
#[command(name = "drsz", version, about, after_help = EXAMPLES)]
pub struct Args {
    /// Directory whose immediate subdirectories are measured.
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Save results to this CSV file. It must not already exist.
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Number of directory searches allowed to run at once (0-255; 0 means 1).
    /// Out-of-range values are clamped.
    #[arg(
        short = 'c',
        long = "concurrency",
        value_name = "N",
        allow_negative_numbers = true,
        default_value_t = i64::from(DEFAULT_CONCURRENCY)
    )]
    pub concurrency: i64,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Concurrency limit after clamping, plus a warning to show if it was
    /// corrected.
    pub fn concurrency(&self) -> (Concurrency, Option<&'static str>) {
        let (limit, clamped) = Concurrency::from_requested(self.concurrency);
        let warning = match clamped {
            Clamped::No => None,
            Clamped::Negative => {
                Some("WARNING: Negative concurrency limit was provided; setting to 0.")
            }
            Clamped::TooLarge => {
                Some("WARNING: Large concurrency limit was provided; clamping to 255.")
            }
        };
        (limit, warning)
    }

    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

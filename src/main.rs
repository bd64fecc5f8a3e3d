//! drsz — top-level directory size report.
//!
//! Thin binary entry point. All logic lives in the `drsz-core`
//! and `drsz-cli` crates.

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let args = drsz_cli::Args::parse();

    // Logs go to stderr so stdout carries only the report.
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("drsz starting");

    let stdout = std::io::stdout();
    drsz_cli::run(&args, &mut stdout.lock())
}

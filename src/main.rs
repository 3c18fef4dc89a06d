//! # glp2report
//!
//! Command-line report generator for Schleich GLP2-ce hi-pot tester exports.
//!
//! ## Usage
//!
//! ```bash
//! # Report on every export and definition in the configured directories
//! glp2report report
//!
//! # One export file, JSON output written to a file
//! glp2report report report.json -d bench.csv --json
//!
//! # Exports written as UTF-16 without a byte-order mark
//! glp2report report --data-encoding utf-16le --definition-encoding utf-16le
//!
//! # Inspect a single graph payload
//! glp2report graph '|#GR#|<t\s|U\V>0|0\1|1500\}'
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use glp2report::records::TextEncoding;

mod config;
mod discover;
mod graph;
mod report;

/// glp2report - Reports for GLP2 hi-pot tester data exports
#[derive(Parser)]
#[command(name = "glp2report")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Link data exports to test definitions and print a report
    Report {
        /// Write the report to this file instead of stdout
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Load settings from a TOML config file (default: glp2report.toml if present)
        #[arg(short = 'c', long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Use only this data file from the data directory
        #[arg(short = 'd', long, value_name = "NAME")]
        data_file: Option<String>,

        /// Use only this test definition from the definition directory
        #[arg(short = 't', long, value_name = "NAME")]
        definition_file: Option<String>,

        /// Prefix prepended to the configured directories
        #[arg(long, value_name = "DIR")]
        dir_prefix: Option<PathBuf>,

        /// Encoding of data files without a BOM: auto, utf-8, utf-16le, utf-16be
        #[arg(long, value_name = "ENCODING")]
        data_encoding: Option<TextEncoding>,

        /// Encoding of test definitions without a BOM: auto, utf-8, utf-16le, utf-16be
        #[arg(long, value_name = "ENCODING")]
        definition_encoding: Option<TextEncoding>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,

        /// Samples listed per step in text output
        #[arg(long, default_value_t = 0)]
        samples: usize,

        /// Exit with an error if any run or definition is unmatched
        #[arg(long)]
        strict: bool,
    },

    /// Decode a single graph payload and print its axes and samples
    Graph {
        /// Raw payload string
        #[arg(value_name = "PAYLOAD")]
        payload: String,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Report {
            output,
            config,
            data_file,
            definition_file,
            dir_prefix,
            data_encoding,
            definition_encoding,
            json,
            samples,
            strict,
        } => report::run(report::ReportArgs {
            output,
            config,
            data_file,
            definition_file,
            dir_prefix,
            data_encoding,
            definition_encoding,
            json,
            samples,
            strict,
        }),
        Commands::Graph { payload } => graph::run(&payload),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_output_is_positional() {
        let cli = Cli::try_parse_from([
            "glp2report",
            "report",
            "report.json",
            "-d",
            "bench.csv",
            "--json",
            "--data-encoding",
            "UTF-16",
        ])
        .unwrap();

        match cli.command {
            Commands::Report {
                output,
                data_file,
                json,
                data_encoding,
                definition_encoding,
                ..
            } => {
                assert_eq!(output, Some(PathBuf::from("report.json")));
                assert_eq!(data_file.as_deref(), Some("bench.csv"));
                assert!(json);
                assert_eq!(data_encoding, Some(TextEncoding::Utf16Le));
                assert_eq!(definition_encoding, None);
            }
            Commands::Graph { .. } => panic!("expected report command"),
        }
    }

    #[test]
    fn test_unknown_encoding_rejected() {
        let result =
            Cli::try_parse_from(["glp2report", "report", "--definition-encoding", "latin1"]);
        assert!(result.is_err());
    }
}

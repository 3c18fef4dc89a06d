use anyhow::{bail, Context, Result};
use chrono::Local;
use log::{error, info};
use std::path::PathBuf;

use glp2report::association::associate;
use glp2report::records::{
    load_data_file, load_definition_file_with, TestDefinition, TestRecord, TextEncoding,
};
use glp2report::report::{Report, ReportOptions};

use super::config::Config;
use super::discover::{find_files, DATA_EXTENSION, DEFINITION_EXTENSION};

/// Arguments of the report command
pub struct ReportArgs {
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub data_file: Option<String>,
    pub definition_file: Option<String>,
    pub dir_prefix: Option<PathBuf>,
    pub data_encoding: Option<TextEncoding>,
    pub definition_encoding: Option<TextEncoding>,
    pub json: bool,
    pub samples: usize,
    pub strict: bool,
}

/// Load inputs, link them and emit the report
pub fn run(args: ReportArgs) -> Result<()> {
    let started = Local::now();
    info!("Process start time: {}", started.format("%m/%d/%Y %H:%M:%S"));

    let config = Config::load(args.config.as_deref())?;
    let data_dir = config.data_path(args.dir_prefix.as_deref());
    let definition_dir = config.definition_path(args.dir_prefix.as_deref());
    info!("Test data path: {}", data_dir.display());
    info!("Test definition path: {}", definition_dir.display());

    let definition_files = find_files(
        &definition_dir,
        DEFINITION_EXTENSION,
        args.definition_file.as_deref(),
    )?;
    let definition_encoding = args
        .definition_encoding
        .unwrap_or(config.definitions.encoding);
    let mut definitions: Vec<TestDefinition> = Vec::new();
    for path in &definition_files {
        match load_definition_file_with(path, definition_encoding) {
            Ok(dfn) => definitions.push(dfn),
            Err(e) => error!("Unable to load test definition {}: {}", path.display(), e),
        }
    }

    let data_files = find_files(&data_dir, DATA_EXTENSION, args.data_file.as_deref())?;
    let mut options = config.data_file_options();
    if let Some(encoding) = args.data_encoding {
        options.encoding = encoding;
    }
    let mut records: Vec<TestRecord> = Vec::new();
    for path in &data_files {
        match load_data_file(path, &options) {
            Ok(mut loaded) => records.append(&mut loaded),
            Err(e) => error!("Unable to load test data {}: {}", path.display(), e),
        }
    }

    info!(
        "Loaded {} test run(s) from {} file(s), {} definition(s) from {} file(s)",
        records.len(),
        data_files.len(),
        definitions.len(),
        definition_files.len()
    );

    let association = associate(&records, &definitions);
    let report_options = ReportOptions {
        sample_preview: args.samples,
        ..Default::default()
    };
    let report = Report::build(&records, &definitions, &association, &report_options);

    let rendered = if args.json {
        report.to_json().context("Failed to serialize report")?
    } else if args.output.is_some() {
        report.to_string()
    } else {
        report.format_colored()
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
            info!("Report written to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    let finished = Local::now();
    info!("Process end time: {}", finished.format("%m/%d/%Y %H:%M:%S"));
    info!("Duration: {}", finished - started);

    if args.strict && report.has_orphans() {
        bail!(
            "{} run(s) and {} definition(s) are unmatched",
            report.orphan_records.len(),
            report.orphan_definitions.len()
        );
    }

    Ok(())
}

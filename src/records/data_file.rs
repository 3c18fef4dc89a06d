use std::fs;
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::text::{decode_text_with, TextEncoding};
use super::{LoadError, TestRecord, TestStep};

/// Column positions inside a tester data export.
///
/// Every row of the export is one test step; column 0 carries the run id that
/// groups rows into runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    /// Run id shared by all rows of one run
    pub run_id: usize,
    /// Step GUID
    pub step_guid: usize,
    /// Step number
    pub step_number: usize,
    /// Program GUID linking the run to its test definition
    pub program_guid: usize,
    /// Program name
    pub program_name: usize,
    /// Nominal voltage
    pub nominal_voltage: usize,
    /// Measured voltage
    pub measured_voltage: usize,
    /// Current limit
    pub current_limit: usize,
    /// Measured current
    pub measured_current: usize,
    /// Free-text comment
    pub comment: usize,
    /// Step timestamp
    pub timestamp: usize,
    /// Tester device number
    pub device_number: usize,
    /// Embedded graph payload
    pub graph_payload: usize,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            run_id: 0,
            step_guid: 1,
            step_number: 2,
            program_guid: 3,
            program_name: 4,
            nominal_voltage: 10,
            measured_voltage: 11,
            current_limit: 12,
            measured_current: 13,
            comment: 20,
            timestamp: 30,
            device_number: 31,
            graph_payload: 76,
        }
    }
}

/// Settings for decoding a data export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFileOptions {
    /// Field delimiter
    pub delimiter: u8,
    /// Decimal separator of numeric fields
    pub decimal_separator: char,
    /// Column layout
    pub columns: ColumnMap,
    /// Encoding assumed when the file has no byte-order mark
    pub encoding: TextEncoding,
}

impl Default for DataFileOptions {
    fn default() -> Self {
        Self {
            delimiter: b';',
            decimal_separator: '.',
            columns: ColumnMap::default(),
            encoding: TextEncoding::Auto,
        }
    }
}

/// Load all test runs contained in one data export file
pub fn load_data_file<P: AsRef<Path>>(
    path: P,
    options: &DataFileOptions,
) -> Result<Vec<TestRecord>, LoadError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let text = decode_text_with(&bytes, options.encoding)?;

    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let records = parse_data_export(&source, &text, options)?;
    debug!("{}: {} test run(s)", source, records.len());
    Ok(records)
}

/// Decode the text of a data export into test runs.
///
/// The first row is the header. Rows are grouped by run id in order of first
/// appearance; steps keep file order.
pub fn parse_data_export(
    source: &str,
    text: &str,
    options: &DataFileOptions,
) -> Result<Vec<TestRecord>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .flexible(true)
        .has_headers(true)
        .from_reader(text.as_bytes());

    let header_width = reader.headers()?.len();
    if header_width == 0 {
        return Err(LoadError::InvalidFormat(format!("{source}: missing header row")));
    }

    let cols = &options.columns;
    let mut records: Vec<TestRecord> = Vec::new();

    for (line, row) in reader.records().enumerate() {
        let row = row?;
        let field = |idx: usize| row.get(idx).unwrap_or("").to_string();

        let run_id = field(cols.run_id);
        if run_id.trim().is_empty() {
            continue;
        }

        if row.len() <= cols.graph_payload {
            warn!(
                "{}: row {} has {} columns, graph payload column {} is missing",
                source,
                line + 2,
                row.len(),
                cols.graph_payload
            );
        }

        let step = TestStep {
            step_guid: field(cols.step_guid),
            step_number: field(cols.step_number),
            nominal_voltage: field(cols.nominal_voltage),
            measured_voltage: field(cols.measured_voltage),
            current_limit: field(cols.current_limit),
            measured_current: field(cols.measured_current),
            timestamp: field(cols.timestamp),
            device_number: field(cols.device_number),
            comment: field(cols.comment),
            graph_payload: field(cols.graph_payload),
            decimal_separator: options.decimal_separator,
        };

        match records.iter_mut().find(|r| r.run_id == run_id) {
            Some(record) => record.steps.push(step),
            None => {
                let record = TestRecord::new(source, &run_id, &field(cols.program_guid))
                    .with_program_name(&field(cols.program_name))
                    .with_step(step);
                records.push(record);
            }
        }
    }

    Ok(records)
}

use serde::{Deserialize, Serialize};

use super::text::parse_decimal;
use crate::graph::{self, GraphData, ParseError};

/// One executed test step, as exported by the tester.
///
/// Scalar fields keep the text the tester wrote; the `*_value` accessors
/// coerce them using the decimal separator of the export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestStep {
    /// Step GUID
    pub step_guid: String,

    /// Step number as written in the export
    pub step_number: String,

    /// Nominal test voltage
    pub nominal_voltage: String,

    /// Measured voltage
    pub measured_voltage: String,

    /// Current limit
    pub current_limit: String,

    /// Measured current
    pub measured_current: String,

    /// Step timestamp
    pub timestamp: String,

    /// Tester device number
    pub device_number: String,

    /// Free-text comment
    pub comment: String,

    /// Embedded graph payload
    pub graph_payload: String,

    /// Decimal separator used by the export
    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: char,
}

fn default_decimal_separator() -> char {
    '.'
}

impl Default for TestStep {
    fn default() -> Self {
        Self {
            step_guid: String::new(),
            step_number: String::new(),
            nominal_voltage: String::new(),
            measured_voltage: String::new(),
            current_limit: String::new(),
            measured_current: String::new(),
            timestamp: String::new(),
            device_number: String::new(),
            comment: String::new(),
            graph_payload: String::new(),
            decimal_separator: default_decimal_separator(),
        }
    }
}

impl TestStep {
    /// Create an empty step for the given step GUID
    pub fn new(step_guid: &str) -> Self {
        Self {
            step_guid: step_guid.to_string(),
            ..Default::default()
        }
    }

    /// Decode the embedded graph payload
    pub fn graph(&self) -> Result<GraphData, ParseError> {
        graph::parse(&self.graph_payload)
    }

    fn number(&self, value: &str) -> Option<f64> {
        parse_decimal(value, self.decimal_separator)
    }

    /// Nominal voltage as a number
    pub fn nominal_voltage_value(&self) -> Option<f64> {
        self.number(&self.nominal_voltage)
    }

    /// Measured voltage as a number
    pub fn measured_voltage_value(&self) -> Option<f64> {
        self.number(&self.measured_voltage)
    }

    /// Current limit as a number
    pub fn current_limit_value(&self) -> Option<f64> {
        self.number(&self.current_limit)
    }

    /// Measured current as a number
    pub fn measured_current_value(&self) -> Option<f64> {
        self.number(&self.measured_current)
    }
}

/// One test run: all steps of one run id from one data file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestRecord {
    /// Data file the run was read from
    pub source_file: String,

    /// Run id shared by every row of the run
    pub run_id: String,

    /// GUID of the test program that was executed
    pub program_guid: String,

    /// Name of the test program that was executed
    pub program_name: String,

    /// Steps in file order
    pub steps: Vec<TestStep>,
}

impl TestRecord {
    /// Create a record with no steps
    pub fn new(source_file: &str, run_id: &str, program_guid: &str) -> Self {
        Self {
            source_file: source_file.to_string(),
            run_id: run_id.to_string(),
            program_guid: program_guid.to_string(),
            ..Default::default()
        }
    }

    /// Builder-style program name setter
    pub fn with_program_name(mut self, name: &str) -> Self {
        self.program_name = name.to_string();
        self
    }

    /// Builder-style step appender
    pub fn with_step(mut self, step: TestStep) -> Self {
        self.steps.push(step);
        self
    }
}

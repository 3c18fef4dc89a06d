//! # Report Module
//!
//! Assembles linked runs and definitions into a [`Report`]: one section per
//! matched `(run, definition)` pair, each step with its decoded graph, plus
//! the orphan diagnostics of the association.
//!
//! Failures stay local to the step they concern. A step whose payload does not
//! decode gets [`StepGraph::Missing`] and the report carries on.
//!
//! ## Usage
//!
//! ```rust
//! use glp2report::association::associate;
//! use glp2report::records::{TestDefinition, TestRecord, TestStep};
//! use glp2report::report::{Report, ReportOptions};
//!
//! let mut step = TestStep::new("s1");
//! step.graph_payload = "|#GR#|<t\\s|U\\V>0|0\\1|1500\\}".to_string();
//! let records = vec![TestRecord::new("a.csv", "run-1", "A").with_step(step)];
//! let definitions = vec![TestDefinition::new("Mains", "A")];
//!
//! let association = associate(&records, &definitions);
//! let report = Report::build(&records, &definitions, &association, &ReportOptions::default());
//! assert_eq!(report.runs.len(), 1);
//! assert_eq!(report.missing_graph_count(), 0);
//! println!("{}", report);
//! ```

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;

use crate::association::AssociationResult;
use crate::graph::{GraphData, ParseError};
use crate::records::{DefinitionStep, TestDefinition, TestRecord, TestStep};

mod render;

#[cfg(test)]
mod tests;

/// Settings for report assembly and rendering
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Report title
    pub title: String,
    /// Number of samples listed per step in text output (0 lists none)
    pub sample_preview: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: "GLP2 Test Report".to_string(),
            sample_preview: 0,
        }
    }
}

/// Column statistics of one graph axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisSummary {
    /// Axis label
    pub label: String,
    /// Axis units
    pub units: String,
    /// Smallest value, if the column is numeric and non-empty
    pub min: Option<f64>,
    /// Largest value, if the column is numeric and non-empty
    pub max: Option<f64>,
    /// Why the column could not be summarized
    pub error: Option<String>,
}

impl AxisSummary {
    fn from_graph(graph: &GraphData, axis: usize) -> Self {
        let (min, max, error) = match graph.axis_values(axis) {
            Ok(values) => {
                let min = values.iter().copied().reduce(f64::min);
                let max = values.iter().copied().reduce(f64::max);
                (min, max, None)
            }
            Err(e) => (None, None, Some(e.to_string())),
        };
        Self {
            label: graph.axis_label(axis).to_string(),
            units: graph.axis_units(axis).to_string(),
            min,
            max,
            error,
        }
    }
}

/// Graph of one step, or the reason it is absent
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepGraph {
    /// Decoded payload with per-axis statistics
    Parsed {
        /// Decoded graph
        graph: GraphData,
        /// One summary per axis definition
        axes: Vec<AxisSummary>,
    },
    /// No graph data; the payload did not decode
    Missing {
        /// Decoder message
        reason: String,
    },
}

impl StepGraph {
    fn from_result(result: Result<GraphData, ParseError>) -> Self {
        match result {
            Ok(graph) => {
                let axes = (0..graph.axes.len())
                    .map(|axis| AxisSummary::from_graph(&graph, axis))
                    .collect();
                StepGraph::Parsed { graph, axes }
            }
            Err(e) => StepGraph::Missing {
                reason: e.to_string(),
            },
        }
    }

    /// True if the step carries no graph data
    pub fn is_missing(&self) -> bool {
        matches!(self, StepGraph::Missing { .. })
    }
}

/// One executed step in a report section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepSection {
    /// Step number
    pub number: String,
    /// Step GUID
    pub step_guid: String,
    /// Nominal voltage
    pub nominal_voltage: String,
    /// Measured voltage
    pub measured_voltage: String,
    /// Current limit
    pub current_limit: String,
    /// Measured current
    pub measured_current: String,
    /// Step timestamp
    pub timestamp: String,
    /// Free-text comment
    pub comment: String,
    /// Decoded graph
    pub graph: StepGraph,
}

impl StepSection {
    fn from_step(step: &TestStep) -> Self {
        Self {
            number: step.step_number.clone(),
            step_guid: step.step_guid.clone(),
            nominal_voltage: step.nominal_voltage.clone(),
            measured_voltage: step.measured_voltage.clone(),
            current_limit: step.current_limit.clone(),
            measured_current: step.measured_current.clone(),
            timestamp: step.timestamp.clone(),
            comment: step.comment.clone(),
            graph: StepGraph::from_result(step.graph()),
        }
    }
}

#[cfg(feature = "parallel")]
fn build_steps(steps: &[TestStep]) -> Vec<StepSection> {
    use rayon::prelude::*;
    steps.par_iter().map(StepSection::from_step).collect()
}

#[cfg(not(feature = "parallel"))]
fn build_steps(steps: &[TestStep]) -> Vec<StepSection> {
    steps.iter().map(StepSection::from_step).collect()
}

/// One matched `(run, definition)` pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSection {
    /// Data file the run came from
    pub source_file: String,
    /// Run id
    pub run_id: String,
    /// Program name recorded with the run
    pub program_name: String,
    /// Program GUID
    pub program_guid: String,
    /// Name of the matched definition
    pub definition_name: String,
    /// Comments of the matched definition
    pub definition_comments: String,
    /// Steps of the matched definition
    pub definition_steps: Vec<DefinitionStep>,
    /// Executed steps, in file order
    pub steps: Vec<StepSection>,
}

/// A run that matched no definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrphanRecord {
    /// Data file
    pub source_file: String,
    /// Run id
    pub run_id: String,
    /// Program GUID no definition carries
    pub program_guid: String,
    /// Program name recorded with the run
    pub program_name: String,
}

/// A definition no run referenced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrphanDefinition {
    /// Definition name
    pub name: String,
    /// Definition GUID
    pub guid: String,
}

/// Complete report over one set of data files and definitions
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Report title
    pub title: String,
    /// Time the report was assembled
    pub generated_at: DateTime<Utc>,
    /// Matched runs, in match order
    pub runs: Vec<RunSection>,
    /// Runs without a definition
    pub orphan_records: Vec<OrphanRecord>,
    /// Definitions without a run
    pub orphan_definitions: Vec<OrphanDefinition>,
    /// Distinct program names referenced per data file
    pub programs_by_file: BTreeMap<String, BTreeSet<String>>,
    /// GUIDs shared by more than one matched definition
    pub duplicate_guids: Vec<String>,
    #[serde(skip)]
    sample_preview: usize,
}

impl Report {
    /// Assemble a report from loaded inputs and their association
    pub fn build(
        records: &[TestRecord],
        definitions: &[TestDefinition],
        association: &AssociationResult,
        options: &ReportOptions,
    ) -> Self {
        let runs: Vec<RunSection> = association
            .matches
            .iter()
            .filter_map(|m| Some((records.get(m.record)?, definitions.get(m.definition)?)))
            .map(|(record, dfn)| RunSection {
                source_file: record.source_file.clone(),
                run_id: record.run_id.clone(),
                program_name: record.program_name.clone(),
                program_guid: record.program_guid.clone(),
                definition_name: dfn.name.clone(),
                definition_comments: dfn.comments.clone(),
                definition_steps: dfn.steps.clone(),
                steps: build_steps(&record.steps),
            })
            .collect();

        let orphan_records: Vec<OrphanRecord> = association
            .unmatched_records
            .iter()
            .filter_map(|&i| records.get(i))
            .map(|r| OrphanRecord {
                source_file: r.source_file.clone(),
                run_id: r.run_id.clone(),
                program_guid: r.program_guid.clone(),
                program_name: r.program_name.clone(),
            })
            .collect();

        let orphan_definitions: Vec<OrphanDefinition> = association
            .unmatched_definitions
            .iter()
            .filter_map(|&i| definitions.get(i))
            .map(|d| OrphanDefinition {
                name: d.name.clone(),
                guid: d.guid.clone(),
            })
            .collect();

        let duplicate_guids: Vec<String> = association
            .duplicate_definition_guids(definitions)
            .into_iter()
            .map(str::to_string)
            .collect();

        for guid in &duplicate_guids {
            warn!("Test definition GUID {} is defined more than once", guid);
        }
        for orphan in &orphan_records {
            warn!(
                "{}: run {} references unknown program GUID '{}'",
                orphan.source_file, orphan.run_id, orphan.program_guid
            );
        }

        let report = Self {
            title: options.title.clone(),
            generated_at: Utc::now(),
            runs,
            orphan_records,
            orphan_definitions,
            programs_by_file: association.programs_by_file.clone(),
            duplicate_guids,
            sample_preview: options.sample_preview,
        };

        info!(
            "Report assembled: {} run(s), {} step(s), {} without graph data",
            report.runs.len(),
            report.step_count(),
            report.missing_graph_count()
        );
        report
    }

    /// Total executed steps across all runs
    pub fn step_count(&self) -> usize {
        self.runs.iter().map(|r| r.steps.len()).sum()
    }

    /// Steps whose payload did not decode
    pub fn missing_graph_count(&self) -> usize {
        self.runs
            .iter()
            .flat_map(|r| &r.steps)
            .filter(|s| s.graph.is_missing())
            .count()
    }

    /// True if any run or definition went unmatched
    pub fn has_orphans(&self) -> bool {
        !self.orphan_records.is_empty() || !self.orphan_definitions.is_empty()
    }

    /// Serialize the whole report as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

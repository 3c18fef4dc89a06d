//! # glp2report - Reports for GLP2 Hi-Pot Tester Exports
//!
//! `glp2report` turns the data exports of a Schleich GLP2-ce hi-pot modular
//! tester into human-readable reports. It links each exported test run to the
//! test program (`.TPR` definition) it was executed from and decodes the
//! graph payload the tester embeds in every step.
//!
//! ## Pipeline
//!
//! ```text
//! *.csv ──► records::load_data_file ──┐
//!                                     ├─► association::associate ──► report::Report
//! *.TPR ──► records::load_definition_file ┘          │
//!                                                    └─► graph::parse (per step)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use glp2report::association::associate;
//! use glp2report::records::{load_data_file, load_definition_file, DataFileOptions};
//! use glp2report::report::{Report, ReportOptions};
//!
//! let records = load_data_file("data/bench.csv", &DataFileOptions::default())?;
//! let definitions = vec![load_definition_file("programs/Mains.TPR")?];
//!
//! let association = associate(&records, &definitions);
//! let report = Report::build(&records, &definitions, &association, &ReportOptions::default());
//! println!("{}", report);
//! # Ok::<(), glp2report::records::LoadError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`graph`]: graph payload grammar, parser and sample matrix
//! - [`records`]: test run / test definition models and their file loaders
//! - [`association`]: GUID-based linking of runs to definitions
//! - [`report`]: report assembly, text rendering and JSON export

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod association;
pub mod graph;
pub mod records;
pub mod report;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::association::{associate, AssociationResult, RecordMatch};
    pub use crate::graph::{
        axis_values, parse, AxisDefinition, GraphData, GraphGrammar, ParseError, Sample,
        SampleMatrix,
    };
    pub use crate::records::{
        load_data_file, load_definition_file, ColumnMap, DataFileOptions, DefinitionStep,
        LoadError, TestDefinition, TestRecord, TestStep, TextEncoding,
    };
    pub use crate::report::{Report, ReportOptions, StepGraph};
}

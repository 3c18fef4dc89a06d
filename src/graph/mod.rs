//! # Graph Payload Module
//!
//! Decodes the compact graph payload the GLP2 tester embeds in each test-step
//! row of its data export. A payload carries a multi-axis time series:
//!
//! ```text
//! |#GR#|<label\units\color\min\max\format|label\units\...>v0|v1\v0|v1\}
//!        └──────────── axis definitions ─────────────┘└─ samples ──┘
//! ```
//!
//! Axis definitions and values stay raw strings at this layer; numeric
//! coercion happens only when a caller projects a column with
//! [`SampleMatrix::axis_values`].
//!
//! ## Usage
//!
//! ```rust
//! use glp2report::graph;
//!
//! let graph = graph::parse("|#GR#|<t\\s\\k\\0\\1\\f|v\\V\\k\\0\\1\\f>0|10\\1|20\\}")?;
//! assert_eq!(graph.axis_label(1), "v");
//! assert_eq!(graph.axis_values(1)?, vec![10.0, 20.0]);
//! # Ok::<(), glp2report::graph::ParseError>(())
//! ```

mod error;
mod grammar;
mod matrix;


pub use error::ParseError;
pub use grammar::{
    parse, GraphGrammar, AXIS_CLOSE, AXIS_FIELD_SEPARATOR, AXIS_OPEN, AXIS_SEPARATOR, END_OF_DATA,
    SAMPLE_SEPARATOR, SAMPLE_VALUE_SEPARATOR, START_OF_GRAPH,
};
pub use matrix::{axis_values, AxisDefinition, GraphData, Sample, SampleMatrix};

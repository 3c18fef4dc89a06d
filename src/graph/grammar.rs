use log::trace;

use super::{AxisDefinition, GraphData, ParseError, Sample, SampleMatrix};

/// Start-of-graph sentinel written by the GLP2 tester
pub const START_OF_GRAPH: &str = "|#GR#|";
/// Opens the axis-definition section
pub const AXIS_OPEN: char = '<';
/// Closes the axis-definition section
pub const AXIS_CLOSE: char = '>';
/// Separates one axis definition from the next
pub const AXIS_SEPARATOR: char = '|';
/// Separates the fields of one axis definition
pub const AXIS_FIELD_SEPARATOR: char = '\\';
/// Separates per-axis values within one sample
pub const SAMPLE_VALUE_SEPARATOR: char = '|';
/// Terminates every sample, including the last
pub const SAMPLE_SEPARATOR: char = '\\';
/// Marks the end of the sample section
pub const END_OF_DATA: char = '}';

/// Token set of the graph payload format.
///
/// The axis and sample sections reuse the same separator characters; they are
/// told apart by the absolute positions of the section markers, never by a
/// scan over the whole payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphGrammar {
    /// Sentinel that must precede the axis section
    pub start_of_graph: String,
    /// Axis section open marker
    pub axis_open: char,
    /// Axis section close marker
    pub axis_close: char,
    /// Separator between axis definitions
    pub axis_separator: char,
    /// Separator between the fields of one axis definition
    pub axis_field_separator: char,
    /// Separator between values of one sample
    pub sample_value_separator: char,
    /// Terminator after each sample
    pub sample_separator: char,
    /// End-of-data marker
    pub end_of_data: char,
}

impl Default for GraphGrammar {
    fn default() -> Self {
        Self {
            start_of_graph: START_OF_GRAPH.to_string(),
            axis_open: AXIS_OPEN,
            axis_close: AXIS_CLOSE,
            axis_separator: AXIS_SEPARATOR,
            axis_field_separator: AXIS_FIELD_SEPARATOR,
            sample_value_separator: SAMPLE_VALUE_SEPARATOR,
            sample_separator: SAMPLE_SEPARATOR,
            end_of_data: END_OF_DATA,
        }
    }
}

/// Byte offsets of the four section markers, validated for ordering
#[derive(Debug, Clone, Copy)]
struct MarkerPositions {
    axis_open: usize,
    axis_close: usize,
    end_of_data: usize,
}

impl GraphGrammar {
    fn locate(&self, raw: &str) -> Result<MarkerPositions, ParseError> {
        let start = raw
            .find(self.start_of_graph.as_str())
            .ok_or_else(|| ParseError::malformed("start-of-graph marker not found"))?;
        let axis_open = raw
            .find(self.axis_open)
            .ok_or_else(|| ParseError::malformed("axis-open marker not found"))?;
        let axis_close = raw
            .find(self.axis_close)
            .ok_or_else(|| ParseError::malformed("axis-close marker not found"))?;
        let end_of_data = raw
            .find(self.end_of_data)
            .ok_or_else(|| ParseError::malformed("end-of-data marker not found"))?;

        if start >= axis_open {
            return Err(ParseError::malformed(
                "start-of-graph marker does not precede the axis section",
            ));
        }
        if axis_open >= axis_close {
            return Err(ParseError::malformed(
                "axis-open marker does not precede axis-close marker",
            ));
        }
        if axis_close >= end_of_data {
            return Err(ParseError::malformed(
                "axis-close marker does not precede end-of-data marker",
            ));
        }
        if end_of_data >= raw.len() {
            return Err(ParseError::malformed("end-of-data marker past end of payload"));
        }

        Ok(MarkerPositions {
            axis_open,
            axis_close,
            end_of_data,
        })
    }

    /// Decode one payload into axis definitions and samples.
    ///
    /// The last element of the sample split is always dropped: the tester
    /// terminates every sample, so that element is the empty remainder after
    /// the final separator.
    pub fn parse(&self, raw: &str) -> Result<GraphData, ParseError> {
        let pos = self.locate(raw)?;

        let axis_section = &raw[pos.axis_open + self.axis_open.len_utf8()..pos.axis_close];
        let axes: Vec<AxisDefinition> = axis_section
            .split(self.axis_separator)
            .map(|dfn| AxisDefinition::new(dfn.split(self.axis_field_separator)))
            .collect();

        let data_section = &raw[pos.axis_close + self.axis_close.len_utf8()..pos.end_of_data];
        let mut rows: Vec<&str> = data_section.split(self.sample_separator).collect();
        rows.pop();
        let samples: Vec<Sample> = rows
            .into_iter()
            .map(|row| Sample::new(row.split(self.sample_value_separator)))
            .collect();

        trace!("Parsed graph payload: {} axes, {} samples", axes.len(), samples.len());

        Ok(GraphData {
            axes,
            samples: SampleMatrix::new(samples),
        })
    }

    /// Write axis definitions and samples in this grammar.
    ///
    /// `parse(encode(g)) == g` holds as long as no field or value contains a
    /// token character and every definition and sample has at least one entry.
    pub fn encode(&self, graph: &GraphData) -> String {
        let axis_sep = self.axis_separator.to_string();
        let field_sep = self.axis_field_separator.to_string();
        let value_sep = self.sample_value_separator.to_string();

        let axes = graph
            .axes
            .iter()
            .map(|axis| axis.fields().join(&field_sep))
            .collect::<Vec<_>>()
            .join(&axis_sep);

        let mut out = String::new();
        out.push_str(&self.start_of_graph);
        out.push(self.axis_open);
        out.push_str(&axes);
        out.push(self.axis_close);
        for sample in graph.samples.iter() {
            out.push_str(&sample.values().join(&value_sep));
            out.push(self.sample_separator);
        }
        out.push(self.end_of_data);
        out
    }
}

/// Decode one payload using the GLP2 token set
pub fn parse(raw: &str) -> Result<GraphData, ParseError> {
    GraphGrammar::default().parse(raw)
}

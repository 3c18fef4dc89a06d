use serde::{Deserialize, Serialize};

use super::ParseError;

/// Field positions inside an axis definition
mod field {
    pub const LABEL: usize = 0;
    pub const UNITS: usize = 1;
    pub const COLOR_HINT: usize = 2;
    pub const MIN_VALUE: usize = 3;
    pub const MAX_VALUE: usize = 4;
    pub const FORMAT_HINT: usize = 5;
}

/// One axis definition, kept as the raw fields the split produced.
///
/// Nominally the fields are `label, units, color hint, min, max, format hint`,
/// but any count is accepted; the accessors return `None` for absent fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AxisDefinition {
    fields: Vec<String>,
}

impl AxisDefinition {
    /// Build a definition from raw field strings
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// All raw fields in source order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Number of fields present
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the definition has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// Axis label
    pub fn label(&self) -> Option<&str> {
        self.field(field::LABEL)
    }

    /// Axis units
    pub fn units(&self) -> Option<&str> {
        self.field(field::UNITS)
    }

    /// Plot color hint
    pub fn color_hint(&self) -> Option<&str> {
        self.field(field::COLOR_HINT)
    }

    /// Lower plot bound, unparsed
    pub fn min_value(&self) -> Option<&str> {
        self.field(field::MIN_VALUE)
    }

    /// Upper plot bound, unparsed
    pub fn max_value(&self) -> Option<&str> {
        self.field(field::MAX_VALUE)
    }

    /// Value format hint
    pub fn format_hint(&self) -> Option<&str> {
        self.field(field::FORMAT_HINT)
    }
}

/// One row of per-axis raw values, in axis order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sample {
    values: Vec<String>,
}

impl Sample {
    /// Build a sample from raw value strings
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Raw values in axis order
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Value for one axis
    pub fn get(&self, axis: usize) -> Option<&str> {
        self.values.get(axis).map(String::as_str)
    }

    /// Number of values in the sample
    pub fn width(&self) -> usize {
        self.values.len()
    }
}

/// Samples in the chronological order they appeared in the payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleMatrix {
    samples: Vec<Sample>,
}

impl SampleMatrix {
    /// Build a matrix from samples
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    /// All samples
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if the payload carried no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterate samples in order; the matrix can be iterated any number of times
    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// Width of the widest sample
    pub fn max_width(&self) -> usize {
        self.samples.iter().map(Sample::width).max().unwrap_or(0)
    }

    /// Project one axis column as raw strings.
    ///
    /// Fails with [`ParseError::AxisOutOfRange`] if any sample lacks the column.
    pub fn column(&self, axis: usize) -> Result<Vec<&str>, ParseError> {
        self.samples
            .iter()
            .enumerate()
            .map(|(i, sample)| {
                sample.get(axis).ok_or_else(|| ParseError::AxisOutOfRange {
                    index: axis,
                    sample: i,
                    width: sample.width(),
                })
            })
            .collect()
    }

    /// Project one axis column and parse every value as `f64`.
    ///
    /// The range check covers every sample before any value is parsed, so an
    /// out-of-range index is reported even if an earlier value is not numeric.
    pub fn axis_values(&self, axis: usize) -> Result<Vec<f64>, ParseError> {
        let column = self.column(axis)?;
        column
            .into_iter()
            .enumerate()
            .map(|(i, raw)| {
                raw.trim()
                    .parse::<f64>()
                    .map_err(|_| ParseError::NumericFormat {
                        axis,
                        sample: i,
                        value: raw.to_string(),
                    })
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a SampleMatrix {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Project one axis column of `matrix` as floating-point values
pub fn axis_values(matrix: &SampleMatrix, axis: usize) -> Result<Vec<f64>, ParseError> {
    matrix.axis_values(axis)
}

/// A decoded payload: axis definitions plus their samples
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphData {
    /// Axis definitions; the Nth definition describes the Nth value of each sample
    pub axes: Vec<AxisDefinition>,
    /// Sample rows
    pub samples: SampleMatrix,
}

impl GraphData {
    /// Split into the `(axes, samples)` pair
    pub fn into_parts(self) -> (Vec<AxisDefinition>, SampleMatrix) {
        (self.axes, self.samples)
    }

    /// Label of axis `index`, or an empty string
    pub fn axis_label(&self, index: usize) -> &str {
        self.axes.get(index).and_then(AxisDefinition::label).unwrap_or("")
    }

    /// Units of axis `index`, or an empty string
    pub fn axis_units(&self, index: usize) -> &str {
        self.axes.get(index).and_then(AxisDefinition::units).unwrap_or("")
    }

    /// Shorthand for `self.samples.axis_values(index)`
    pub fn axis_values(&self, index: usize) -> Result<Vec<f64>, ParseError> {
        self.samples.axis_values(index)
    }
}

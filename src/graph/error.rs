/// Errors that can occur while decoding a graph payload or projecting its columns
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A structural marker is missing or the markers are out of order
    #[error("Malformed graph payload: {reason}")]
    MalformedPayload {
        /// Which marker or ordering check failed
        reason: String,
    },

    /// A requested axis column is wider than at least one sample
    #[error("Axis {index} out of range: sample {sample} has only {width} values")]
    AxisOutOfRange {
        /// Requested axis index
        index: usize,
        /// Index of the first sample that is too narrow
        sample: usize,
        /// Width of that sample
        width: usize,
    },

    /// A value in the requested axis column is not a floating-point number
    #[error("Axis {axis}, sample {sample}: '{value}' is not a number")]
    NumericFormat {
        /// Axis index
        axis: usize,
        /// Sample index
        sample: usize,
        /// The offending raw value
        value: String,
    },
}

impl ParseError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        ParseError::MalformedPayload {
            reason: reason.into(),
        }
    }

    /// True for errors that mean the payload carries no usable graph at all
    pub fn is_malformed(&self) -> bool {
        matches!(self, ParseError::MalformedPayload { .. })
    }
}

/// Errors that can occur while loading tester exports and test definitions
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// I/O error reading a file
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error decoding a semicolon-delimited data file
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// File content is not valid in its detected text encoding
    #[error("Text encoding error: {0}")]
    EncodingError(String),

    /// Invalid file layout
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

//! # Test Records Module
//!
//! Models for test runs exported by the tester ([`TestRecord`]) and the test
//! programs they were executed from ([`TestDefinition`]), plus loaders for
//! both file kinds:
//!
//! 1. **Data exports** (`*.csv`): semicolon-delimited, one row per executed
//!    step, rows grouped into runs by their run id.
//! 2. **Test definitions** (`*.TPR`): INI-style files with a `[General Data]`
//!    section and one `[TestStepN]` section per step.
//!
//! The tester writes both as UTF-16; [`decode_text_with`] handles UTF-8 and
//! UTF-16 by byte-order mark and falls back to a [`TextEncoding`] without one.

mod data_file;
mod definition;
mod definition_file;
mod error;
mod record;
mod text;


pub use data_file::{load_data_file, parse_data_export, ColumnMap, DataFileOptions};
pub use definition::{DefinitionStep, TestDefinition};
pub use definition_file::{load_definition_file, load_definition_file_with, parse_definition};
pub use error::LoadError;
pub use record::{TestRecord, TestStep};
pub use text::{decode_text, decode_text_with, parse_decimal, TextEncoding};

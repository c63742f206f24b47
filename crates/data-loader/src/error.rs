//! Error types for the data-loader crate.
//!
//! Numeric cells never show up here: a malformed number is coerced to 0
//! during parsing. Only structural problems (missing files, unreadable CSV,
//! absent required columns) are surfaced.

use thiserror::Error;

/// Errors that can occur while loading the fitness tables
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV reader rejected a record (ragged row, bad quoting, invalid UTF-8)
    #[error("CSV error in {file}: {source}")]
    CsvError {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// A column the table cannot do without is absent from the header row
    #[error("Missing required column '{column}' in {file}")]
    MissingColumn { file: String, column: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;

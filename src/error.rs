//! Module for the error management
use thiserror::Error;

/// An error that can occur while assembling or querying a snapshot.
///
/// Row-level problems (unknown category color, a reference to a trip that was
/// filtered out, a malformed transfer row) never surface here: the loaders
/// skip such rows and log a warning. This enum covers what aborts a loader
/// call, plus [Error::ReferenceError] which signals a broken pipeline
/// precondition discovered at query time.
#[derive(Error, Debug)]
pub enum Error {
    /// Impossible to open or read an input file
    #[error("impossible to read '{file_name}'")]
    NamedFileIO {
        /// The file name that could not be read
        file_name: String,
        /// The initial error that caused the unability to read the file
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Impossible to parse a CSV file
    #[error("impossible to read csv file '{file_name}'")]
    Csv {
        /// File name that could not be parsed as CSV
        file_name: String,
        /// The initial error by the csv library
        #[source]
        source: csv::Error,
    },
    /// The time is not given in the HH:MM:SS format (hours may exceed 24)
    #[error("'{0}' is not a valid time; HH:MM:SS format is expected.")]
    InvalidTime(String),
    /// The date could not be parsed as year, month and day separated by a single delimiter
    #[error("'{0}' is not a valid date; Y-M-D format is expected.")]
    InvalidDate(String),
    /// The line category color does not map to any bus category
    #[error("'{0}' is not a known line category color")]
    UnknownCategory(String),
    /// A record has fewer fields than the table's schema demands, in a table
    /// where skipping the record would not preserve correctness
    #[error("{file_name}: record on line {line} has {got} fields, expected at least {expected}")]
    MissingFields {
        /// File name of the offending table
        file_name: String,
        /// Line of the offending record
        line: u64,
        /// Number of fields the schema demands
        expected: usize,
        /// Number of fields actually present
        got: usize,
    },
    /// A required field could not be parsed (stations: coordinates are
    /// mandatory, so this is fatal for the whole load)
    #[error("{file_name}: could not parse field '{value}' on line {line}")]
    InvalidField {
        /// File name of the offending table
        file_name: String,
        /// Line of the offending record
        line: u64,
        /// The field value that could not be parsed
        value: String,
    },
    /// A query or cross-reference found an id that an earlier pipeline stage
    /// was supposed to have registered
    #[error("the id {0} is not known")]
    ReferenceError(String),
    /// Transfers were loaded before stop events were attached and pruned
    #[error("stop events must be attached before transfers are loaded")]
    AttachmentIncomplete,
}

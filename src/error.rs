//! Error types for dataset loading and aggregation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a dataset or computing its statistics.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A required column is absent from the header row.
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// The dataset has no records, so minimums and argmaxes are undefined.
    #[error("dataset contains no records")]
    EmptyDataset,

    /// A percentage or mean was requested over zero records.
    #[error("{0} is undefined: denominator is zero")]
    DivisionUndefined(String),

    /// No record carries the requested value in the given column.
    #[error("no records with {column} == {value:?}")]
    NoMatchingRecords { column: String, value: String },

    /// The file could not be parsed as delimited tabular data.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The file could not be opened.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<csv::Error> for AnalysisError {
    fn from(err: csv::Error) -> Self {
        let message = match err.position() {
            Some(pos) => format!("line {}: {}", pos.line(), err),
            None => err.to_string(),
        };
        AnalysisError::MalformedInput(message)
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AnalysisError::MissingColumn("race".to_string()).to_string(),
            "missing required column: race"
        );
        assert_eq!(
            AnalysisError::DivisionUndefined("average age of men".to_string()).to_string(),
            "average age of men is undefined: denominator is zero"
        );
        assert_eq!(
            AnalysisError::NoMatchingRecords {
                column: "native-country".to_string(),
                value: "India".to_string(),
            }
            .to_string(),
            "no records with native-country == \"India\""
        );
    }
}

//! Errors raised while reading queries or writing results.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the tabular input and output files.
#[derive(Debug, Error)]
pub enum TableError {
    /// The input file could not be opened.
    #[error("cannot open input file {path}: {source}\n  Suggestion: check that the file exists and is readable")]
    Open {
        /// Offending path.
        path: PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// A row in the input file could not be parsed.
    #[error("cannot read row {row} of {path}: {source}")]
    Read {
        /// Offending path.
        path: PathBuf,
        /// 1-based row number, header included.
        row: u64,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// The input file has no columns at all.
    #[error("input file {path} has no columns\n  Suggestion: put one query per row in a column named \"A\" or in the first column")]
    NoColumns {
        /// Offending path.
        path: PathBuf,
    },

    /// The output file could not be written.
    #[error("cannot write output file {path}: {source}\n  Suggestion: check that the output directory exists and is writable")]
    Write {
        /// Offending path.
        path: PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },
}

impl TableError {
    /// Creates an open error.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    /// Creates a read error for `row`.
    #[must_use]
    pub fn read(path: impl Into<PathBuf>, row: u64, source: csv::Error) -> Self {
        Self::Read {
            path: path.into(),
            row,
            source,
        }
    }

    /// Creates a no-columns error.
    #[must_use]
    pub fn no_columns(path: impl Into<PathBuf>) -> Self {
        Self::NoColumns { path: path.into() }
    }

    /// Creates a write error.
    #[must_use]
    pub fn write(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_columns_message_has_suggestion() {
        let err = TableError::no_columns("/tmp/empty.csv");
        let message = err.to_string();
        assert!(message.contains("/tmp/empty.csv"));
        assert!(message.contains("Suggestion:"));
    }

    #[test]
    fn test_open_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = TableError::open("/tmp/missing.csv", csv::Error::from(io));
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("cannot open input file"));
    }
}

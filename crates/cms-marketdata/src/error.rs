//! Errors raised while loading or querying market data.

use std::path::PathBuf;

use thiserror::Error;

/// Market data failure.
#[derive(Debug, Error)]
pub enum MarketDataError {
    /// A table file could not be opened.
    #[error("cannot open {}: {source}", path.display())]
    Io {
        /// Offending file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A table is not valid CSV or a row does not match its columns.
    #[error("malformed {table} table: {source}")]
    Csv {
        /// Which table.
        table: &'static str,
        /// Underlying parse error.
        #[source]
        source: csv::Error,
    },

    /// An expiry or tenor label is not of the form `5Y` / `6M`.
    #[error("invalid tenor label '{0}'")]
    InvalidLabel(String),

    /// The same key appears twice in one table.
    #[error("duplicate {table} quote for {key}")]
    DuplicateQuote {
        /// Which table.
        table: &'static str,
        /// The repeated key.
        key: String,
    },

    /// No row for the requested key.
    #[error("no {table} quote for {key}")]
    MissingQuote {
        /// Which table.
        table: &'static str,
        /// The requested key.
        key: String,
    },

    /// The quotes were found but do not form a valid snapshot.
    #[error(transparent)]
    Invalid(#[from] cms_core::Error),
}

/// Shorthand result type.
pub type Result<T, E = MarketDataError> = std::result::Result<T, E>;

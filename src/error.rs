//! Error types for loading sources and resolving reports.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal startup errors: the process refuses to serve reports after one of these.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The records file could not be parsed as CSV.
    #[error("failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The boundary file is not a GeoJSON feature collection.
    #[error("failed to parse GeoJSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The source file has no usable rows or features.
    #[error("{path} contains no rows")]
    Empty { path: PathBuf },

    /// Every feature in the boundary file was malformed.
    #[error("all {skipped} features in {path} are malformed")]
    AllFeaturesMalformed { path: PathBuf, skipped: usize },
}

/// Errors raised by the aggregator for a request the table cannot answer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error("column '{column}' not found in table")]
    UnknownColumn { column: String },

    /// Time bucketing was asked for on a column other than the death date.
    #[error("column '{column}' cannot be bucketed by month")]
    BucketOnNonDate { column: String },
}

/// The presentation layer asked for a report id the registry does not know.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("report '{id}' not found")]
pub struct UnknownReportError {
    pub id: String,
}

/// Errors from running a registered report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Unknown(#[from] UnknownReportError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

/// Errors writing exported report files.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to serialize {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for load operations.
pub type Result<T> = std::result::Result<T, LoadError>;

//! Error types for the track ratio pipeline.

use std::{io, num::ParseFloatError, path::PathBuf};

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, TrackError>;

/// Every failure is fatal; the variant only decides the message and exit code.
#[derive(Error, Debug)]
pub enum TrackError {
    /// Input file missing or unreadable
    #[error("error opening {}", .path.display())]
    OpenInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Output file could not be created
    #[error("can't create {}", .path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed tab-separated record
    #[error("error while reading file")]
    Record {
        #[source]
        source: csv::Error,
    },

    /// A quote inside an unquoted field, or a quoted field not closed cleanly
    #[error("malformed quoting at line {line}, column {column}")]
    MalformedQuote { line: u64, column: usize },

    /// A cell the pipeline must read as text is not UTF-8
    #[error("invalid UTF-8 at line {line} in track '{track}'")]
    InvalidUtf8 { line: u64, track: String },

    /// Data row width differs from the header row
    #[error("row at line {line} has {found} columns, header has {expected}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// A valid track holds a value that is not a float
    #[error("error while casting {value} to float in track '{track}'")]
    InvalidNumber {
        track: String,
        value: String,
        #[source]
        source: ParseFloatError,
    },

    /// A value overflows f64
    #[error("error while casting {value} to float in track '{track}': value out of range")]
    NumberOutOfRange { track: String, value: String },

    /// A valid track has no data rows to take min/max over
    #[error("track '{track}' has no values")]
    EmptyTrack { track: String },

    /// A sorted track has fewer values than the widest valid track
    #[error("track '{track}' has {len} values, {needed} rows must be written")]
    ShortTrack {
        track: String,
        len: usize,
        needed: usize,
    },

    /// Failure while emitting output rows
    #[error("can't write to {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Config file missing or unreadable
    #[error("error opening config {}", .path.display())]
    OpenConfig {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Config file is not a valid output policy
    #[error("invalid config {}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl TrackError {
    /// Process exit status for this failure. Usage errors (2) come from clap.
    pub fn exit_code(&self) -> u8 {
        match self {
            TrackError::OpenInput { .. } | TrackError::CreateOutput { .. } => 3,
            TrackError::Record { .. }
            | TrackError::MalformedQuote { .. }
            | TrackError::InvalidUtf8 { .. }
            | TrackError::RaggedRow { .. }
            | TrackError::InvalidNumber { .. }
            | TrackError::NumberOutOfRange { .. }
            | TrackError::EmptyTrack { .. } => 4,
            TrackError::ShortTrack { .. } | TrackError::Write { .. } => 5,
            TrackError::OpenConfig { .. } | TrackError::Config { .. } => 6,
        }
    }
}

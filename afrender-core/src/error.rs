//! Error types for afrender-core.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while opening or reading the input table.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The table file could not be opened.
    #[error("cannot open input table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The table is not well-formed delimited text (ragged rows, bad UTF-8, ...).
    #[error("malformed input table {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The header row does not name the requested identifier column.
    #[error("input table {path} has no column '{column}' (found: {available})")]
    MissingColumn {
        path: PathBuf,
        column: String,
        available: String,
    },
}

/// Failures while loading or validating a [`crate::RunConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error, with the file path for context.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A required setting has no value from flags, file or environment.
    #[error("missing required setting `{0}`; pass it as a flag or set it in the config file")]
    Missing(&'static str),

    #[error("url template '{0}' does not contain the {{uid}} placeholder")]
    UrlTemplate(String),

    /// Delimiter and comment marker must each be a single ASCII byte.
    #[error("{field} must be a single ASCII character, got '{value}'")]
    NotAscii { field: &'static str, value: char },
}

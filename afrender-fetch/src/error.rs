//! Error types for afrender-fetch.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while fetching one structure.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Identifier contains characters that are unsafe in a URL or file name.
    #[error("identifier '{id}' contains characters outside [A-Za-z0-9._-]")]
    InvalidIdentifier { id: String },

    /// Server answered with a non-success status.
    #[error("GET {url} for '{id}' returned HTTP {code}")]
    Status { id: String, url: String, code: u16 },

    /// DNS, TLS, connection or protocol failure.
    #[error("GET {url} for '{id}' failed: {message}")]
    Transport { id: String, url: String, message: String },

    /// Writing the body to disk failed; the file may be truncated.
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> FetchError {
    FetchError::Io {
        path: path.into(),
        source,
    }
}

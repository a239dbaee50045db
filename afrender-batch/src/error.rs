//! Error types for afrender-batch.

use std::path::PathBuf;

use thiserror::Error;

use afrender_core::{Identifier, LoadError};
use afrender_fetch::FetchError;
use afrender_invoke::RenderError;
use afrender_template::TemplateError;

use crate::state::Stage;

/// A component failure while processing one record.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// [`RecordError`] tagged with the identifier and the stage that failed.
/// Never aborts the batch.
#[derive(Debug, Error)]
#[error("{id}: {stage} failed: {source}")]
pub struct PerRecordError {
    pub id: Identifier,
    pub stage: Stage,
    #[source]
    pub source: RecordError,
}

/// Errors that stop the whole run.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The input table could not be loaded.
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    /// Directive formats did not compile.
    #[error("template setup error: {0}")]
    Template(#[from] TemplateError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Run report (de)serialization error.
    #[error("run report JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience constructor for [`BatchError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> BatchError {
    BatchError::Io {
        path: path.into(),
        source,
    }
}

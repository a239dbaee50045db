//! Error types for afrender-template.

use std::path::PathBuf;

use afrender_core::SlotKind;
use thiserror::Error;

/// All errors that can arise while instantiating a control file.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Filesystem error reading the template or writing the control file.
    #[error("template io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A fixed slot index points past the end of the template.
    #[error("template {path} has {lines} lines but the slot layout needs at least {required}")]
    TooShort {
        path: PathBuf,
        lines: usize,
        required: usize,
    },

    #[error("template {path} has no line containing the {slot} marker '{marker}'")]
    MarkerNotFound {
        path: PathBuf,
        slot: SlotKind,
        marker: String,
    },

    /// Two slots resolved to the same template line.
    #[error("template {path}: {first} and {second} slots both resolve to line {line}")]
    SlotCollision {
        path: PathBuf,
        line: usize,
        first: SlotKind,
        second: SlotKind,
    },

    /// Tera error compiling or rendering a directive.
    #[error("directive template error: {0}")]
    Directive(#[from] tera::Error),

    #[error("{slot} directive must render to a single line, got {rendered:?}")]
    MultiLineDirective { slot: SlotKind, rendered: String },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> TemplateError {
    TemplateError::Io {
        path: path.into(),
        source,
    }
}

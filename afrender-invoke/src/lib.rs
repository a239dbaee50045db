//! # afrender-invoke
//!
//! Runs the external renderer (PyMOL in batch mode by default) on a control
//! file and captures its combined output in a log file.

mod command;
mod error;

use std::path::Path;

pub use command::{log_tail, CommandRenderer, LOG_TAIL_LINES};
pub use error::RenderError;

/// Capability to render one control file.
pub trait RendererInvoker {
    /// Blocks until the renderer exits. Success means exit code zero.
    fn render(&self, control_file: &Path, log_file: &Path) -> Result<(), RenderError>;
}

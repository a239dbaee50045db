use std::path::PathBuf;

use thiserror::Error;

/// Error surface for launching and waiting on the renderer.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot create renderer log {path}: {source}")]
    Log {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Program missing, not executable, etc.
    #[error("failed to launch renderer {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("waiting on renderer {program} failed: {source}")]
    Wait {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Renderer ran and exited non-zero (or was killed by a signal).
    #[error("renderer {program} exited with {status} (log: {log}){}", tail_suffix(.tail))]
    Failed {
        program: PathBuf,
        status: String,
        code: Option<i32>,
        log: PathBuf,
        tail: String,
    },
}

fn tail_suffix(tail: &str) -> String {
    if tail.is_empty() {
        String::new()
    } else {
        format!("\n{tail}")
    }
}

//! Subprocess-backed [`RendererInvoker`].

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::RenderError;
use crate::RendererInvoker;

/// Lines of log output quoted in [`RenderError::Failed`].
pub const LOG_TAIL_LINES: usize = 5;

/// Launches `program args... <control_file>` directly, without a shell.
///
/// stdin is closed; stdout and stderr both go to the log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRenderer {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandRenderer {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// PyMOL command-line mode: `pymol -c <control_file>`.
    pub fn pymol(program: impl Into<PathBuf>) -> Self {
        Self::new(program, vec!["-c".to_string()])
    }

    fn command(&self, control_file: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args.iter().map(String::as_str))
            .arg(control_file)
            .stdin(Stdio::null());
        cmd
    }
}

impl RendererInvoker for CommandRenderer {
    fn render(&self, control_file: &Path, log_file: &Path) -> Result<(), RenderError> {
        let log_err = |source: std::io::Error| RenderError::Log {
            path: log_file.to_path_buf(),
            source,
        };
        let stdout = File::create(log_file).map_err(log_err)?;
        let stderr = stdout.try_clone().map_err(log_err)?;

        tracing::debug!(
            program = %self.program.display(),
            control = %control_file.display(),
            "launching renderer"
        );
        let mut child = self
            .command(control_file)
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .spawn()
            .map_err(|source| RenderError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let status = child.wait().map_err(|source| RenderError::Wait {
            program: self.program.clone(),
            source,
        })?;

        if status.success() {
            return Ok(());
        }

        Err(RenderError::Failed {
            program: self.program.clone(),
            status: status.to_string(),
            code: status.code(),
            log: log_file.to_path_buf(),
            tail: log_tail(log_file, LOG_TAIL_LINES),
        })
    }
}

/// Last `lines` lines of `path`, joined; empty if unreadable.
pub fn log_tail(path: &Path, lines: usize) -> String {
    let Ok(file) = File::open(path) else {
        return String::new();
    };
    let mut tail = VecDeque::<String>::with_capacity(lines);
    for line in BufReader::new(file).lines().map_while(Result::ok) {
        if tail.len() == lines {
            tail.pop_front();
        }
        tail.push_back(line);
    }
    Vec::from(tail).join("\n")
}

//! Per-record state machine.
//!
//! ```text
//! Pending ──fetch──▶ Fetched ──instantiate──▶ Instantiated ──render──▶ Rendered ──▶ Done
//!    │                  │                          │
//!    └──────────────────┴──────────────────────────┴──▶ Failed(stage)
//! ```

use std::fmt;

/// The component step that moves a record out of a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Fetch,
    Instantiate,
    Render,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Fetch => write!(f, "fetch"),
            Stage::Instantiate => write!(f, "instantiate"),
            Stage::Render => write!(f, "render"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    Pending,
    Fetched,
    Instantiated,
    Rendered,
    Done,
    Failed(Stage),
}

impl RecordState {
    /// Stage attempted next from this state, if any.
    pub fn next_stage(self) -> Option<Stage> {
        match self {
            RecordState::Pending => Some(Stage::Fetch),
            RecordState::Fetched => Some(Stage::Instantiate),
            RecordState::Instantiated => Some(Stage::Render),
            RecordState::Rendered | RecordState::Done | RecordState::Failed(_) => None,
        }
    }

    /// State after `stage` succeeded.
    pub fn advance(self) -> RecordState {
        match self {
            RecordState::Pending => RecordState::Fetched,
            RecordState::Fetched => RecordState::Instantiated,
            RecordState::Instantiated => RecordState::Rendered,
            RecordState::Rendered => RecordState::Done,
            terminal => terminal,
        }
    }

    /// State after the pending stage failed.
    pub fn fail(self) -> RecordState {
        match self.next_stage() {
            Some(stage) => RecordState::Failed(stage),
            None => self,
        }
    }
}

impl fmt::Display for RecordState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordState::Pending => write!(f, "pending"),
            RecordState::Fetched => write!(f, "fetched"),
            RecordState::Instantiated => write!(f, "instantiated"),
            RecordState::Rendered => write!(f, "rendered"),
            RecordState::Done => write!(f, "done"),
            RecordState::Failed(stage) => write!(f, "failed ({stage})"),
        }
    }
}

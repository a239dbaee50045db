//! The batch driver.
//!
//! Records are processed one at a time, start to finish. Any component
//! failure marks that record [`RecordState::Failed`] and the loop moves on;
//! only setup problems (see [`crate::pipeline`]) are fatal.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use afrender_core::{ArtifactLayout, ArtifactSet, Identifier, Record};
use afrender_fetch::StructureFetcher;
use afrender_invoke::RendererInvoker;
use afrender_template::{SlotValues, TemplateInstantiator};

use crate::error::{io_err, BatchError, PerRecordError, RecordError};
use crate::state::{RecordState, Stage};

// ---------------------------------------------------------------------------
// Seams
// ---------------------------------------------------------------------------

/// Waits between records.
pub trait Pacer {
    fn pause(&self, delay: Duration);
}

/// [`Pacer`] backed by `std::thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleep;

impl Pacer for ThreadSleep {
    fn pause(&self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

/// Progress callbacks, invoked on the driver thread.
pub trait ProgressObserver {
    fn on_start(&mut self, _record: &Record, _total: usize) {}
    fn on_finish(&mut self, _outcome: &RecordOutcome, _done: usize, _total: usize) {}
    /// Called exactly once, after the last record.
    fn on_complete(&mut self, _summary: &BatchSummary) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// What happened to one record.
#[derive(Debug)]
pub struct RecordOutcome {
    pub index: usize,
    pub id: Identifier,
    pub state: RecordState,
    pub error: Option<PerRecordError>,
    pub artifacts: ArtifactSet,
    pub structure_bytes: Option<u64>,
    /// Whether the renderer log is on disk once the record finished.
    pub log_retained: bool,
    pub elapsed: Duration,
}

impl RecordOutcome {
    pub fn succeeded(&self) -> bool {
        self.state == RecordState::Done
    }
}

/// Result of a whole batch. Per-record failures live in `outcomes`.
#[derive(Debug)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub outcomes: Vec<RecordOutcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchSummary {
    pub fn failures(&self) -> impl Iterator<Item = &RecordOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

/// Settings the driver needs besides its components.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub output_dir: PathBuf,
    pub template: PathBuf,
    pub artifacts: ArtifactLayout,
    pub delay: Duration,
    pub cleanup_log: bool,
}

/// Sequences the components over a list of records.
pub struct Batch<'a> {
    options: BatchOptions,
    fetcher: &'a dyn StructureFetcher,
    instantiator: &'a TemplateInstantiator,
    renderer: &'a dyn RendererInvoker,
    pacer: &'a dyn Pacer,
}

impl<'a> Batch<'a> {
    pub fn new(
        options: BatchOptions,
        fetcher: &'a dyn StructureFetcher,
        instantiator: &'a TemplateInstantiator,
        renderer: &'a dyn RendererInvoker,
    ) -> Self {
        Self {
            options,
            fetcher,
            instantiator,
            renderer,
            pacer: &ThreadSleep,
        }
    }

    pub fn with_pacer(mut self, pacer: &'a dyn Pacer) -> Self {
        self.pacer = pacer;
        self
    }

    /// Create the output directory. Failure is fatal for the run.
    pub fn prepare(&self) -> Result<(), BatchError> {
        let dir = &self.options.output_dir;
        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))
    }

    /// Process every record in order. Never fails because of a record.
    pub fn run(&self, records: &[Record], observer: &mut dyn ProgressObserver) -> BatchSummary {
        let started_at = Utc::now();
        let total = records.len();
        let mut outcomes = Vec::with_capacity(total);

        for (position, record) in records.iter().enumerate() {
            observer.on_start(record, total);
            let outcome = self.process(record, total);
            observer.on_finish(&outcome, position + 1, total);
            outcomes.push(outcome);

            if position + 1 < total && !self.options.delay.is_zero() {
                self.pacer.pause(self.options.delay);
            }
        }

        let succeeded = outcomes.iter().filter(|o| o.succeeded()).count();
        let summary = BatchSummary {
            total,
            succeeded,
            failed: total - succeeded,
            outcomes,
            started_at,
            finished_at: Utc::now(),
        };
        tracing::info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "batch complete"
        );
        observer.on_complete(&summary);
        summary
    }

    /// Drive one record to `Done` or `Failed`.
    pub fn process(&self, record: &Record, total: usize) -> RecordOutcome {
        let started = Instant::now();
        let id = &record.id;
        let artifacts =
            ArtifactSet::with_layout(&self.options.output_dir, id, &self.options.artifacts);
        tracing::info!(index = record.index, total, %id, "processing record");

        let mut state = RecordState::Pending;
        let mut structure_bytes = None;
        let mut error = None;

        while let Some(stage) = state.next_stage() {
            let result = match stage {
                Stage::Fetch => self
                    .fetcher
                    .fetch(id, &artifacts.structure)
                    .map(|bytes| structure_bytes = Some(bytes))
                    .map_err(RecordError::from),
                Stage::Instantiate => self.instantiate(&artifacts).map_err(RecordError::from),
                Stage::Render => self
                    .renderer
                    .render(&artifacts.control, &artifacts.log)
                    .map_err(RecordError::from),
            };
            match result {
                Ok(()) => {
                    let next = state.advance();
                    tracing::debug!(%id, from = %state, to = %next, "record advanced");
                    state = next;
                }
                Err(source) => {
                    let err = PerRecordError {
                        id: id.clone(),
                        stage,
                        source,
                    };
                    tracing::error!(%id, %stage, error = %err.source, "record failed");
                    state = state.fail();
                    error = Some(err);
                }
            }
        }

        if state == RecordState::Rendered {
            if self.options.cleanup_log {
                remove_log(id, &artifacts.log);
            }
            state = state.advance();
            tracing::info!(%id, elapsed_ms = started.elapsed().as_millis() as u64, "record done");
        }

        RecordOutcome {
            index: record.index,
            id: id.clone(),
            state,
            error,
            structure_bytes,
            log_retained: artifacts.log.exists(),
            artifacts,
            elapsed: started.elapsed(),
        }
    }

    fn instantiate(&self, artifacts: &ArtifactSet) -> Result<(), afrender_template::TemplateError> {
        let values = SlotValues {
            structure: &artifacts.structure,
            image: &artifacts.image,
            session: &artifacts.session,
        };
        self.instantiator
            .instantiate(&self.options.template, &values, &artifacts.control)
    }
}

/// Best-effort log deletion; a failure is only a warning.
fn remove_log(id: &Identifier, log: &Path) {
    if let Err(err) = std::fs::remove_file(log) {
        tracing::warn!(%id, path = %log.display(), error = %err, "could not delete renderer log");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

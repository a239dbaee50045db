//! # afrender-batch
//!
//! Sequential per-record driver: fetch → instantiate → render → cleanup,
//! with failures isolated to the record that caused them.
//!
//! Call [`pipeline::run`] with a validated configuration to process a whole
//! input table, or build a [`Batch`] directly around custom components.

pub mod driver;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod state;

pub use driver::{
    Batch, BatchOptions, BatchSummary, NoProgress, Pacer, ProgressObserver, RecordOutcome,
    ThreadSleep,
};
pub use error::{BatchError, PerRecordError, RecordError};
pub use report::{RunReport, REPORT_FILE};
pub use state::{RecordState, Stage};

//! afrender core library: domain types, run configuration, record source, errors.
//!
//! - [`types`]: identifiers, records, artifact paths and template slot layout
//! - [`config`]: [`RunConfig`] loading, merging and validation
//! - [`records`]: [`RecordSource`] over a delimited input table
//! - [`error`]: [`LoadError`] and [`ConfigError`]

pub mod config;
pub mod error;
pub mod records;
pub mod types;

pub use config::{DirectiveFormats, RendererConfig, ResolvedConfig, RunConfig};
pub use error::{ConfigError, LoadError};
pub use records::{load_records, RecordSource, TableOptions};
pub use types::{
    ArtifactLayout, ArtifactSet, Identifier, Record, SlotKind, SlotLayout, SlotLocator,
};

//! Shared batch entrypoint used by the CLI.
//!
//! Order of fatal checks: input table, directive formats, output directory.
//! After those pass, nothing short of the report write can fail the run.

use std::path::PathBuf;

use afrender_core::{load_records, ResolvedConfig};
use afrender_fetch::{HttpFetcher, StructureFetcher, UrlTemplate};
use afrender_invoke::{CommandRenderer, RendererInvoker};
use afrender_template::TemplateInstantiator;

use crate::driver::{Batch, BatchOptions, BatchSummary, Pacer, ProgressObserver, ThreadSleep};
use crate::error::BatchError;
use crate::report::{self, RunReport};

/// Everything a finished run produced.
#[derive(Debug)]
pub struct PipelineResult {
    pub summary: BatchSummary,
    pub report: RunReport,
    pub report_path: PathBuf,
}

/// Run the whole table with the HTTP fetcher and the configured renderer.
pub fn run(
    config: &ResolvedConfig,
    observer: &mut dyn ProgressObserver,
) -> Result<PipelineResult, BatchError> {
    let fetcher = HttpFetcher::new(UrlTemplate::new(config.url_template.clone()), config.timeout);
    let renderer = CommandRenderer::new(config.renderer_program.clone(), config.renderer_args.clone());
    run_with(config, &fetcher, &renderer, &ThreadSleep, observer)
}

/// [`run`] with caller-supplied components.
pub fn run_with(
    config: &ResolvedConfig,
    fetcher: &dyn StructureFetcher,
    renderer: &dyn RendererInvoker,
    pacer: &dyn Pacer,
    observer: &mut dyn ProgressObserver,
) -> Result<PipelineResult, BatchError> {
    let records = load_records(&config.input, &config.table)?;
    tracing::info!(
        records = records.len(),
        input = %config.input.display(),
        "input table loaded"
    );

    let instantiator = TemplateInstantiator::new(config.slots.clone(), &config.directives)?;
    let options = BatchOptions {
        output_dir: config.output_dir.clone(),
        template: config.template.clone(),
        artifacts: config.artifacts.clone(),
        delay: config.delay,
        cleanup_log: config.cleanup_log,
    };
    let batch = Batch::new(options, fetcher, &instantiator, renderer).with_pacer(pacer);
    batch.prepare()?;

    let summary = batch.run(&records, observer);
    let report = RunReport::from_summary(&summary);
    let report_path = report::save_at(&config.output_dir, &report)?;

    Ok(PipelineResult {
        summary,
        report,
        report_path,
    })
}

//! `afrender run`: fetch, instantiate and render every table row.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use afrender_batch::{pipeline, report::RunReport};
use afrender_core::config::RENDERER_ENV;
use afrender_core::RunConfig;

use super::ConfigFileArg;
use crate::progress::BarObserver;

/// Arguments for `afrender run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigFileArg,

    /// Input table with one identifier per row.
    #[arg(long = "csv", value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Header of the identifier column [default: uid].
    #[arg(long, visible_alias = "uid_column", value_name = "NAME")]
    pub uid_column: Option<String>,

    /// Field delimiter of the input table [default: tab].
    #[arg(long, value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Directory receiving structures, control files, images, sessions and logs.
    #[arg(long, visible_alias = "output_dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Control-script template whose slot lines are rewritten per record.
    #[arg(long, visible_alias = "pml-template", value_name = "PATH")]
    pub template: Option<PathBuf>,

    /// Renderer executable (falls back to $AFRENDER_RENDERER).
    #[arg(long, value_name = "PROGRAM")]
    pub renderer: Option<PathBuf>,

    /// Renderer argument placed before the control file; repeatable [default: -c].
    #[arg(long = "renderer-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub renderer_args: Vec<String>,

    /// Download URL containing `{uid}`.
    #[arg(long, value_name = "URL")]
    pub url_template: Option<String>,

    /// Pause between records in milliseconds [default: 1000].
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// HTTP timeout per download, in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Delete each renderer log after a successful record.
    #[arg(long)]
    pub cleanup_log: bool,

    /// Print the run report as JSON instead of the summary table.
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    pub fn run(self) -> Result<()> {
        let json = self.json;
        let config = self
            .into_config()?
            .validate()
            .context("incomplete configuration")?;

        let mut observer = BarObserver::new(json);
        let result = pipeline::run(&config, &mut observer).context("batch aborted")?;

        if json {
            println!(
                "{}",
                serde_json::to_string_pretty(&result.report)
                    .context("failed to render run report JSON")?
            );
        } else {
            print_failures(&result.report);
            println!("  report: {}", result.report_path.display());
        }
        Ok(())
    }

    /// Merge flags over the config file, then the environment.
    fn into_config(self) -> Result<RunConfig> {
        let mut config = self.config.load()?;
        if let Some(v) = self.input {
            config.input = Some(v);
        }
        if let Some(v) = self.uid_column {
            config.uid_column = v;
        }
        if let Some(v) = self.delimiter {
            config.delimiter = v;
        }
        if let Some(v) = self.output_dir {
            config.output_dir = Some(v);
        }
        if let Some(v) = self.template {
            config.template = Some(v);
        }
        if let Some(v) = self.renderer {
            config.renderer.program = Some(v);
        }
        if !self.renderer_args.is_empty() {
            config.renderer.args = self.renderer_args;
        }
        if let Some(v) = self.url_template {
            config.url_template = v;
        }
        if let Some(v) = self.delay_ms {
            config.delay_ms = v;
        }
        if let Some(v) = self.timeout_secs {
            config.timeout_secs = Some(v);
        }
        if self.cleanup_log {
            config.cleanup_log = true;
        }
        config.fill_renderer_from_env(std::env::var_os(RENDERER_ENV));
        Ok(config)
    }
}

#[derive(Tabled)]
struct FailureRow {
    #[tabled(rename = "row")]
    index: usize,
    #[tabled(rename = "uid")]
    id: String,
    #[tabled(rename = "stage")]
    stage: String,
    #[tabled(rename = "error")]
    error: String,
}

fn print_failures(report: &RunReport) {
    let rows: Vec<FailureRow> = report
        .records
        .iter()
        .filter(|r| r.failed_stage.is_some())
        .map(|r| FailureRow {
            index: r.index,
            id: r.id.clone(),
            stage: r.failed_stage.clone().unwrap_or_default(),
            error: first_line(r.error.as_deref().unwrap_or("")),
        })
        .collect();
    if rows.is_empty() {
        return;
    }

    println!("{}", format!("{} record(s) failed:", rows.len()).red());
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

fn first_line(message: &str) -> String {
    message.lines().next().unwrap_or("").to_string()
}

pub mod check_template;
pub mod paths;
pub mod run;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use afrender_core::RunConfig;

/// Optional YAML config file shared by every subcommand.
#[derive(Args, Debug, Default)]
pub struct ConfigFileArg {
    /// YAML config file; flags override its values.
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl ConfigFileArg {
    /// Load the file if given, otherwise start from defaults.
    pub fn load(&self) -> Result<RunConfig> {
        match &self.config {
            Some(path) => RunConfig::load(path)
                .with_context(|| format!("failed to load config '{}'", path.display())),
            None => Ok(RunConfig::default()),
        }
    }
}

//! `afrender paths <uid>`: show where a record's files go.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use afrender_core::{ArtifactSet, Identifier};

use super::ConfigFileArg;

#[derive(Args, Debug)]
pub struct PathsArgs {
    pub uid: String,

    #[command(flatten)]
    pub config: ConfigFileArg,

    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

impl PathsArgs {
    pub fn run(self) -> Result<()> {
        let config = self.config.load()?;
        let output_dir = self
            .output_dir
            .or(config.output_dir)
            .context("no output directory; pass --output-dir or set `output_dir` in the config file")?;

        let set = ArtifactSet::with_layout(&output_dir, &Identifier::from(self.uid), &config.artifacts);
        let labels = ["structure", "control", "image", "session", "log"];
        for (label, path) in labels.iter().zip(set.all_paths()) {
            println!("{label:<10} {}", path.display());
        }
        Ok(())
    }
}

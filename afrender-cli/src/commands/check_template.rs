//! `afrender check-template`: preview a control file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use afrender_core::{ArtifactSet, Identifier};
use afrender_template::{SlotValues, TemplateInstantiator};

use super::ConfigFileArg;

/// Render the template for one identifier and print it; writes nothing.
#[derive(Args, Debug)]
pub struct CheckTemplateArgs {
    #[command(flatten)]
    pub config: ConfigFileArg,

    /// Template to check (overrides the config file).
    #[arg(long, visible_alias = "pml-template", value_name = "PATH")]
    pub template: Option<PathBuf>,

    /// Identifier used to build the preview paths.
    #[arg(long, default_value = "P12345")]
    pub uid: String,

    /// Output directory used to build the preview paths.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

impl CheckTemplateArgs {
    pub fn run(self) -> Result<()> {
        let config = self.config.load()?;
        let template = self
            .template
            .or(config.template)
            .context("no template given; pass --template or set `template` in the config file")?;
        let output_dir = self
            .output_dir
            .or(config.output_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        let set = ArtifactSet::with_layout(&output_dir, &Identifier::from(self.uid), &config.artifacts);
        let instantiator = TemplateInstantiator::new(config.slots, &config.directives)
            .context("invalid directive formats")?;
        let values = SlotValues {
            structure: &set.structure,
            image: &set.image,
            session: &set.session,
        };
        let rendered = instantiator
            .render(&template, &values)
            .with_context(|| format!("template '{}' cannot be instantiated", template.display()))?;

        print!("{rendered}");
        Ok(())
    }
}

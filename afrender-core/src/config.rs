//! Run configuration.
//!
//! Settings come from three layers, highest priority first: command-line
//! flags, an optional YAML file, and (for the renderer program only) the
//! `AFRENDER_RENDERER` environment variable. There are no built-in paths:
//! [`RunConfig::validate`] fails on any required setting left unset.
//!
//! ```yaml
//! input: proteins.tsv
//! uid_column: uid
//! output_dir: figures
//! template: pymol_script.pml
//! renderer:
//!   program: /opt/pymol/bin/pymol
//!   args: ["-c"]
//! slots:
//!   load: {line: 3}
//!   image: {marker: "@IMAGE@"}
//! delay_ms: 1000
//! cleanup_log: true
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::records::TableOptions;
use crate::types::{ArtifactLayout, SlotLayout};

/// Environment variable consulted when no renderer program is configured.
pub const RENDERER_ENV: &str = "AFRENDER_RENDERER";

/// AlphaFold DB model download URL; `{uid}` is replaced per record.
pub const DEFAULT_URL_TEMPLATE: &str = "https://alphafold.ebi.ac.uk/files/AF-{uid}-F1-model_v4.pdb";

pub const UID_PLACEHOLDER: &str = "{uid}";

/// External renderer launch settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RendererConfig {
    pub program: Option<PathBuf>,
    /// Arguments placed before the control file, e.g. PyMOL's `-c`.
    pub args: Vec<String>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            program: None,
            args: vec!["-c".to_string()],
        }
    }
}

/// One-line directive templates written into the slots.
///
/// Each is a tera template receiving `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirectiveFormats {
    pub load: String,
    pub image: String,
    pub session: String,
}

impl Default for DirectiveFormats {
    fn default() -> Self {
        Self {
            load: "load {{ path }}".to_string(),
            image: "png {{ path }}".to_string(),
            session: "save {{ path }}".to_string(),
        }
    }
}

/// Raw, possibly incomplete configuration as read from file and flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub input: Option<PathBuf>,
    pub uid_column: String,
    pub delimiter: char,
    pub comment: Option<char>,
    pub output_dir: Option<PathBuf>,
    pub template: Option<PathBuf>,
    pub renderer: RendererConfig,
    pub url_template: String,
    pub slots: SlotLayout,
    pub directives: DirectiveFormats,
    pub artifacts: ArtifactLayout,
    /// Pause between records, in milliseconds.
    pub delay_ms: u64,
    pub timeout_secs: Option<u64>,
    pub cleanup_log: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: None,
            uid_column: "uid".to_string(),
            delimiter: '\t',
            comment: Some('#'),
            output_dir: None,
            template: None,
            renderer: RendererConfig::default(),
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            slots: SlotLayout::default(),
            directives: DirectiveFormats::default(),
            artifacts: ArtifactLayout::default(),
            delay_ms: 1000,
            timeout_secs: None,
            cleanup_log: false,
        }
    }
}

/// Fully specified configuration; every required path is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub input: PathBuf,
    pub table: TableOptions,
    pub output_dir: PathBuf,
    pub template: PathBuf,
    pub renderer_program: PathBuf,
    pub renderer_args: Vec<String>,
    pub url_template: String,
    pub slots: SlotLayout,
    pub directives: DirectiveFormats,
    pub artifacts: ArtifactLayout,
    pub delay: Duration,
    pub timeout: Option<Duration>,
    pub cleanup_log: bool,
}

impl RunConfig {
    /// Read a YAML config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Fill the renderer program from `env` when nothing else set it.
    pub fn fill_renderer_from_env(&mut self, env: Option<OsString>) {
        if self.renderer.program.is_none() {
            self.renderer.program = env.filter(|v| !v.is_empty()).map(PathBuf::from);
        }
    }

    /// Check required settings and convert to a [`ResolvedConfig`].
    pub fn validate(self) -> Result<ResolvedConfig, ConfigError> {
        let input = self.input.ok_or(ConfigError::Missing("input"))?;
        let output_dir = self.output_dir.ok_or(ConfigError::Missing("output_dir"))?;
        let template = self.template.ok_or(ConfigError::Missing("template"))?;
        let renderer_program = self
            .renderer
            .program
            .ok_or(ConfigError::Missing("renderer.program"))?;

        if !self.url_template.contains(UID_PLACEHOLDER) {
            return Err(ConfigError::UrlTemplate(self.url_template));
        }
        if self.uid_column.trim().is_empty() {
            return Err(ConfigError::Missing("uid_column"));
        }

        let delimiter = ascii_byte("delimiter", self.delimiter)?;
        let comment = self
            .comment
            .map(|c| ascii_byte("comment", c))
            .transpose()?;

        Ok(ResolvedConfig {
            input,
            table: TableOptions {
                column: self.uid_column,
                delimiter,
                comment,
            },
            output_dir,
            template,
            renderer_program,
            renderer_args: self.renderer.args,
            url_template: self.url_template,
            slots: self.slots,
            directives: self.directives,
            artifacts: self.artifacts,
            delay: Duration::from_millis(self.delay_ms),
            timeout: self.timeout_secs.map(Duration::from_secs),
            cleanup_log: self.cleanup_log,
        })
    }
}

fn ascii_byte(field: &'static str, value: char) -> Result<u8, ConfigError> {
    if value.is_ascii() {
        Ok(value as u8)
    } else {
        Err(ConfigError::NotAscii { field, value })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SlotLocator;

    fn complete() -> RunConfig {
        RunConfig {
            input: Some(PathBuf::from("in.tsv")),
            output_dir: Some(PathBuf::from("out")),
            template: Some(PathBuf::from("t.pml")),
            renderer: RendererConfig {
                program: Some(PathBuf::from("pymol")),
                args: vec!["-c".to_string()],
            },
            ..RunConfig::default()
        }
    }

    #[test]
    fn complete_config_validates() {
        let resolved = complete().validate().expect("valid");
        assert_eq!(resolved.table.delimiter, b'\t');
        assert_eq!(resolved.table.comment, Some(b'#'));
        assert_eq!(resolved.table.column, "uid");
        assert_eq!(resolved.delay, Duration::from_secs(1));
        assert!(resolved.timeout.is_none());
    }

    #[test]
    fn missing_template_is_reported_by_name() {
        let mut cfg = complete();
        cfg.template = None;
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Missing("template")));
    }

    #[test]
    fn missing_renderer_is_reported() {
        let mut cfg = complete();
        cfg.renderer.program = None;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("renderer.program"));
    }

    #[test]
    fn url_template_needs_placeholder() {
        let mut cfg = complete();
        cfg.url_template = "https://example.org/static.pdb".to_string();
        assert!(matches!(cfg.validate(), Err(ConfigError::UrlTemplate(_))));
    }

    #[test]
    fn non_ascii_delimiter_rejected() {
        let mut cfg = complete();
        cfg.delimiter = '§';
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NotAscii { field: "delimiter", .. })
        ));
    }

    #[test]
    fn env_fills_only_unset_renderer() {
        let mut cfg = RunConfig::default();
        cfg.fill_renderer_from_env(Some(OsString::from("/usr/bin/pymol")));
        assert_eq!(cfg.renderer.program, Some(PathBuf::from("/usr/bin/pymol")));

        cfg.fill_renderer_from_env(Some(OsString::from("/other")));
        assert_eq!(cfg.renderer.program, Some(PathBuf::from("/usr/bin/pymol")));

        let mut empty = RunConfig::default();
        empty.fill_renderer_from_env(Some(OsString::new()));
        assert!(empty.renderer.program.is_none());
    }

    #[test]
    fn yaml_file_merges_with_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("afrender.yaml");
        std::fs::write(
            &path,
            "input: a.tsv\noutput_dir: out\ndelay_ms: 0\nslots:\n  load: {marker: \"@LOAD@\"}\n",
        )
        .unwrap();

        let cfg = RunConfig::load(&path).expect("load");
        assert_eq!(cfg.input, Some(PathBuf::from("a.tsv")));
        assert_eq!(cfg.delay_ms, 0);
        assert_eq!(cfg.uid_column, "uid");
        assert_eq!(cfg.slots.load, SlotLocator::Marker("@LOAD@".to_string()));
        assert_eq!(cfg.slots.session, SlotLocator::Line(19));
    }

    #[test]
    fn unknown_keys_are_parse_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "inptu: typo.tsv\n").unwrap();
        assert!(matches!(RunConfig::load(&path), Err(ConfigError::Parse { .. })));
    }
}

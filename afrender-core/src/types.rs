//! Domain types shared by every afrender crate.
//!
//! All path fields use `PathBuf`; identifiers are wrapped in [`Identifier`]
//! so they are never confused with file names.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Opaque token naming one remote structure (a UniProt accession in practice).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Identifier {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// One data row of the input table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 0-based position among data rows (header and comment lines excluded).
    pub index: usize,
    pub id: Identifier,
}

// ---------------------------------------------------------------------------
// Artifact paths
// ---------------------------------------------------------------------------

/// File extensions used to derive an [`ArtifactSet`].
///
/// The image has no extension: the rendering tool appends its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArtifactLayout {
    pub structure_ext: String,
    pub control_ext: String,
    pub session_ext: String,
    pub log_ext: String,
}

impl Default for ArtifactLayout {
    fn default() -> Self {
        Self {
            structure_ext: "pdb".to_string(),
            control_ext: "pml".to_string(),
            session_ext: "pse".to_string(),
            log_ext: "log".to_string(),
        }
    }
}

/// Every output path belonging to one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactSet {
    pub structure: PathBuf,
    pub control: PathBuf,
    pub image: PathBuf,
    pub session: PathBuf,
    pub log: PathBuf,
}

impl ArtifactSet {
    /// Default layout: `<id>.pdb`, `<id>.pml`, `<id>`, `<id>.pse`, `<id>.log`.
    pub fn for_identifier(output_dir: &Path, id: &Identifier) -> Self {
        Self::with_layout(output_dir, id, &ArtifactLayout::default())
    }

    /// Pure path construction, no I/O.
    pub fn with_layout(output_dir: &Path, id: &Identifier, layout: &ArtifactLayout) -> Self {
        let file = |ext: &str| output_dir.join(format!("{}.{ext}", id.0));
        Self {
            structure: file(&layout.structure_ext),
            control: file(&layout.control_ext),
            image: output_dir.join(&id.0),
            session: file(&layout.session_ext),
            log: file(&layout.log_ext),
        }
    }

    /// The five paths in fixed order: structure, control, image, session, log.
    pub fn all_paths(&self) -> [&Path; 5] {
        [
            &self.structure,
            &self.control,
            &self.image,
            &self.session,
            &self.log,
        ]
    }
}

// ---------------------------------------------------------------------------
// Template slots
// ---------------------------------------------------------------------------

/// The three directives rewritten in every control file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Load,
    Image,
    Session,
}

impl SlotKind {
    pub fn all() -> &'static [SlotKind] {
        &[SlotKind::Load, SlotKind::Image, SlotKind::Session]
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKind::Load => write!(f, "load"),
            SlotKind::Image => write!(f, "image"),
            SlotKind::Session => write!(f, "session"),
        }
    }
}

/// Where a slot lives inside the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotLocator {
    /// Fixed 0-based line index.
    Line(usize),
    /// First line containing this token.
    Marker(String),
}

/// Named slot → locator mapping.
///
/// Defaults reproduce the stock PyMOL template: lines 4, 19 and 20.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlotLayout {
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub load: SlotLocator,
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub image: SlotLocator,
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub session: SlotLocator,
}

impl Default for SlotLayout {
    fn default() -> Self {
        Self {
            load: SlotLocator::Line(3),
            image: SlotLocator::Line(18),
            session: SlotLocator::Line(19),
        }
    }
}

impl SlotLayout {
    pub fn locator(&self, kind: SlotKind) -> &SlotLocator {
        match kind {
            SlotKind::Load => &self.load,
            SlotKind::Image => &self.image,
            SlotKind::Session => &self.session,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

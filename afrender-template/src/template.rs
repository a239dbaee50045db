//! Template loading, slot resolution and control-file writing.
//!
//! Untouched lines keep their exact bytes (including `\r\n` endings);
//! replaced lines always end in `\n`. Output is therefore a pure function
//! of the template bytes and the slot values.

use std::path::{Path, PathBuf};

use afrender_core::{DirectiveFormats, SlotKind, SlotLayout, SlotLocator};

use crate::directives::Directives;
use crate::error::{io_err, TemplateError};

/// Paths substituted into the three slots for one record.
#[derive(Debug, Clone, Copy)]
pub struct SlotValues<'a> {
    pub structure: &'a Path,
    /// Extensionless; the renderer adds its own.
    pub image: &'a Path,
    pub session: &'a Path,
}

impl SlotValues<'_> {
    fn get(&self, kind: SlotKind) -> &Path {
        match kind {
            SlotKind::Load => self.structure,
            SlotKind::Image => self.image,
            SlotKind::Session => self.session,
        }
    }
}

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

/// An ordered list of template lines, terminators included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    path: PathBuf,
    lines: Vec<String>,
}

impl Template {
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let text = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        Ok(Self::from_text(path, &text))
    }

    /// `origin` is only used in error messages.
    pub fn from_text(origin: &Path, text: &str) -> Self {
        Self {
            path: origin.to_path_buf(),
            lines: text.split_inclusive('\n').map(str::to_owned).collect(),
        }
    }

    /// Map each slot to the 0-based line it replaces.
    pub fn resolve(&self, layout: &SlotLayout) -> Result<Vec<(SlotKind, usize)>, TemplateError> {
        let required = SlotKind::all()
            .iter()
            .filter_map(|kind| match layout.locator(*kind) {
                SlotLocator::Line(index) => Some(index + 1),
                SlotLocator::Marker(_) => None,
            })
            .max()
            .unwrap_or(0);
        if self.lines.len() < required {
            return Err(TemplateError::TooShort {
                path: self.path.clone(),
                lines: self.lines.len(),
                required,
            });
        }

        let mut resolved: Vec<(SlotKind, usize)> = Vec::with_capacity(3);
        for kind in SlotKind::all() {
            let line = match layout.locator(*kind) {
                SlotLocator::Line(index) => *index,
                SlotLocator::Marker(marker) => self
                    .lines
                    .iter()
                    .position(|l| l.contains(marker.as_str()))
                    .ok_or_else(|| TemplateError::MarkerNotFound {
                        path: self.path.clone(),
                        slot: *kind,
                        marker: marker.clone(),
                    })?,
            };
            if let Some((first, _)) = resolved.iter().find(|(_, l)| *l == line) {
                return Err(TemplateError::SlotCollision {
                    path: self.path.clone(),
                    line,
                    first: *first,
                    second: *kind,
                });
            }
            resolved.push((*kind, line));
        }
        Ok(resolved)
    }

    /// Render the control-file text for one record.
    pub fn render(
        &self,
        layout: &SlotLayout,
        directives: &Directives,
        values: &SlotValues<'_>,
    ) -> Result<String, TemplateError> {
        let mut lines = self.lines.clone();
        for (kind, line) in self.resolve(layout)? {
            let mut directive = directives.render(kind, values.get(kind))?;
            directive.push('\n');
            lines[line] = directive;
        }
        Ok(lines.concat())
    }
}

// ---------------------------------------------------------------------------
// TemplateInstantiator
// ---------------------------------------------------------------------------

/// Re-reads the template on every call so each record sees the file as it is
/// on disk; directive formats are compiled once.
pub struct TemplateInstantiator {
    layout: SlotLayout,
    directives: Directives,
}

impl TemplateInstantiator {
    pub fn new(layout: SlotLayout, formats: &DirectiveFormats) -> Result<Self, TemplateError> {
        Ok(Self {
            layout,
            directives: Directives::new(formats)?,
        })
    }

    /// Render without writing anything.
    pub fn render(&self, template: &Path, values: &SlotValues<'_>) -> Result<String, TemplateError> {
        Template::load(template)?.render(&self.layout, &self.directives, values)
    }

    /// Render `template` and write the result to `dest`, replacing it.
    pub fn instantiate(
        &self,
        template: &Path,
        values: &SlotValues<'_>,
        dest: &Path,
    ) -> Result<(), TemplateError> {
        let content = self.render(template, values)?;
        write_atomic(dest, &content)
    }
}

/// Write to `<dest>.afrender.tmp` then rename over `dest`.
fn write_atomic(dest: &Path, content: &str) -> Result<(), TemplateError> {
    let tmp = PathBuf::from(format!("{}.afrender.tmp", dest.display()));
    write_atomic_with_tmp(dest, content, &tmp)
}

fn write_atomic_with_tmp(dest: &Path, content: &str, tmp: &Path) -> Result<(), TemplateError> {
    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;
    if let Err(e) = std::fs::rename(tmp, dest) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(dest, e));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

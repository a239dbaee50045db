//! Tera-compiled one-line directives, one per slot.

use std::path::Path;

use tera::{Context, Tera};

use afrender_core::{DirectiveFormats, SlotKind};

use crate::error::TemplateError;

fn template_name(kind: SlotKind) -> &'static str {
    match kind {
        SlotKind::Load => "load",
        SlotKind::Image => "image",
        SlotKind::Session => "session",
    }
}

/// Compiled directive formats. Build once, render per record.
pub struct Directives {
    tera: Tera,
}

impl Directives {
    pub fn new(formats: &DirectiveFormats) -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (template_name(SlotKind::Load), formats.load.as_str()),
            (template_name(SlotKind::Image), formats.image.as_str()),
            (template_name(SlotKind::Session), formats.session.as_str()),
        ])?;
        Ok(Self { tera })
    }

    /// Render the `kind` directive for `path`, without a line terminator.
    pub fn render(&self, kind: SlotKind, path: &Path) -> Result<String, TemplateError> {
        let mut ctx = Context::new();
        ctx.insert("path", &path.display().to_string());
        let rendered = self.tera.render(template_name(kind), &ctx)?;
        let line = rendered.trim_end_matches(['\r', '\n']);
        if line.contains('\n') {
            return Err(TemplateError::MultiLineDirective {
                slot: kind,
                rendered: rendered.clone(),
            });
        }
        Ok(line.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directives_are_pymol_commands() {
        let d = Directives::new(&DirectiveFormats::default()).unwrap();
        assert_eq!(
            d.render(SlotKind::Load, Path::new("/o/P1.pdb")).unwrap(),
            "load /o/P1.pdb"
        );
        assert_eq!(d.render(SlotKind::Image, Path::new("/o/P1")).unwrap(), "png /o/P1");
        assert_eq!(
            d.render(SlotKind::Session, Path::new("/o/P1.pse")).unwrap(),
            "save /o/P1.pse"
        );
    }

    #[test]
    fn custom_formats_support_other_renderers() {
        let formats = DirectiveFormats {
            load: "open {{ path }}".to_string(),
            image: "save {{ path }}.png supersample 3".to_string(),
            session: "save {{ path }} format session".to_string(),
        };
        let d = Directives::new(&formats).unwrap();
        assert_eq!(
            d.render(SlotKind::Image, Path::new("img/X")).unwrap(),
            "save img/X.png supersample 3"
        );
    }

    #[test]
    fn paths_are_not_html_escaped() {
        let d = Directives::new(&DirectiveFormats::default()).unwrap();
        assert_eq!(
            d.render(SlotKind::Load, Path::new("a&b/<x>.pdb")).unwrap(),
            "load a&b/<x>.pdb"
        );
    }

    #[test]
    fn multi_line_directive_is_rejected() {
        let formats = DirectiveFormats {
            load: "load {{ path }}\nhide everything".to_string(),
            ..DirectiveFormats::default()
        };
        let d = Directives::new(&formats).unwrap();
        assert!(matches!(
            d.render(SlotKind::Load, Path::new("p")),
            Err(TemplateError::MultiLineDirective { slot: SlotKind::Load, .. })
        ));
    }

    #[test]
    fn bad_tera_syntax_fails_at_build() {
        let formats = DirectiveFormats {
            session: "save {{ path".to_string(),
            ..DirectiveFormats::default()
        };
        assert!(matches!(
            Directives::new(&formats),
            Err(TemplateError::Directive(_))
        ));
    }
}

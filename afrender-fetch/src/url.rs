//! URL construction from a `{uid}` template.

use afrender_core::config::{DEFAULT_URL_TEMPLATE, UID_PLACEHOLDER};
use afrender_core::Identifier;

use crate::error::FetchError;

/// A download URL with a `{uid}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate(String);

impl UrlTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substitute `id` into every placeholder.
    pub fn expand(&self, id: &Identifier) -> Result<String, FetchError> {
        check_identifier(id)?;
        Ok(self.0.replace(UID_PLACEHOLDER, id.as_str()))
    }
}

impl Default for UrlTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_URL_TEMPLATE)
    }
}

/// Identifiers end up in both a URL path and a file name.
pub fn check_identifier(id: &Identifier) -> Result<(), FetchError> {
    let ok = !id.as_str().is_empty()
        && id
            .as_str()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if ok && id.as_str() != "." && id.as_str() != ".." {
        Ok(())
    } else {
        Err(FetchError::InvalidIdentifier {
            id: id.to_string(),
        })
    }
}

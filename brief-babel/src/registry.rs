//! Lookup of formats by name or file extension.

use crate::error::FormatError;
use crate::format::Format;
use crate::ir::nodes::Document;
use std::path::Path;

/// The formats a conversion can start from or end in.
///
/// Lookups accept a format's name or any of its extensions, so `md` and `markdown`
/// address the same format.
pub struct FormatRegistry {
    formats: Vec<Box<dyn Format>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        FormatRegistry {
            formats: Vec::new(),
        }
    }

    /// The HTML and Markdown formats used by the article pipeline.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(crate::formats::html::HtmlFormat);
        registry.register(crate::formats::markdown::MarkdownFormat);
        registry
    }

    /// Add `format`, replacing one registered under the same name.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats.retain(|known| known.name() != format.name());
        self.formats.push(Box::new(format));
    }

    fn lookup(&self, key: &str) -> Option<&dyn Format> {
        let key = key.to_ascii_lowercase();
        self.formats
            .iter()
            .find(|format| format.name() == key)
            .or_else(|| {
                self.formats
                    .iter()
                    .find(|format| format.file_extensions().contains(&key.as_str()))
            })
            .map(|format| format.as_ref())
    }

    pub fn get(&self, key: &str) -> Result<&dyn Format, FormatError> {
        self.lookup(key)
            .ok_or_else(|| FormatError::FormatNotFound(key.to_string()))
    }

    pub fn has(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Registered names in alphabetical order.
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .formats
            .iter()
            .map(|format| format.name().to_string())
            .collect();
        names.sort();
        names
    }

    /// Name of the format owning the extension of `filename`, if any.
    pub fn detect_format_from_filename(&self, filename: &str) -> Option<String> {
        let extension = Path::new(filename).extension()?.to_str()?;
        let extension = extension.to_ascii_lowercase();
        self.formats
            .iter()
            .find(|format| format.file_extensions().contains(&extension.as_str()))
            .map(|format| format.name().to_string())
    }

    pub fn parse(&self, source: &str, format: &str) -> Result<Document, FormatError> {
        self.get(format)?.parse(source)
    }

    pub fn serialize(&self, doc: &Document, format: &str) -> Result<String, FormatError> {
        self.get(format)?.serialize(doc)
    }

    pub fn convert(&self, source: &str, from: &str, to: &str) -> Result<String, FormatError> {
        let target = self.get(to)?;
        let doc = self.parse(source, from)?;
        tracing::trace!(from, to = target.name(), blocks = doc.children.len(), "converting");
        target.serialize(&doc)
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

//! The seam between the registry and a concrete format.
//!
//! Article content only moves between HTML and Markdown, and both directions are always
//! needed, so a format must parse and serialize.

use crate::error::FormatError;
use crate::ir::nodes::Document;

pub trait Format: Send + Sync {
    /// Registry key, also accepted on the command line.
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Extensions without the dot. The first one is the preferred extension.
    fn file_extensions(&self) -> &[&str];

    fn parse(&self, source: &str) -> Result<Document, FormatError>;

    fn serialize(&self, doc: &Document) -> Result<String, FormatError>;
}

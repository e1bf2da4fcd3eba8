//! Markdown format implementation
//!
//! This module implements bidirectional conversion between the IR and CommonMark Markdown
//! with the GFM strikethrough, autolink and task list extensions.
//!
//! # Library Choice
//!
//! We use the `comrak` crate for Markdown parsing and serialization. This choice is based on:
//! - Single crate for both parsing and serialization
//! - CommonMark compliance, so escaping on export is handled for us
//! - Supports the GFM extensions the blog content relies on
//!
//! # Element Mapping Table
//!
//! | IR Element       | Markdown Equivalent     | Export Notes                   | Import Notes                       |
//! |------------------|-------------------------|--------------------------------|------------------------------------|
//! | Heading          | `#` … `######`          | ATX only, breaks become spaces | Setext accepted                    |
//! | Paragraph        | Paragraph               | Alignment dropped              | Soft breaks become spaces          |
//! | List (bullet)    | `- item`                | Always `-`, tight              | Any bullet marker                  |
//! | List (ordered)   | `1. item`               | Numbering restarts at 1        | Start number dropped               |
//! | List (task)      | `- [x] item`            |                                | GFM task list items                |
//! | Blockquote       | `> quote`               |                                |                                    |
//! | Verbatim         | Fenced code (```` ``` ````) | Always fenced, language → info | Indented blocks accepted       |
//! | Image            | `![alt](src "title")`   | Own paragraph                  | Lone image paragraph → block image |
//! | InlineContent:   |                         |                                |                                    |
//! |   Bold           | `**bold**`              | Edge spaces moved outside      | `__bold__` accepted                |
//! |   Italic         | `*italic*`              | Edge spaces moved outside      | `_italic_` accepted                |
//! |   Strikethrough  | `~~strike~~`            | Literal `~` in text escaped    |                                    |
//! |   Underline      | (none)                  | Text kept, mark dropped        |                                    |
//! |   Code           | `` `code` ``            |                                |                                    |
//! |   Link           | `[text](href "title")`  | Text equal to href stays bare  | Bare URLs autolinked               |
//! |   HardBreak      | backslash line break    |                                | Two trailing spaces accepted       |
//!
//! # Lossy Conversions
//!
//! - Underline and alignment have no Markdown form
//! - Raw HTML, thematic breaks and tables are not part of the article vocabulary and are dropped
//! - Ordered list start numbers are not preserved
//! - Touching runs of the same mark are merged, and a line break inside a heading becomes a space

pub mod parser;
pub mod serializer;
mod tidy;

use crate::error::FormatError;
use crate::format::Format;
use crate::ir::nodes::Document;

/// Format implementation for Markdown
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "CommonMark Markdown with GFM extensions"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        parser::parse_from_markdown(source)
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        serializer::serialize_to_markdown(doc)
    }
}

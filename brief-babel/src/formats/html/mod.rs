//! HTML format implementation
//!
//! This module implements bidirectional conversion between the IR and the HTML fragments
//! produced and consumed by the article editor.
//!
//! # Library Choice
//!
//! We use the `html5ever` + `markup5ever_rcdom` ecosystem for HTML parsing and serialization:
//! - `html5ever`: Browser-grade HTML5 parser from the Servo project
//! - `markup5ever_rcdom`: Reference-counted DOM tree implementation
//!
//! html5ever recovers from malformed markup the same way a browser does, which is what we
//! want for content pasted into the editor or stored by older versions of the site.
//!
//! # Element Mapping Table
//!
//! | IR Element         | HTML Equivalent                                         | Import also accepts          |
//! |--------------------|---------------------------------------------------------|------------------------------|
//! | Paragraph          | `<p>` (+ `style="text-align: …"`)                       | bare inline runs             |
//! | Heading            | `<h1>`…`<h6>` (+ alignment style)                       |                              |
//! | List (bullet)      | `<ul><li>`                                              |                              |
//! | List (ordered)     | `<ol><li>`                                              |                              |
//! | List (task)        | `<ul data-type="taskList"><li data-type="taskItem">`    | GFM checkbox `<input>` items |
//! | Blockquote         | `<blockquote>`                                          |                              |
//! | Verbatim           | `<pre><code class="language-x">`                        | `<pre>` without `<code>`     |
//! | Image              | `<img src alt title>`                                   |                              |
//! | InlineContent:     |                                                         |                              |
//! |   Bold             | `<strong>`                                              | `<b>`                        |
//! |   Italic           | `<em>`                                                  | `<i>`                        |
//! |   Underline        | `<u>`                                                   |                              |
//! |   Strikethrough    | `<s>`                                                   | `<del>`, `<strike>`          |
//! |   Code             | `<code>`                                                |                              |
//! |   Link             | `<a href target rel>`                                   |                              |
//! |   HardBreak        | `<br>`                                                  |                              |
//!
//! Unknown elements are transparent: their children are imported in place.
//!
//! # Lossy Conversions
//!
//! - Whitespace outside `<pre>` is collapsed the way a browser renders it
//! - Attributes other than the ones listed above are dropped

mod parser;
mod serializer;

pub use parser::parse_from_html;
pub use serializer::{serialize_to_html, LINK_REL};

use crate::error::FormatError;
use crate::format::Format;
use crate::ir::nodes::Document;

/// Format implementation for HTML
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlFormat;

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "Editor HTML fragment"
    }

    fn file_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        parser::parse_from_html(source)
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        serializer::serialize_to_html(doc)
    }
}

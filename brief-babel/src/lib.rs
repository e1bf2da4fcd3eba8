//! Article content conversion between editor HTML and Markdown.
//!
//! The article editor works on HTML and stores a Markdown twin next to it. Everything in
//! this crate exists to keep the two in step:
//!
//! - [`normalize`] is what the editor calls: `to_markdown`, `to_html` and
//!   `canonical_html`, which never fail and hand the input back if conversion breaks.
//! - [`registry::FormatRegistry`] looks formats up by name or extension for the CLI.
//! - Every conversion goes through the IR in [`ir`]. Parsers adapt the html5ever or
//!   comrak tree into a flat event stream, [`common`] folds it into nodes and back, and
//!   serializers build the target library's tree from events again.
//!
//! HTML is the richer side. Underline and alignment have no Markdown form and are dropped
//! on the way out, so a document that has been through Markdown once keeps producing the
//! same Markdown afterwards.
//!
//! Round-trip tests live under `tests/<format>/`, pulled in by `tests/lib.rs`.

pub mod common;
pub mod error;
pub mod format;
pub mod formats;
pub mod ir;
pub mod normalize;
pub mod registry;

pub use error::FormatError;
pub use format::Format;
pub use normalize::{canonical_html, to_html, to_markdown, try_to_html, try_to_markdown};
pub use registry::FormatRegistry;

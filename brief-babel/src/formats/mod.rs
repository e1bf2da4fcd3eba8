//! Format implementations
//!
//! This module contains all format implementations that convert between
//! the IR and a text representation.

pub mod html;
pub mod markdown;

pub use html::HtmlFormat;
pub use markdown::MarkdownFormat;

//! HTML format tests
//!
//! Tests for editor HTML import and canonical HTML export.

mod export;
mod import;

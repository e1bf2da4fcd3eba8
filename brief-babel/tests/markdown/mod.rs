//! Markdown format tests
//!
//! Tests for bidirectional Markdown ↔ IR conversion.

mod export;
mod import;

//! Intermediate Representation (IR) for article documents.
//!
//! This module defines a format-agnostic representation of an article,
//! shared by the HTML and Markdown formats so that each format only has to
//! map its own AST onto the IR.

pub mod events;
pub mod nodes;

//! HTML ⇄ Markdown normalization for editor content
//!
//! The editor stores HTML as its primary representation and derives a Markdown twin on
//! every change. Both directions go through the IR, so the HTML produced by [`to_html`]
//! is exactly the canonical HTML the editor serializes.
//!
//! The infallible functions never fail from the caller's point of view: conversion
//! failures are logged. A failed Markdown export yields an empty string, since the
//! Markdown twin must always be derived. The other directions hand the input back
//! unchanged. Use the `try_` variants when the error matters.

use crate::error::FormatError;
use crate::formats::html::{parse_from_html, serialize_to_html};
use crate::formats::markdown::parser::parse_from_markdown;
use crate::formats::markdown::serializer::serialize_to_markdown;

/// Convert editor HTML to Markdown.
///
/// Blank input yields an empty string without touching the converter.
pub fn to_markdown(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    derived_or_empty(try_to_markdown(html))
}

fn derived_or_empty(markdown: Result<String, FormatError>) -> String {
    markdown.unwrap_or_else(|err| {
        tracing::warn!(error = %err, "html to markdown conversion failed, exporting nothing");
        String::new()
    })
}

/// Convert Markdown to canonical editor HTML.
///
/// Blank input yields an empty string without touching the converter.
pub fn to_html(markdown: &str) -> String {
    if markdown.trim().is_empty() {
        return String::new();
    }
    match try_to_html(markdown) {
        Ok(html) => html,
        Err(err) => {
            tracing::warn!(error = %err, "markdown to html conversion failed, keeping input");
            markdown.to_string()
        }
    }
}

/// Fallible HTML → Markdown conversion.
pub fn try_to_markdown(html: &str) -> Result<String, FormatError> {
    let doc = parse_from_html(html)?;
    serialize_to_markdown(&doc)
}

/// Fallible Markdown → HTML conversion.
pub fn try_to_html(markdown: &str) -> Result<String, FormatError> {
    let doc = parse_from_markdown(markdown)?;
    serialize_to_html(&doc)
}

/// Normalize arbitrary HTML to the canonical editor form.
pub fn canonical_html(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    match parse_from_html(html).and_then(|doc| serialize_to_html(&doc)) {
        Ok(canonical) => canonical,
        Err(err) => {
            tracing::warn!(error = %err, "html normalization failed, keeping input");
            html.to_string()
        }
    }
}

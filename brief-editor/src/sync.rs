//! Keeping the editor and its caller in agreement without echo loops.
//!
//! Content flows in two directions: the caller pushes values in
//! ([`SyncDirection::ExternalToInternal`]) and local edits are reported out
//! ([`SyncDirection::InternalToExternal`]). Both directions update a single watermark,
//! the HTML last exchanged with the caller. An incoming value equal to the watermark is
//! our own emission coming back and is ignored; an outgoing HTML equal to it has
//! already been reported and is suppressed.

use brief_babel::{to_html, to_markdown};
use serde::{Deserialize, Serialize};

/// Content handed to the editor by its caller. Either representation may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContentValue {
    pub html: Option<String>,
    pub markdown: Option<String>,
}

impl ContentValue {
    pub fn html(html: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
            markdown: None,
        }
    }

    pub fn markdown(markdown: impl Into<String>) -> Self {
        Self {
            html: None,
            markdown: Some(markdown.into()),
        }
    }
}

/// Which representation wins when a value carries both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentMode {
    #[default]
    Html,
    Markdown,
}

impl std::str::FromStr for ContentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(ContentMode::Html),
            "markdown" | "md" => Ok(ContentMode::Markdown),
            other => Err(format!("unknown content mode '{other}'")),
        }
    }
}

/// Both forms of the content as reported to the caller. HTML is primary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DualRepresentation {
    pub html: String,
    pub markdown: String,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// Resolve the HTML a value stands for, preferring the representation `mode` names.
pub fn resolve_html(value: &ContentValue, mode: ContentMode) -> String {
    let from_html = || non_blank(&value.html).map(str::to_string);
    let from_markdown = || non_blank(&value.markdown).map(to_html);
    let resolved = match mode {
        ContentMode::Html => from_html().or_else(from_markdown),
        ContentMode::Markdown => from_markdown().or_else(from_html),
    };
    resolved.unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDirection {
    ExternalToInternal,
    InternalToExternal,
}

/// What to do with the editor after an external value arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalAction {
    /// Replace the document with this HTML, without reporting it back.
    Replace(String),
    /// Empty the document.
    Clear,
    Ignore,
}

#[derive(Debug, Clone, Default)]
pub struct SyncState {
    last_emitted_html: String,
}

impl SyncState {
    pub fn new(initial_html: impl Into<String>) -> Self {
        Self {
            last_emitted_html: initial_html.into(),
        }
    }

    pub fn last_emitted_html(&self) -> &str {
        &self.last_emitted_html
    }

    fn record(&mut self, direction: SyncDirection, html: &str) {
        tracing::debug!(?direction, len = html.len(), "sync watermark moved");
        self.last_emitted_html = html.to_string();
    }

    /// Decide how an external value (already resolved to HTML) applies to the editor.
    pub fn reconcile_external(
        &mut self,
        resolved: &str,
        current_html: &str,
        document_empty: bool,
    ) -> ExternalAction {
        if !resolved.is_empty() {
            if resolved != current_html && resolved != self.last_emitted_html {
                self.record(SyncDirection::ExternalToInternal, resolved);
                return ExternalAction::Replace(resolved.to_string());
            }
        } else if !document_empty && self.last_emitted_html.is_empty() {
            self.record(SyncDirection::ExternalToInternal, resolved);
            return ExternalAction::Clear;
        }
        tracing::debug!("external value matches editor state, ignoring");
        ExternalAction::Ignore
    }

    /// Report a local change. Returns `None` when the HTML was already exchanged.
    pub fn observe_local(&mut self, current_html: &str) -> Option<DualRepresentation> {
        if current_html == self.last_emitted_html {
            tracing::debug!("local html equals last emission, suppressing");
            return None;
        }
        let markdown = to_markdown(current_html);
        self.record(SyncDirection::InternalToExternal, current_html);
        Some(DualRepresentation {
            html: current_html.to_string(),
            markdown,
        })
    }
}

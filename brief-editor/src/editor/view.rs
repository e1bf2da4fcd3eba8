//! Render model for the editor surface and its toolbar.

use crate::engine::{ActiveQuery, DocumentEditor, EditorCommand};
use crate::schema::{MarkKind, TextAlign};
use serde::Serialize;

/// A toolbar button's action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolbarAction {
    Bold,
    Italic,
    Underline,
    Strike,
    Code,
    Heading(u8),
    BulletList,
    OrderedList,
    TaskList,
    Blockquote,
    CodeBlock,
    Align(TextAlign),
    Link,
    Image,
    Undo,
    Redo,
}

/// Toolbar layout, left to right.
pub const TOOLBAR: &[ToolbarAction] = &[
    ToolbarAction::Bold,
    ToolbarAction::Italic,
    ToolbarAction::Underline,
    ToolbarAction::Strike,
    ToolbarAction::Code,
    ToolbarAction::Heading(1),
    ToolbarAction::Heading(2),
    ToolbarAction::Heading(3),
    ToolbarAction::Heading(4),
    ToolbarAction::BulletList,
    ToolbarAction::OrderedList,
    ToolbarAction::TaskList,
    ToolbarAction::Blockquote,
    ToolbarAction::CodeBlock,
    ToolbarAction::Align(TextAlign::Left),
    ToolbarAction::Align(TextAlign::Center),
    ToolbarAction::Align(TextAlign::Right),
    ToolbarAction::Align(TextAlign::Justify),
    ToolbarAction::Link,
    ToolbarAction::Image,
    ToolbarAction::Undo,
    ToolbarAction::Redo,
];

impl ToolbarAction {
    pub fn label(&self) -> &'static str {
        match self {
            ToolbarAction::Bold => "Bold",
            ToolbarAction::Italic => "Italic",
            ToolbarAction::Underline => "Underline",
            ToolbarAction::Strike => "Strikethrough",
            ToolbarAction::Code => "Code",
            ToolbarAction::Heading(1) => "Heading 1",
            ToolbarAction::Heading(2) => "Heading 2",
            ToolbarAction::Heading(3) => "Heading 3",
            ToolbarAction::Heading(_) => "Heading 4",
            ToolbarAction::BulletList => "Bullet list",
            ToolbarAction::OrderedList => "Numbered list",
            ToolbarAction::TaskList => "Task list",
            ToolbarAction::Blockquote => "Quote",
            ToolbarAction::CodeBlock => "Code block",
            ToolbarAction::Align(TextAlign::Left) => "Align left",
            ToolbarAction::Align(TextAlign::Center) => "Align center",
            ToolbarAction::Align(TextAlign::Right) => "Align right",
            ToolbarAction::Align(TextAlign::Justify) => "Justify",
            ToolbarAction::Link => "Link",
            ToolbarAction::Image => "Image",
            ToolbarAction::Undo => "Undo",
            ToolbarAction::Redo => "Redo",
        }
    }

    /// The command a click issues. Link and image buttons need input first.
    pub fn command(&self) -> Option<EditorCommand> {
        Some(match *self {
            ToolbarAction::Bold => EditorCommand::ToggleMark(MarkKind::Bold),
            ToolbarAction::Italic => EditorCommand::ToggleMark(MarkKind::Italic),
            ToolbarAction::Underline => EditorCommand::ToggleMark(MarkKind::Underline),
            ToolbarAction::Strike => EditorCommand::ToggleMark(MarkKind::Strike),
            ToolbarAction::Code => EditorCommand::ToggleMark(MarkKind::Code),
            ToolbarAction::Heading(level) => EditorCommand::ToggleHeading(level),
            ToolbarAction::BulletList => EditorCommand::ToggleBulletList,
            ToolbarAction::OrderedList => EditorCommand::ToggleOrderedList,
            ToolbarAction::TaskList => EditorCommand::ToggleTaskList,
            ToolbarAction::Blockquote => EditorCommand::ToggleBlockquote,
            ToolbarAction::CodeBlock => EditorCommand::ToggleCodeBlock,
            ToolbarAction::Align(align) => EditorCommand::SetAlign(Some(align)),
            ToolbarAction::Undo => EditorCommand::Undo,
            ToolbarAction::Redo => EditorCommand::Redo,
            ToolbarAction::Link | ToolbarAction::Image => return None,
        })
    }

    fn query(&self) -> Option<ActiveQuery> {
        Some(match *self {
            ToolbarAction::Bold => ActiveQuery::Mark(MarkKind::Bold),
            ToolbarAction::Italic => ActiveQuery::Mark(MarkKind::Italic),
            ToolbarAction::Underline => ActiveQuery::Mark(MarkKind::Underline),
            ToolbarAction::Strike => ActiveQuery::Mark(MarkKind::Strike),
            ToolbarAction::Code => ActiveQuery::Mark(MarkKind::Code),
            ToolbarAction::Heading(level) => ActiveQuery::Heading(level),
            ToolbarAction::BulletList => ActiveQuery::BulletList,
            ToolbarAction::OrderedList => ActiveQuery::OrderedList,
            ToolbarAction::TaskList => ActiveQuery::TaskList,
            ToolbarAction::Blockquote => ActiveQuery::Blockquote,
            ToolbarAction::CodeBlock => ActiveQuery::CodeBlock,
            ToolbarAction::Align(align) => ActiveQuery::Align(align),
            ToolbarAction::Link => ActiveQuery::Link,
            ToolbarAction::Image | ToolbarAction::Undo | ToolbarAction::Redo => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolbarButton {
    pub action: ToolbarAction,
    pub label: &'static str,
    pub active: bool,
    pub enabled: bool,
}

/// What the editor component renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EditorView {
    /// The engine is not mounted yet.
    Loading { placeholder: String },
    Ready {
        toolbar: Vec<ToolbarButton>,
        html: String,
        /// Shown over the surface while the document is empty.
        placeholder: Option<String>,
        editable: bool,
    },
}

pub(crate) fn toolbar(engine: &DocumentEditor, editable: bool) -> Vec<ToolbarButton> {
    TOOLBAR
        .iter()
        .map(|&action| {
            let enabled = editable
                && match action {
                    ToolbarAction::Undo => engine.can_undo(),
                    ToolbarAction::Redo => engine.can_redo(),
                    _ => true,
                };
            ToolbarButton {
                action,
                label: action.label(),
                active: action.query().is_some_and(|q| engine.is_active(q)),
                enabled,
            }
        })
        .collect()
}

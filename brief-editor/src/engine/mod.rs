//! The editor engine: one document, its selection and its undo history.
//!
//! All content changes go through [`DocumentEditor::apply`], which reports whether the
//! document actually changed. Callers use that to decide when to serialize and notify.

pub mod commands;
pub mod history;
pub mod selection;

pub use commands::EditorCommand;
pub use history::{Snapshot, SnapshotHistory, UndoManager};
pub use selection::Selection;

use crate::schema::from_ir::from_ir_document;
use crate::schema::to_ir::to_ir_document;
use crate::schema::{Block, LinkMark, MarkKind, RichDocument, TextAlign};
use brief_babel::formats::html::{parse_from_html, serialize_to_html};

/// Toolbar state a caller can ask about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveQuery {
    Mark(MarkKind),
    Paragraph,
    Heading(u8),
    CodeBlock,
    BulletList,
    OrderedList,
    TaskList,
    Blockquote,
    Align(TextAlign),
    Link,
}

/// Parse editor HTML into a document. Unparseable input yields an empty document.
pub fn document_from_html(html: &str) -> RichDocument {
    if html.trim().is_empty() {
        return RichDocument::empty();
    }
    match parse_from_html(html) {
        Ok(ir) => from_ir_document(&ir),
        Err(err) => {
            tracing::warn!(error = %err, "could not parse editor html, starting empty");
            RichDocument::empty()
        }
    }
}

/// Serialize a document to canonical editor HTML.
pub fn document_to_html(doc: &RichDocument) -> String {
    match serialize_to_html(&to_ir_document(doc)) {
        Ok(html) => html,
        Err(err) => {
            tracing::warn!(error = %err, "could not serialize editor document");
            String::new()
        }
    }
}

#[derive(Debug, Clone)]
pub struct DocumentEditor {
    doc: RichDocument,
    selection: Selection,
    history: SnapshotHistory,
}

impl DocumentEditor {
    pub fn new(history_depth: usize) -> Self {
        Self {
            doc: RichDocument::empty(),
            selection: Selection::default(),
            history: SnapshotHistory::new(history_depth),
        }
    }

    pub fn from_html(html: &str, history_depth: usize) -> Self {
        let mut editor = Self::new(history_depth);
        editor.doc = document_from_html(html);
        editor
    }

    pub fn document(&self) -> &RichDocument {
        &self.doc
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection.clamp(&self.doc);
    }

    /// Current content as canonical HTML.
    pub fn html(&self) -> String {
        document_to_html(&self.doc)
    }

    pub fn is_empty(&self) -> bool {
        self.doc.is_empty()
    }

    /// Replace the whole document. History is dropped and the caret returns to the start.
    pub fn set_html(&mut self, html: &str) {
        self.doc = document_from_html(html);
        self.selection = Selection::default();
        self.history.clear_history();
    }

    pub fn clear(&mut self) {
        self.set_html("");
    }

    /// Run a command. Returns true when the document changed.
    pub fn apply(&mut self, command: EditorCommand) -> bool {
        let changed = match command {
            EditorCommand::Undo => self.undo(),
            EditorCommand::Redo => self.redo(),
            ref command => {
                let before = self.snapshot();
                commands::run(&mut self.doc, &mut self.selection, command);
                self.doc.normalize();
                self.selection = self.selection.clamp(&self.doc);
                let changed = self.doc != before.doc;
                if changed {
                    self.history.record(before);
                }
                changed
            }
        };
        tracing::trace!(?command, changed, "applied editor command");
        changed
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            doc: self.doc.clone(),
            selection: self.selection,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.doc = snapshot.doc;
        self.selection = snapshot.selection.clamp(&self.doc);
    }

    fn undo(&mut self) -> bool {
        match self.history.undo(self.snapshot()) {
            Some(previous) => {
                self.restore(previous);
                true
            }
            None => false,
        }
    }

    fn redo(&mut self) -> bool {
        match self.history.redo(self.snapshot()) {
            Some(next) => {
                self.restore(next);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// The link under the selection, used to pre-fill the link prompt.
    pub fn current_link(&self) -> Option<LinkMark> {
        commands::current_link(&self.doc, self.selection)
    }

    pub fn is_active(&self, query: ActiveQuery) -> bool {
        let Some(path) = self.doc.textblock_path(self.selection.block) else {
            return false;
        };
        let textblock = self.doc.block_at(&path);
        let mut ancestors = (1..path.len()).filter_map(|depth| self.doc.block_at(&path[..depth]));

        match query {
            ActiveQuery::Mark(kind) => commands::mark_active(&self.doc, self.selection, kind),
            ActiveQuery::Paragraph => matches!(textblock, Some(Block::Paragraph { .. })),
            ActiveQuery::Heading(level) => {
                matches!(textblock, Some(Block::Heading { level: l, .. }) if *l == level)
            }
            ActiveQuery::CodeBlock => matches!(textblock, Some(Block::CodeBlock { .. })),
            ActiveQuery::BulletList => ancestors.any(|b| matches!(b, Block::BulletList(_))),
            ActiveQuery::OrderedList => ancestors.any(|b| matches!(b, Block::OrderedList(_))),
            ActiveQuery::TaskList => ancestors.any(|b| matches!(b, Block::TaskList(_))),
            ActiveQuery::Blockquote => ancestors.any(|b| matches!(b, Block::Blockquote(_))),
            ActiveQuery::Align(align) => textblock
                .filter(|b| !matches!(b, Block::CodeBlock { .. }))
                .is_some_and(|b| b.align().unwrap_or(TextAlign::Left) == align),
            ActiveQuery::Link => self.current_link().is_some(),
        }
    }
}

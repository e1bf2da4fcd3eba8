//! Cursor and selection within a single textblock.

use crate::schema::{content, RichDocument};
use serde::Serialize;

/// A selection inside one textblock.
///
/// `block` is the textblock's index in document order; `from` and `to` are editor
/// positions within it with `from <= to`. An empty selection is a caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Selection {
    pub block: usize,
    pub from: usize,
    pub to: usize,
}

impl Selection {
    pub fn caret(block: usize, offset: usize) -> Self {
        Self {
            block,
            from: offset,
            to: offset,
        }
    }

    /// A range selection; the ends may be given in either order.
    pub fn range(block: usize, anchor: usize, head: usize) -> Self {
        Self {
            block,
            from: anchor.min(head),
            to: anchor.max(head),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    /// Pull the selection back inside `doc`.
    pub fn clamp(self, doc: &RichDocument) -> Self {
        let count = doc.textblock_count();
        let block = self.block.min(count.saturating_sub(1));
        let len = doc
            .textblock(block)
            .and_then(|b| b.content())
            .map_or(0, |c| content::len(c));
        Self {
            block,
            from: self.from.min(len),
            to: self.to.min(len),
        }
    }
}

//! The editor's document model.
//!
//! A [`RichDocument`] is a tree of blocks. Textblocks (paragraphs, headings and code
//! blocks) hold a flat run list of [`Inline`]s where every text run carries its own
//! [`Marks`]; this is the shape editing commands want. The nested IR shape used by the
//! converters is produced and consumed in [`to_ir`] and [`from_ir`].
//!
//! Textblocks are addressed by their index in depth-first document order, or by a
//! [`BlockPath`] when a command needs to reach the containers around one.

pub mod content;
pub mod from_ir;
pub mod to_ir;

pub use brief_babel::ir::nodes::TextAlign;
use serde::Serialize;

/// Highest heading level the editor offers.
pub const MAX_HEADING_LEVEL: u8 = 4;

/// A link mark's attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkMark {
    pub href: String,
    pub title: Option<String>,
}

impl LinkMark {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            title: None,
        }
    }
}

/// Formatting carried by a text run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Marks {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    pub code: bool,
    pub link: Option<LinkMark>,
}

/// The toggleable marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkKind {
    Bold,
    Italic,
    Underline,
    Strike,
    Code,
}

impl Marks {
    pub fn has(&self, kind: MarkKind) -> bool {
        match kind {
            MarkKind::Bold => self.bold,
            MarkKind::Italic => self.italic,
            MarkKind::Underline => self.underline,
            MarkKind::Strike => self.strike,
            MarkKind::Code => self.code,
        }
    }

    pub fn set(&mut self, kind: MarkKind, on: bool) {
        match kind {
            MarkKind::Bold => self.bold = on,
            MarkKind::Italic => self.italic = on,
            MarkKind::Underline => self.underline = on,
            MarkKind::Strike => self.strike = on,
            MarkKind::Code => self.code = on,
        }
    }

    pub fn with(mut self, kind: MarkKind) -> Self {
        self.set(kind, true);
        self
    }
}

/// Attributes of an image node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageAttrs {
    pub src: String,
    pub alt: String,
    pub title: Option<String>,
}

/// Inline content of a textblock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inline {
    Text { text: String, marks: Marks },
    HardBreak,
    Image(ImageAttrs),
}

impl Inline {
    pub fn text(text: impl Into<String>) -> Self {
        Inline::Text {
            text: text.into(),
            marks: Marks::default(),
        }
    }

    pub fn marked(text: impl Into<String>, marks: Marks) -> Self {
        Inline::Text {
            text: text.into(),
            marks,
        }
    }

    /// Length in editor positions: characters for text, one for leaf nodes.
    pub fn len(&self) -> usize {
        match self {
            Inline::Text { text, .. } => text.chars().count(),
            Inline::HardBreak | Inline::Image(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Marks of this inline; leaf nodes carry none.
    pub fn marks(&self) -> Option<&Marks> {
        match self {
            Inline::Text { marks, .. } => Some(marks),
            _ => None,
        }
    }
}

/// A bullet or ordered list entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ListEntry {
    pub blocks: Vec<Block>,
}

/// A task list entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TaskEntry {
    pub checked: bool,
    pub blocks: Vec<Block>,
}

/// A block node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph {
        align: Option<TextAlign>,
        content: Vec<Inline>,
    },
    Heading {
        level: u8,
        align: Option<TextAlign>,
        content: Vec<Inline>,
    },
    /// Plain text only; newlines are kept as text.
    CodeBlock {
        language: Option<String>,
        content: Vec<Inline>,
    },
    BulletList(Vec<ListEntry>),
    OrderedList(Vec<ListEntry>),
    TaskList(Vec<TaskEntry>),
    Blockquote(Vec<Block>),
    Image(ImageAttrs),
}

impl Block {
    pub fn paragraph(content: Vec<Inline>) -> Self {
        Block::Paragraph {
            align: None,
            content,
        }
    }

    pub fn empty_paragraph() -> Self {
        Block::paragraph(Vec::new())
    }

    pub fn is_textblock(&self) -> bool {
        matches!(
            self,
            Block::Paragraph { .. } | Block::Heading { .. } | Block::CodeBlock { .. }
        )
    }

    pub fn content(&self) -> Option<&Vec<Inline>> {
        match self {
            Block::Paragraph { content, .. }
            | Block::Heading { content, .. }
            | Block::CodeBlock { content, .. } => Some(content),
            _ => None,
        }
    }

    pub fn content_mut(&mut self) -> Option<&mut Vec<Inline>> {
        match self {
            Block::Paragraph { content, .. }
            | Block::Heading { content, .. }
            | Block::CodeBlock { content, .. } => Some(content),
            _ => None,
        }
    }

    pub fn align(&self) -> Option<TextAlign> {
        match self {
            Block::Paragraph { align, .. } | Block::Heading { align, .. } => *align,
            _ => None,
        }
    }
}

/// Location of a block: the index at each level, where a list level takes two
/// indices (entry, then block within the entry).
pub type BlockPath = Vec<usize>;

/// The document edited by one editor instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RichDocument {
    pub blocks: Vec<Block>,
}

impl Default for RichDocument {
    fn default() -> Self {
        Self::empty()
    }
}

impl RichDocument {
    /// A document holding a single empty paragraph.
    pub fn empty() -> Self {
        Self {
            blocks: vec![Block::empty_paragraph()],
        }
    }

    /// Build a document from blocks, normalizing it.
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        let mut doc = Self { blocks };
        doc.normalize();
        doc
    }

    /// True for a document with a single paragraph and no content.
    pub fn is_empty(&self) -> bool {
        match self.blocks.as_slice() {
            [Block::Paragraph { content, .. }] => content.is_empty(),
            _ => false,
        }
    }

    /// Restore the schema invariants after a mutation.
    pub fn normalize(&mut self) {
        normalize_blocks(&mut self.blocks);
        if self.textblock_count() == 0 {
            self.blocks.push(Block::empty_paragraph());
        }
    }

    /// Paths of every textblock, in depth-first order.
    pub fn textblock_paths(&self) -> Vec<BlockPath> {
        let mut out = Vec::new();
        collect_textblock_paths(&self.blocks, &mut Vec::new(), &mut out);
        out
    }

    pub fn textblock_count(&self) -> usize {
        self.textblock_paths().len()
    }

    pub fn textblock_path(&self, index: usize) -> Option<BlockPath> {
        self.textblock_paths().into_iter().nth(index)
    }

    pub fn textblock(&self, index: usize) -> Option<&Block> {
        let path = self.textblock_path(index)?;
        self.block_at(&path)
    }

    pub fn textblock_mut(&mut self, index: usize) -> Option<&mut Block> {
        let path = self.textblock_path(index)?;
        let (container, at) = self.container_mut(&path)?;
        container.get_mut(at)
    }

    pub fn block_at(&self, path: &[usize]) -> Option<&Block> {
        block_at(&self.blocks, path)
    }

    /// The block list holding the block at `path`, and its index in that list.
    pub fn container_mut(&mut self, path: &[usize]) -> Option<(&mut Vec<Block>, usize)> {
        container_mut(&mut self.blocks, path)
    }

    /// The innermost task entry enclosing the block at `path`.
    pub fn task_entry_mut(&mut self, path: &[usize]) -> Option<&mut TaskEntry> {
        task_entry_mut(&mut self.blocks, path)
    }

    /// Plain text of the whole document, one line per textblock.
    pub fn plain_text(&self) -> String {
        self.textblock_paths()
            .iter()
            .filter_map(|path| self.block_at(path))
            .filter_map(Block::content)
            .map(|content| content::plain_text(content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn normalize_blocks(blocks: &mut Vec<Block>) {
    for block in blocks.iter_mut() {
        match block {
            Block::Paragraph { content, .. } => content::normalize(content),
            Block::Heading { level, content, .. } => {
                *level = (*level).clamp(1, MAX_HEADING_LEVEL);
                content::normalize(content);
            }
            Block::CodeBlock { content, .. } => {
                let text = content::plain_text(content);
                content.clear();
                if !text.is_empty() {
                    content.push(Inline::text(text));
                }
            }
            Block::BulletList(entries) | Block::OrderedList(entries) => {
                if entries.is_empty() {
                    entries.push(ListEntry::default());
                }
                for entry in entries.iter_mut() {
                    normalize_container(&mut entry.blocks);
                }
            }
            Block::TaskList(entries) => {
                if entries.is_empty() {
                    entries.push(TaskEntry::default());
                }
                for entry in entries.iter_mut() {
                    normalize_container(&mut entry.blocks);
                }
            }
            Block::Blockquote(children) => normalize_container(children),
            Block::Image(_) => {}
        }
    }
}

/// Nested containers must start with a textblock to be editable.
fn normalize_container(blocks: &mut Vec<Block>) {
    normalize_blocks(blocks);
    if blocks.first().map_or(true, |b| !b.is_textblock() && !has_textblock(b)) {
        blocks.insert(0, Block::empty_paragraph());
    }
}

fn has_textblock(block: &Block) -> bool {
    let mut out = Vec::new();
    collect_textblock_paths(std::slice::from_ref(block), &mut Vec::new(), &mut out);
    !out.is_empty()
}

fn collect_textblock_paths(blocks: &[Block], prefix: &mut Vec<usize>, out: &mut Vec<BlockPath>) {
    for (i, block) in blocks.iter().enumerate() {
        prefix.push(i);
        match block {
            Block::Paragraph { .. } | Block::Heading { .. } | Block::CodeBlock { .. } => {
                out.push(prefix.clone())
            }
            Block::Blockquote(children) => collect_textblock_paths(children, prefix, out),
            Block::BulletList(entries) | Block::OrderedList(entries) => {
                for (e, entry) in entries.iter().enumerate() {
                    prefix.push(e);
                    collect_textblock_paths(&entry.blocks, prefix, out);
                    prefix.pop();
                }
            }
            Block::TaskList(entries) => {
                for (e, entry) in entries.iter().enumerate() {
                    prefix.push(e);
                    collect_textblock_paths(&entry.blocks, prefix, out);
                    prefix.pop();
                }
            }
            Block::Image(_) => {}
        }
        prefix.pop();
    }
}

fn block_at<'a>(blocks: &'a [Block], path: &[usize]) -> Option<&'a Block> {
    let (first, rest) = path.split_first()?;
    let block = blocks.get(*first)?;
    if rest.is_empty() {
        return Some(block);
    }
    match block {
        Block::Blockquote(children) => block_at(children, rest),
        Block::BulletList(entries) | Block::OrderedList(entries) => {
            let (entry, rest) = rest.split_first()?;
            block_at(&entries.get(*entry)?.blocks, rest)
        }
        Block::TaskList(entries) => {
            let (entry, rest) = rest.split_first()?;
            block_at(&entries.get(*entry)?.blocks, rest)
        }
        _ => None,
    }
}

fn container_mut<'a>(
    blocks: &'a mut Vec<Block>,
    path: &[usize],
) -> Option<(&'a mut Vec<Block>, usize)> {
    match path {
        [] => None,
        [last] => Some((blocks, *last)),
        [first, rest @ ..] => match blocks.get_mut(*first)? {
            Block::Blockquote(children) => container_mut(children, rest),
            Block::BulletList(entries) | Block::OrderedList(entries) => {
                let (entry, rest) = rest.split_first()?;
                container_mut(&mut entries.get_mut(*entry)?.blocks, rest)
            }
            Block::TaskList(entries) => {
                let (entry, rest) = rest.split_first()?;
                container_mut(&mut entries.get_mut(*entry)?.blocks, rest)
            }
            _ => None,
        },
    }
}

fn encloses_task(blocks: &[Block], path: &[usize]) -> bool {
    let Some((first, rest)) = path.split_first() else {
        return false;
    };
    if rest.is_empty() {
        return false;
    }
    match blocks.get(*first) {
        Some(Block::TaskList(_)) => true,
        Some(Block::Blockquote(children)) => encloses_task(children, rest),
        Some(Block::BulletList(entries)) | Some(Block::OrderedList(entries)) => rest
            .split_first()
            .and_then(|(e, rest)| entries.get(*e).map(|entry| encloses_task(&entry.blocks, rest)))
            .unwrap_or(false),
        _ => false,
    }
}

fn task_entry_mut<'a>(blocks: &'a mut Vec<Block>, path: &[usize]) -> Option<&'a mut TaskEntry> {
    let (first, rest) = path.split_first()?;
    if rest.is_empty() {
        return None;
    }
    match blocks.get_mut(*first)? {
        Block::Blockquote(children) => task_entry_mut(children, rest),
        Block::BulletList(entries) | Block::OrderedList(entries) => {
            let (entry, rest) = rest.split_first()?;
            task_entry_mut(&mut entries.get_mut(*entry)?.blocks, rest)
        }
        Block::TaskList(entries) => {
            let (entry, rest) = rest.split_first()?;
            let entry = entries.get_mut(*entry)?;
            if encloses_task(&entry.blocks, rest) {
                task_entry_mut(&mut entry.blocks, rest)
            } else {
                Some(entry)
            }
        }
        _ => None,
    }
}

//! Conversion from the editor schema to the nested IR.
//!
//! Marked runs are regrouped into nested inline nodes. Adjacent runs sharing a mark are
//! wrapped together, outermost first: link, bold, italic, underline, strikethrough. Code
//! is always the innermost node.

use super::{content, Block, ImageAttrs, Inline, LinkMark, RichDocument};
use brief_babel::ir::nodes::{
    Blockquote, DocNode, Document, Heading, Image, InlineContent, Link, List, ListItem, ListKind,
    Paragraph, Verbatim,
};

/// Build an IR document from an editor document.
pub fn to_ir_document(doc: &RichDocument) -> Document {
    Document {
        children: doc.blocks.iter().map(convert_block).collect(),
    }
}

fn convert_block(block: &Block) -> DocNode {
    match block {
        Block::Paragraph { align, content } => DocNode::Paragraph(Paragraph {
            content: nest_inlines(content),
            align: *align,
        }),
        Block::Heading {
            level,
            align,
            content,
        } => DocNode::Heading(Heading {
            level: *level as usize,
            content: nest_inlines(content),
            align: *align,
        }),
        Block::CodeBlock { language, content } => DocNode::Verbatim(Verbatim {
            language: language.clone(),
            content: content::plain_text(content),
        }),
        Block::BulletList(entries) => list(
            ListKind::Bullet,
            entries.iter().map(|e| (None, e.blocks.as_slice())),
        ),
        Block::OrderedList(entries) => list(
            ListKind::Ordered,
            entries.iter().map(|e| (None, e.blocks.as_slice())),
        ),
        Block::TaskList(entries) => list(
            ListKind::Task,
            entries.iter().map(|e| (Some(e.checked), e.blocks.as_slice())),
        ),
        Block::Blockquote(children) => DocNode::Blockquote(Blockquote {
            children: children.iter().map(convert_block).collect(),
        }),
        Block::Image(attrs) => DocNode::Image(image(attrs)),
    }
}

fn list<'a>(kind: ListKind, items: impl Iterator<Item = (Option<bool>, &'a [Block])>) -> DocNode {
    DocNode::List(List {
        items: items
            .map(|(checked, blocks)| ListItem {
                checked,
                children: blocks.iter().map(convert_block).collect(),
            })
            .collect(),
        kind,
    })
}

fn image(attrs: &ImageAttrs) -> Image {
    Image {
        src: attrs.src.clone(),
        alt: attrs.alt.clone(),
        title: attrs.title.clone(),
    }
}

/// Grouping levels, outermost first.
#[derive(Clone, Copy)]
enum Level {
    Link,
    Bold,
    Italic,
    Underline,
    Strike,
}

const LEVELS: [Level; 5] = [
    Level::Link,
    Level::Bold,
    Level::Italic,
    Level::Underline,
    Level::Strike,
];

#[derive(PartialEq)]
enum GroupKey<'a> {
    Plain,
    Flag,
    Link(&'a LinkMark),
}

fn group_key(inline: &Inline, level: Level) -> GroupKey<'_> {
    let Some(marks) = inline.marks() else {
        return GroupKey::Plain;
    };
    let on = match level {
        Level::Link => return marks.link.as_ref().map_or(GroupKey::Plain, GroupKey::Link),
        Level::Bold => marks.bold,
        Level::Italic => marks.italic,
        Level::Underline => marks.underline,
        Level::Strike => marks.strike,
    };
    if on {
        GroupKey::Flag
    } else {
        GroupKey::Plain
    }
}

/// Regroup marked runs into nested IR inlines.
pub fn nest_inlines(runs: &[Inline]) -> Vec<InlineContent> {
    nest(runs, 0)
}

fn nest(runs: &[Inline], depth: usize) -> Vec<InlineContent> {
    let Some(&level) = LEVELS.get(depth) else {
        return runs.iter().map(leaf).collect();
    };

    let mut out = Vec::new();
    let mut start = 0;
    while start < runs.len() {
        let key = group_key(&runs[start], level);
        let mut end = start + 1;
        while end < runs.len() && group_key(&runs[end], level) == key {
            end += 1;
        }
        let children = nest(&runs[start..end], depth + 1);
        match key {
            GroupKey::Plain => out.extend(children),
            GroupKey::Link(link) => out.push(InlineContent::Link(Link {
                href: link.href.clone(),
                title: link.title.clone(),
                children,
            })),
            GroupKey::Flag => out.push(match level {
                Level::Bold => InlineContent::Bold(children),
                Level::Italic => InlineContent::Italic(children),
                Level::Underline => InlineContent::Underline(children),
                Level::Strike | Level::Link => InlineContent::Strikethrough(children),
            }),
        }
        start = end;
    }
    out
}

fn leaf(inline: &Inline) -> InlineContent {
    match inline {
        Inline::Text { text, marks } if marks.code => InlineContent::Code(text.clone()),
        Inline::Text { text, .. } => InlineContent::Text(text.clone()),
        Inline::HardBreak => InlineContent::HardBreak,
        Inline::Image(attrs) => InlineContent::Image(image(attrs)),
    }
}

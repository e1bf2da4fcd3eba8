//! Reshapes inline content before export so the Markdown reads back as the same tree.
//!
//! Emphasis delimiters only count when they hug non-space text, so whitespace at the
//! edges of a mark moves outside it and touching runs of the same mark are merged.
//! ATX headings are single lines, so a hard break inside one becomes a space.

use crate::ir::nodes::*;
use std::mem::discriminant;

pub(super) fn tidy_document(doc: &Document) -> Document {
    Document {
        children: doc.children.iter().map(tidy_block).collect(),
    }
}

fn tidy_block(node: &DocNode) -> DocNode {
    match node {
        DocNode::Heading(heading) => {
            let mut content = heading.content.clone();
            breaks_to_spaces(&mut content);
            DocNode::Heading(Heading {
                level: heading.level,
                content: tidy_textblock(content),
                align: heading.align,
            })
        }
        DocNode::Paragraph(para) => DocNode::Paragraph(Paragraph {
            content: tidy_textblock(para.content.clone()),
            align: para.align,
        }),
        DocNode::List(list) => DocNode::List(List {
            items: list.items.iter().map(tidy_item).collect(),
            kind: list.kind,
        }),
        DocNode::ListItem(item) => DocNode::ListItem(tidy_item(item)),
        DocNode::Blockquote(quote) => DocNode::Blockquote(Blockquote {
            children: quote.children.iter().map(tidy_block).collect(),
        }),
        DocNode::Document(doc) => DocNode::Document(tidy_document(doc)),
        other => other.clone(),
    }
}

fn tidy_item(item: &ListItem) -> ListItem {
    ListItem {
        checked: item.checked,
        children: item.children.iter().map(tidy_block).collect(),
    }
}

/// Leading and trailing whitespace of a block is insignificant in Markdown.
fn tidy_textblock(content: Vec<InlineContent>) -> Vec<InlineContent> {
    let mut content = tidy_inlines(content);
    take_leading(&mut content);
    take_trailing(&mut content);
    content
}

fn children_mut(inline: &mut InlineContent) -> Option<&mut Vec<InlineContent>> {
    match inline {
        InlineContent::Bold(children)
        | InlineContent::Italic(children)
        | InlineContent::Underline(children)
        | InlineContent::Strikethrough(children) => Some(children),
        InlineContent::Link(link) => Some(&mut link.children),
        _ => None,
    }
}

fn breaks_to_spaces(items: &mut [InlineContent]) {
    for item in items {
        if matches!(item, InlineContent::HardBreak) {
            *item = InlineContent::Text(" ".to_string());
        } else if let Some(children) = children_mut(item) {
            breaks_to_spaces(children);
        }
    }
}

fn tidy_inlines(items: Vec<InlineContent>) -> Vec<InlineContent> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item {
            InlineContent::Bold(children) => push_mark(&mut out, children, InlineContent::Bold),
            InlineContent::Italic(children) => {
                push_mark(&mut out, children, InlineContent::Italic)
            }
            InlineContent::Strikethrough(children) => {
                push_mark(&mut out, children, InlineContent::Strikethrough)
            }
            // Underline has no delimiters of its own.
            InlineContent::Underline(children) => {
                out.push(InlineContent::Underline(tidy_inlines(children)))
            }
            InlineContent::Link(mut link) => {
                link.children = tidy_inlines(std::mem::take(&mut link.children));
                out.push(InlineContent::Link(link));
            }
            other => out.push(other),
        }
    }
    out
}

fn push_mark(
    out: &mut Vec<InlineContent>,
    children: Vec<InlineContent>,
    wrap: fn(Vec<InlineContent>) -> InlineContent,
) {
    let mut inner = tidy_inlines(children);
    out.extend(take_leading(&mut inner));
    let trailing = take_trailing(&mut inner);

    if !inner.is_empty() {
        let kind = wrap(Vec::new());
        let touching = out
            .last()
            .is_some_and(|last| discriminant(last) == discriminant(&kind));
        if !touching {
            out.push(wrap(inner));
        } else if let Some(existing) = out.last_mut().and_then(children_mut) {
            let mut merged = std::mem::take(existing);
            merged.extend(inner);
            *existing = tidy_inlines(merged);
        }
    }
    out.extend(trailing);
}

/// Remove whitespace and hard breaks from the start of `items`, returning them in order.
fn take_leading(items: &mut Vec<InlineContent>) -> Vec<InlineContent> {
    let mut taken = Vec::new();
    while let Some(first) = items.first_mut() {
        match first {
            InlineContent::HardBreak => taken.push(items.remove(0)),
            InlineContent::Text(text) => {
                let cut = text.len() - text.trim_start().len();
                if cut > 0 {
                    taken.push(InlineContent::Text(text[..cut].to_string()));
                }
                if cut == text.len() {
                    items.remove(0);
                    continue;
                }
                text.drain(..cut);
                break;
            }
            InlineContent::Underline(children) => {
                taken.extend(take_leading(children));
                if children.is_empty() {
                    items.remove(0);
                    continue;
                }
                break;
            }
            _ => break,
        }
    }
    taken
}

/// Remove whitespace and hard breaks from the end of `items`, returning them in order.
fn take_trailing(items: &mut Vec<InlineContent>) -> Vec<InlineContent> {
    let mut taken = Vec::new();
    while let Some(last) = items.last_mut() {
        match last {
            InlineContent::HardBreak => taken.extend(items.pop()),
            InlineContent::Text(text) => {
                let kept = text.trim_end().len();
                if kept < text.len() {
                    taken.push(InlineContent::Text(text[kept..].to_string()));
                }
                if kept == 0 {
                    items.pop();
                    continue;
                }
                text.truncate(kept);
                break;
            }
            InlineContent::Underline(children) => {
                taken.extend(take_trailing(children).into_iter().rev());
                if children.is_empty() {
                    items.pop();
                    continue;
                }
                break;
            }
            _ => break,
        }
    }
    taken.reverse();
    taken
}

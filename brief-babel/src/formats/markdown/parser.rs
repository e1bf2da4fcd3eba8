//! Reads article Markdown into the IR.
//!
//! comrak parses CommonMark with the GFM extensions the blog uses. The resulting tree is
//! walked into events, and the events are folded into IR nodes.

use crate::common::flat_to_nested::events_to_tree;
use crate::error::FormatError;
use crate::ir::events::Event;
use crate::ir::nodes::{Document, Image, InlineContent, Link, ListKind};
use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};

pub fn parse_from_markdown(source: &str) -> Result<Document, FormatError> {
    let arena = Arena::new();
    let root = parse_document(&arena, source, &default_comrak_options());

    let mut events = vec![Event::StartDocument];
    collect_block_events(root.children(), &mut events);
    events.push(Event::EndDocument);
    Ok(events_to_tree(&events)?)
}

pub(super) fn default_comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options
}

fn collect_block_events<'a>(
    children: impl Iterator<Item = &'a AstNode<'a>>,
    events: &mut Vec<Event>,
) {
    for child in children {
        collect_events_from_node(child, events);
    }
}

/// Recursively collect events from a Comrak block node
fn collect_events_from_node<'a>(node: &'a AstNode<'a>, events: &mut Vec<Event>) {
    let node_data = node.data.borrow();

    match &node_data.value {
        NodeValue::Document => collect_block_events(node.children(), events),

        NodeValue::Heading(heading) => {
            events.push(Event::StartHeading {
                level: heading.level as usize,
                align: None,
            });
            for inline in inline_contents(node) {
                events.push(Event::Inline(inline));
            }
            events.push(Event::EndHeading);
        }

        NodeValue::Paragraph => {
            let content = inline_contents(node);
            // A paragraph holding nothing but an image is a block image
            if let [InlineContent::Image(image)] = content.as_slice() {
                events.push(Event::Image(image.clone()));
                return;
            }
            events.push(Event::StartParagraph { align: None });
            for inline in content {
                events.push(Event::Inline(inline));
            }
            events.push(Event::EndParagraph);
        }

        NodeValue::List(list) => {
            let is_task = node
                .children()
                .any(|item| matches!(item.data.borrow().value, NodeValue::TaskItem(_)));
            let kind = match list.list_type {
                ListType::Ordered => ListKind::Ordered,
                ListType::Bullet if is_task => ListKind::Task,
                ListType::Bullet => ListKind::Bullet,
            };
            events.push(Event::StartList { kind });
            for item in node.children() {
                let checked = match &item.data.borrow().value {
                    NodeValue::TaskItem(symbol) => Some(symbol.is_some()),
                    _ if kind == ListKind::Task => Some(false),
                    _ => None,
                };
                events.push(Event::StartListItem { checked });
                collect_block_events(item.children(), events);
                events.push(Event::EndListItem);
            }
            events.push(Event::EndList);
        }

        NodeValue::BlockQuote => {
            events.push(Event::StartBlockquote);
            collect_block_events(node.children(), events);
            events.push(Event::EndBlockquote);
        }

        NodeValue::CodeBlock(code_block) => {
            let language = code_block
                .info
                .split_whitespace()
                .next()
                .map(str::to_string);
            let literal = code_block
                .literal
                .strip_suffix('\n')
                .unwrap_or(&code_block.literal);

            events.push(Event::StartVerbatim(language));
            events.push(Event::Inline(InlineContent::Text(literal.to_string())));
            events.push(Event::EndVerbatim);
        }

        // Raw HTML blocks (including comrak's list separators) and thematic
        // breaks are outside the article vocabulary
        _ => {}
    }
}

/// Collect the inline children of a block node into IR inline content.
fn inline_contents<'a>(node: &'a AstNode<'a>) -> Vec<InlineContent> {
    let mut content = Vec::new();
    for child in node.children() {
        collect_inline_content(child, &mut content);
    }
    merge_adjacent_text(&mut content);
    content
}

fn collect_inline_content<'a>(node: &'a AstNode<'a>, content: &mut Vec<InlineContent>) {
    let node_data = node.data.borrow();

    match &node_data.value {
        NodeValue::Text(text) => content.push(InlineContent::Text(text.clone())),

        NodeValue::Strong => content.push(InlineContent::Bold(inline_contents(node))),

        NodeValue::Emph => content.push(InlineContent::Italic(inline_contents(node))),

        NodeValue::Strikethrough => {
            content.push(InlineContent::Strikethrough(inline_contents(node)))
        }

        NodeValue::Code(code) => content.push(InlineContent::Code(code.literal.clone())),

        NodeValue::Link(link) => content.push(InlineContent::Link(Link {
            href: link.url.clone(),
            title: non_empty(&link.title),
            children: inline_contents(node),
        })),

        NodeValue::Image(link) => content.push(InlineContent::Image(Image {
            src: link.url.clone(),
            alt: collect_text_from_children(node),
            title: non_empty(&link.title),
        })),

        NodeValue::LineBreak => content.push(InlineContent::HardBreak),

        NodeValue::SoftBreak => content.push(InlineContent::Text(" ".to_string())),

        // Inline HTML tags are dropped; the text between them survives as siblings
        NodeValue::HtmlInline(_) => {}

        _ => {
            for child in node.children() {
                collect_inline_content(child, content);
            }
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn collect_text_from_children<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    for child in node.children() {
        collect_text_content(child, &mut text);
    }
    text
}

fn collect_text_content<'a>(node: &'a AstNode<'a>, output: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(text) => output.push_str(text),
        NodeValue::Code(code) => output.push_str(&code.literal),
        NodeValue::SoftBreak | NodeValue::LineBreak => output.push(' '),
        _ => {
            for child in node.children() {
                collect_text_content(child, output);
            }
        }
    }
}

/// comrak splits text around delimiter runs it did not consume; join the pieces again.
fn merge_adjacent_text(content: &mut Vec<InlineContent>) {
    let mut merged: Vec<InlineContent> = Vec::with_capacity(content.len());
    for inline in content.drain(..) {
        if let InlineContent::Text(next) = &inline {
            if let Some(InlineContent::Text(prev)) = merged.last_mut() {
                prev.push_str(next);
                continue;
            }
        }
        merged.push(inline);
    }
    *content = merged;
}

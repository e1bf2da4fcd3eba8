//! HTML parsing (HTML → IR import)
//!
//! Converts editor HTML (or any reasonably structured HTML) into the IR.
//! Pipeline: HTML string → html5ever RcDom → Events → IR
//!
//! Parsing is permissive: html5ever repairs malformed markup, unknown elements are
//! transparent, and inline runs that sit directly in a block container are wrapped in
//! an implicit paragraph.

use crate::common::flat_to_nested::events_to_tree;
use crate::error::FormatError;
use crate::ir::events::Event;
use crate::ir::nodes::{Document, Image, InlineContent, Link, ListKind, TextAlign};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Parse an HTML string to an IR document
pub fn parse_from_html(source: &str) -> Result<Document, FormatError> {
    // Step 1: HTML string → DOM
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(source);

    // Step 2: DOM → Events
    let mut events = vec![Event::StartDocument];
    if let Some(body) = find_element(&dom.document, "body") {
        let children = body.children.borrow();
        collect_blocks(&children, &mut events);
    }
    events.push(Event::EndDocument);

    // Step 3: Events → IR
    Ok(events_to_tree(&events)?)
}

/// How an element participates in block layout
enum BlockRole {
    /// A block we map to an IR node
    Block,
    /// A container whose children are laid out as blocks in place
    Transparent,
    /// Content we never import
    Skip,
    /// Phrasing content
    Inline,
}

fn block_role(tag: &str) -> BlockRole {
    match tag {
        "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "ul" | "ol" | "blockquote" | "pre"
        | "hr" => BlockRole::Block,
        "div" | "section" | "article" | "main" | "header" | "footer" | "aside" | "nav"
        | "figure" | "figcaption" | "body" | "html" | "form" | "fieldset" | "details"
        | "summary" | "table" | "thead" | "tbody" | "tfoot" | "tr" | "td" | "th" | "dl"
        | "dt" | "dd" | "li" | "address" | "center" => BlockRole::Transparent,
        "head" | "script" | "style" | "template" | "noscript" | "title" | "meta" | "link" => {
            BlockRole::Skip
        }
        _ => BlockRole::Inline,
    }
}

fn find_element(node: &Handle, tag: &str) -> Option<Handle> {
    if element_name(node).as_deref() == Some(tag) {
        return Some(node.clone());
    }
    node.children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, tag))
}

fn element_name(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

fn attr(node: &Handle, key: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| &*a.name.local == key)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

fn node_align(node: &Handle) -> Option<TextAlign> {
    attr(node, "style")
        .and_then(|style| TextAlign::from_style(&style))
        .or_else(|| attr(node, "align").and_then(|a| TextAlign::from_css(&a)))
}

/// Lay out a sequence of sibling nodes as blocks.
fn collect_blocks(children: &[Handle], events: &mut Vec<Event>) {
    let mut pending: Vec<InlineContent> = Vec::new();

    for child in children {
        match &child.data {
            NodeData::Text { .. } => collect_inline(child, &mut pending),
            NodeData::Element { .. } => {
                let tag = element_name(child).unwrap_or_default();
                match block_role(&tag) {
                    BlockRole::Block => {
                        flush_implicit_paragraph(&mut pending, events);
                        emit_block(child, &tag, events);
                    }
                    BlockRole::Transparent => {
                        flush_implicit_paragraph(&mut pending, events);
                        let grandchildren = child.children.borrow();
                        collect_blocks(&grandchildren, events);
                    }
                    BlockRole::Skip => {}
                    BlockRole::Inline => {
                        if tag == "img" && is_blank(&pending) {
                            pending.clear();
                            if let Some(image) = image_from(child) {
                                events.push(Event::Image(image));
                            }
                        } else {
                            collect_inline(child, &mut pending);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    flush_implicit_paragraph(&mut pending, events);
}

fn flush_implicit_paragraph(pending: &mut Vec<InlineContent>, events: &mut Vec<Event>) {
    if is_blank(pending) {
        pending.clear();
        return;
    }
    let content = std::mem::take(pending);
    emit_paragraph(content, None, events);
}

fn is_blank(inlines: &[InlineContent]) -> bool {
    inlines.iter().all(|inline| match inline {
        InlineContent::Text(text) => text.trim().is_empty(),
        _ => false,
    })
}

/// Emit a paragraph, promoting a paragraph that only holds an image to a block image.
fn emit_paragraph(
    mut content: Vec<InlineContent>,
    align: Option<TextAlign>,
    events: &mut Vec<Event>,
) {
    normalize_whitespace(&mut content);
    if let [InlineContent::Image(image)] = content.as_slice() {
        events.push(Event::Image(image.clone()));
        return;
    }
    events.push(Event::StartParagraph { align });
    for inline in content {
        events.push(Event::Inline(inline));
    }
    events.push(Event::EndParagraph);
}

fn emit_block(node: &Handle, tag: &str, events: &mut Vec<Event>) {
    match tag {
        "p" => {
            let mut content = Vec::new();
            for child in node.children.borrow().iter() {
                collect_inline(child, &mut content);
            }
            emit_paragraph(content, node_align(node), events);
        }

        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = tag[1..].parse::<usize>().unwrap_or(1);
            let mut content = Vec::new();
            for child in node.children.borrow().iter() {
                collect_inline(child, &mut content);
            }
            normalize_whitespace(&mut content);
            events.push(Event::StartHeading {
                level,
                align: node_align(node),
            });
            for inline in content {
                events.push(Event::Inline(inline));
            }
            events.push(Event::EndHeading);
        }

        "ul" | "ol" => emit_list(node, tag, events),

        "blockquote" => {
            events.push(Event::StartBlockquote);
            let children = node.children.borrow();
            collect_blocks(&children, events);
            events.push(Event::EndBlockquote);
        }

        "pre" => {
            let code_child = node
                .children
                .borrow()
                .iter()
                .find(|c| element_name(c).as_deref() == Some("code"))
                .cloned();
            let language = code_child
                .as_ref()
                .and_then(language_from_class)
                .or_else(|| language_from_class(node))
                .or_else(|| attr(node, "data-language"));

            let mut content = String::new();
            collect_raw_text(node, &mut content);
            let content = content.strip_suffix('\n').unwrap_or(&content).to_string();

            events.push(Event::StartVerbatim(language));
            events.push(Event::Inline(InlineContent::Text(content)));
            events.push(Event::EndVerbatim);
        }

        // Horizontal rules are outside the article vocabulary
        _ => {}
    }
}

fn language_from_class(node: &Handle) -> Option<String> {
    attr(node, "class")?
        .split_whitespace()
        .find_map(|class| {
            class
                .strip_prefix("language-")
                .or_else(|| class.strip_prefix("lang-"))
        })
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
}

fn emit_list(node: &Handle, tag: &str, events: &mut Vec<Event>) {
    let children = node.children.borrow();
    let is_task = attr(node, "data-type").as_deref() == Some("taskList")
        || children.iter().any(|li| {
            attr(li, "data-type").as_deref() == Some("taskItem") || find_checkbox(li).is_some()
        });

    let kind = if tag == "ol" {
        ListKind::Ordered
    } else if is_task {
        ListKind::Task
    } else {
        ListKind::Bullet
    };

    events.push(Event::StartList { kind });
    for child in children.iter() {
        let checked = if kind == ListKind::Task {
            Some(task_checked(child))
        } else {
            None
        };
        match &child.data {
            NodeData::Element { .. } => {
                events.push(Event::StartListItem { checked });
                if element_name(child).as_deref() == Some("li") {
                    let item_children = child.children.borrow();
                    collect_blocks(&item_children, events);
                } else {
                    collect_blocks(std::slice::from_ref(child), events);
                }
                events.push(Event::EndListItem);
            }
            NodeData::Text { contents } if !contents.borrow().trim().is_empty() => {
                events.push(Event::StartListItem { checked });
                collect_blocks(std::slice::from_ref(child), events);
                events.push(Event::EndListItem);
            }
            _ => {}
        }
    }
    events.push(Event::EndList);
}

fn task_checked(li: &Handle) -> bool {
    if let Some(flag) = attr(li, "data-checked") {
        return flag == "true";
    }
    find_checkbox(li)
        .map(|input| attr(&input, "checked").is_some())
        .unwrap_or(false)
}

/// Find a checkbox among the leading descendants of a list item (not inside nested lists).
fn find_checkbox(node: &Handle) -> Option<Handle> {
    for child in node.children.borrow().iter() {
        match element_name(child).as_deref() {
            Some("input") if attr(child, "type").as_deref() == Some("checkbox") => {
                return Some(child.clone());
            }
            Some("ul") | Some("ol") => {}
            Some(_) => {
                if let Some(found) = find_checkbox(child) {
                    return Some(found);
                }
            }
            None => {}
        }
    }
    None
}

fn image_from(node: &Handle) -> Option<Image> {
    let src = attr(node, "src")?;
    Some(Image {
        src,
        alt: attr(node, "alt").unwrap_or_default(),
        title: attr(node, "title"),
    })
}

/// Collect phrasing content from a node into `out`.
fn collect_inline(node: &Handle, out: &mut Vec<InlineContent>) {
    match &node.data {
        NodeData::Text { contents } => {
            let collapsed = collapse_whitespace(&contents.borrow());
            if !collapsed.is_empty() {
                out.push(InlineContent::Text(collapsed));
            }
        }
        NodeData::Element { .. } => {
            let tag = element_name(node).unwrap_or_default();
            match tag.as_str() {
                "strong" | "b" => out.push(InlineContent::Bold(inline_children(node))),
                "em" | "i" => out.push(InlineContent::Italic(inline_children(node))),
                "u" | "ins" => out.push(InlineContent::Underline(inline_children(node))),
                "s" | "del" | "strike" => {
                    out.push(InlineContent::Strikethrough(inline_children(node)))
                }
                "code" | "kbd" | "samp" | "tt" => {
                    let mut text = String::new();
                    collect_raw_text(node, &mut text);
                    out.push(InlineContent::Code(collapse_whitespace(&text)));
                }
                "a" => match attr(node, "href") {
                    Some(href) => out.push(InlineContent::Link(Link {
                        href,
                        title: attr(node, "title"),
                        children: inline_children(node),
                    })),
                    None => out.extend(inline_children(node)),
                },
                "img" => {
                    if let Some(image) = image_from(node) {
                        out.push(InlineContent::Image(image));
                    }
                }
                "br" => out.push(InlineContent::HardBreak),
                "input" | "script" | "style" | "template" | "noscript" => {}
                _ => {
                    for child in node.children.borrow().iter() {
                        collect_inline(child, out);
                    }
                }
            }
        }
        _ => {}
    }
}

fn inline_children(node: &Handle) -> Vec<InlineContent> {
    let mut children = Vec::new();
    for child in node.children.borrow().iter() {
        collect_inline(child, &mut children);
    }
    children
}

fn collect_raw_text(node: &Handle, out: &mut String) {
    match &node.data {
        NodeData::Text { contents } => out.push_str(&contents.borrow()),
        NodeData::Element { .. } if element_name(node).as_deref() == Some("br") => {
            out.push('\n')
        }
        _ => {
            for child in node.children.borrow().iter() {
                collect_raw_text(child, out);
            }
        }
    }
}

fn is_html_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{000C}')
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if is_html_space(c) {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Collapse whitespace across inline boundaries and trim the block edges.
fn normalize_whitespace(content: &mut Vec<InlineContent>) {
    let mut prev_space = true;
    collapse_across(content, &mut prev_space);
    trim_end(content);
    prune_empty(content);
    merge_adjacent_text(content);
}

fn collapse_across(content: &mut [InlineContent], prev_space: &mut bool) {
    for inline in content.iter_mut() {
        match inline {
            InlineContent::Text(text) => {
                if *prev_space {
                    let trimmed = text.trim_start_matches(' ');
                    if trimmed.len() != text.len() {
                        *text = trimmed.to_string();
                    }
                }
                if !text.is_empty() {
                    *prev_space = text.ends_with(' ');
                }
            }
            InlineContent::Bold(children)
            | InlineContent::Italic(children)
            | InlineContent::Underline(children)
            | InlineContent::Strikethrough(children) => collapse_across(children, prev_space),
            InlineContent::Link(link) => collapse_across(&mut link.children, prev_space),
            InlineContent::HardBreak => *prev_space = true,
            InlineContent::Code(_) | InlineContent::Image(_) => *prev_space = false,
        }
    }
}

/// Trim trailing spaces off the last text leaf. Returns true once a non-space leaf is found.
fn trim_end(content: &mut [InlineContent]) -> bool {
    for inline in content.iter_mut().rev() {
        match inline {
            InlineContent::Text(text) => {
                let trimmed_len = text.trim_end_matches(' ').len();
                text.truncate(trimmed_len);
                if !text.is_empty() {
                    return true;
                }
            }
            InlineContent::Bold(children)
            | InlineContent::Italic(children)
            | InlineContent::Underline(children)
            | InlineContent::Strikethrough(children) => {
                if trim_end(children) {
                    return true;
                }
            }
            InlineContent::Link(link) => {
                if trim_end(&mut link.children) {
                    return true;
                }
            }
            InlineContent::HardBreak | InlineContent::Code(_) | InlineContent::Image(_) => {
                return true
            }
        }
    }
    false
}

fn prune_empty(content: &mut Vec<InlineContent>) {
    content.retain_mut(|inline| match inline {
        InlineContent::Text(text) => !text.is_empty(),
        InlineContent::Bold(children)
        | InlineContent::Italic(children)
        | InlineContent::Underline(children)
        | InlineContent::Strikethrough(children) => {
            prune_empty(children);
            !children.is_empty()
        }
        InlineContent::Link(link) => {
            prune_empty(&mut link.children);
            !link.children.is_empty()
        }
        InlineContent::Code(code) => !code.is_empty(),
        InlineContent::Image(_) | InlineContent::HardBreak => true,
    });
}

/// Sibling text nodes (from transparent wrappers) become one run.
fn merge_adjacent_text(content: &mut Vec<InlineContent>) {
    let mut merged: Vec<InlineContent> = Vec::with_capacity(content.len());
    for mut inline in content.drain(..) {
        match &mut inline {
            InlineContent::Bold(children)
            | InlineContent::Italic(children)
            | InlineContent::Underline(children)
            | InlineContent::Strikethrough(children) => merge_adjacent_text(children),
            InlineContent::Link(link) => merge_adjacent_text(&mut link.children),
            _ => {}
        }
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

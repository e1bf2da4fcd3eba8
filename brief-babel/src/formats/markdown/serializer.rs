//! Writes the Markdown twin stored next to article HTML.
//!
//! Output is CommonMark plus GFM strikethrough and task lists, printed by comrak from a
//! tree built out of IR events. Trailing whitespace is trimmed.

use super::parser::default_comrak_options;
use super::tidy::tidy_document;
use crate::common::nested_to_flat::tree_to_events;
use crate::error::FormatError;
use crate::ir::events::Event;
use crate::ir::nodes::{DocNode, Document, Image, InlineContent, Link, ListKind};
use comrak::nodes::{
    Ast, AstNode, ListDelimType, ListType, NodeCode, NodeCodeBlock, NodeHeading, NodeLink,
    NodeList, NodeValue,
};
use comrak::{format_commonmark, Arena, ComrakOptions};
use std::cell::RefCell;

pub fn serialize_to_markdown(doc: &Document) -> Result<String, FormatError> {
    let events = tree_to_events(&DocNode::Document(tidy_document(doc)));
    let arena = Arena::new();
    let root = build_comrak_ast(&arena, &events)?;

    let mut output = Vec::new();
    format_commonmark(root, &export_options(), &mut output).map_err(|e| {
        FormatError::SerializationError(format!("Comrak serialization failed: {e}"))
    })?;

    let markdown = String::from_utf8(output)
        .map_err(|e| FormatError::SerializationError(format!("UTF-8 conversion failed: {e}")))?;

    // comrak's "<!-- end list -->" separators stay: without them two adjacent
    // lists would merge into one on the next parse.
    Ok(markdown.trim_end().to_string())
}

/// Indented code would be read back as paragraph text inside list items.
fn export_options() -> ComrakOptions<'static> {
    let mut options = default_comrak_options();
    options.render.prefer_fenced = true;
    options
}

fn new_node<'a>(arena: &'a Arena<AstNode<'a>>, value: NodeValue) -> &'a AstNode<'a> {
    arena.alloc(AstNode::new(RefCell::new(Ast::new(value, (0, 0).into()))))
}

fn list_node(kind: ListKind) -> NodeList {
    NodeList {
        list_type: match kind {
            ListKind::Ordered => ListType::Ordered,
            ListKind::Bullet | ListKind::Task => ListType::Bullet,
        },
        marker_offset: 0,
        padding: 0,
        start: 1,
        delimiter: ListDelimType::Period,
        bullet_char: b'-',
        tight: true, // Use tight lists to avoid blank lines between items
    }
}

/// Grows a comrak tree from events. Comrak nodes link themselves, so only the open
/// blocks need tracking.
struct AstBuilder<'a> {
    arena: &'a Arena<AstNode<'a>>,
    root: &'a AstNode<'a>,
    cursor: &'a AstNode<'a>,
    ancestors: Vec<&'a AstNode<'a>>,
    lists: Vec<ListKind>,
    code: Option<(Option<String>, String)>,
}

impl<'a> AstBuilder<'a> {
    fn new(arena: &'a Arena<AstNode<'a>>) -> Self {
        let root = new_node(arena, NodeValue::Document);
        Self {
            arena,
            root,
            cursor: root,
            ancestors: Vec::new(),
            lists: Vec::new(),
            code: None,
        }
    }

    fn open(&mut self, value: NodeValue) {
        let node = new_node(self.arena, value);
        self.cursor.append(node);
        self.ancestors.push(self.cursor);
        self.cursor = node;
    }

    fn close(&mut self, what: &str) -> Result<(), FormatError> {
        self.cursor = self
            .ancestors
            .pop()
            .ok_or_else(|| FormatError::SerializationError(format!("Unbalanced {what} end")))?;
        Ok(())
    }

    fn flush_code(&mut self) {
        let Some((language, mut literal)) = self.code.take() else {
            return;
        };
        if !literal.ends_with('\n') {
            literal.push('\n');
        }
        self.cursor.append(new_node(
            self.arena,
            NodeValue::CodeBlock(NodeCodeBlock {
                fenced: true,
                fence_char: b'`',
                fence_length: 3,
                fence_offset: 0,
                info: language.unwrap_or_default(),
                literal,
            }),
        ));
    }

    fn push(&mut self, event: &Event) -> Result<(), FormatError> {
        match event {
            Event::StartDocument | Event::EndDocument => {}
            // Alignment has no Markdown form.
            Event::StartHeading { level, .. } => self.open(NodeValue::Heading(NodeHeading {
                level: (*level).clamp(1, 6) as u8,
                setext: false,
            })),
            Event::EndHeading => self.close("heading")?,
            Event::StartParagraph { .. } => self.open(NodeValue::Paragraph),
            Event::EndParagraph => {
                // An empty paragraph would print as a stray blank line.
                if self.cursor.first_child().is_none() {
                    self.cursor.detach();
                }
                self.close("paragraph")?;
            }
            Event::StartList { kind } => {
                self.open(NodeValue::List(list_node(*kind)));
                self.lists.push(*kind);
            }
            Event::EndList => {
                self.lists.pop();
                self.close("list")?;
            }
            Event::StartListItem { checked } => {
                let kind = self.lists.last().copied().unwrap_or(ListKind::Bullet);
                self.open(match (kind, checked) {
                    (ListKind::Task, Some(true)) => NodeValue::TaskItem(Some('x')),
                    (ListKind::Task, _) => NodeValue::TaskItem(None),
                    _ => NodeValue::Item(list_node(kind)),
                });
            }
            Event::EndListItem => self.close("list item")?,
            Event::StartBlockquote => self.open(NodeValue::BlockQuote),
            Event::EndBlockquote => self.close("blockquote")?,
            Event::StartVerbatim(language) => self.code = Some((language.clone(), String::new())),
            Event::EndVerbatim => self.flush_code(),
            // Block images sit alone in a paragraph.
            Event::Image(image) => {
                let para = new_node(self.arena, NodeValue::Paragraph);
                self.cursor.append(para);
                para.append(image_node(self.arena, image));
            }
            Event::Inline(inline) => match self.code.as_mut() {
                Some((_, literal)) => {
                    if let InlineContent::Text(line) = inline {
                        literal.push_str(line);
                    }
                }
                None => add_inline_to_node(self.arena, self.cursor, inline),
            },
        }
        Ok(())
    }

    fn finish(self) -> Result<&'a AstNode<'a>, FormatError> {
        if !self.ancestors.is_empty() {
            return Err(FormatError::SerializationError(format!(
                "{} unclosed blocks",
                self.ancestors.len()
            )));
        }
        Ok(self.root)
    }
}

fn build_comrak_ast<'a>(
    arena: &'a Arena<AstNode<'a>>,
    events: &[Event],
) -> Result<&'a AstNode<'a>, FormatError> {
    let mut builder = AstBuilder::new(arena);
    for event in events {
        builder.push(event)?;
    }
    builder.finish()
}

fn image_node<'a>(arena: &'a Arena<AstNode<'a>>, image: &Image) -> &'a AstNode<'a> {
    let node = new_node(
        arena,
        NodeValue::Image(NodeLink {
            url: image.src.clone(),
            title: image.title.clone().unwrap_or_default(),
        }),
    );
    node.append(new_node(arena, NodeValue::Text(image.alt.clone())));
    node
}

/// Written verbatim, bypassing comrak's escaping.
fn raw<'a>(arena: &'a Arena<AstNode<'a>>, markdown: &str) -> &'a AstNode<'a> {
    new_node(arena, NodeValue::HtmlInline(markdown.to_string()))
}

/// comrak leaves `~` unescaped, which would read back as strikethrough.
fn append_text<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, text: &str) {
    for (i, piece) in text.split('~').enumerate() {
        if i > 0 {
            parent.append(raw(arena, "\\~"));
        }
        if !piece.is_empty() {
            parent.append(new_node(arena, NodeValue::Text(piece.to_string())));
        }
    }
}

fn is_bare_url(link: &Link) -> bool {
    link.title.is_none()
        && (link.href.starts_with("https://") || link.href.starts_with("http://"))
        && matches!(link.children.as_slice(), [InlineContent::Text(text)] if *text == link.href)
}

fn add_inline_to_node<'a>(
    arena: &'a Arena<AstNode<'a>>,
    parent: &'a AstNode<'a>,
    inline: &InlineContent,
) {
    let wrap = |value: NodeValue, children: &[InlineContent]| {
        let node = new_node(arena, value);
        parent.append(node);
        for child in children {
            add_inline_to_node(arena, node, child);
        }
    };

    match inline {
        InlineContent::Text(text) => append_text(arena, parent, &text.replace('\n', " ")),
        InlineContent::Bold(children) => wrap(NodeValue::Strong, children),
        InlineContent::Italic(children) => wrap(NodeValue::Emph, children),
        // comrak prints single tildes for strikethrough.
        InlineContent::Strikethrough(children) => {
            parent.append(raw(arena, "~~"));
            for child in children {
                add_inline_to_node(arena, parent, child);
            }
            parent.append(raw(arena, "~~"));
        }
        // Markdown has no underline; keep the text
        InlineContent::Underline(children) => {
            for child in children {
                add_inline_to_node(arena, parent, child);
            }
        }
        InlineContent::Code(code) => {
            parent.append(new_node(
                arena,
                NodeValue::Code(NodeCode {
                    num_backticks: 1,
                    literal: code.clone(),
                }),
            ));
        }
        // Autolinked on the way back in.
        InlineContent::Link(link) if is_bare_url(link) => {
            append_text(arena, parent, &link.href)
        }
        InlineContent::Link(link) => wrap(
            NodeValue::Link(NodeLink {
                url: link.href.clone(),
                title: link.title.clone().unwrap_or_default(),
            }),
            &link.children,
        ),
        InlineContent::Image(image) => parent.append(image_node(arena, image)),
        InlineContent::HardBreak => parent.append(new_node(arena, NodeValue::LineBreak)),
    }
}

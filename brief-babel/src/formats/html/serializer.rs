//! Writes the canonical editor HTML fragment.
//!
//! The IR is flattened to events, the events grow an rcdom tree, and html5ever prints
//! the tree's children. No `<html>` or `<body>` is ever produced.

use crate::common::nested_to_flat::tree_to_events;
use crate::error::FormatError;
use crate::ir::events::Event;
use crate::ir::nodes::{DocNode, Document, Image, InlineContent, ListKind, TextAlign};
use html5ever::{
    ns, serialize, serialize::SerializeOpts, serialize::TraversalScope, Attribute, LocalName,
    QualName,
};
use markup5ever_rcdom::{Handle, Node, NodeData, SerializableHandle};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// `rel` attribute written on every link, matching what the editor emits.
pub const LINK_REL: &str = "noopener noreferrer nofollow";

pub fn serialize_to_html(doc: &Document) -> Result<String, FormatError> {
    let events = tree_to_events(&DocNode::Document(doc.clone()));
    let fragment = build_html_dom(&events)?;
    serialize_children(&fragment)
}

/// Builds the fragment under a detached `<div>` that is never serialized itself.
struct DomBuilder {
    root: Handle,
    cursor: Handle,
    ancestors: Vec<Handle>,
    /// Language and text of the code block being collected.
    code: Option<(Option<String>, String)>,
}

impl DomBuilder {
    fn new() -> Self {
        let root = create_element("div", vec![]);
        Self {
            cursor: root.clone(),
            root,
            ancestors: Vec::new(),
            code: None,
        }
    }

    fn append(&self, node: Handle) {
        self.cursor.children.borrow_mut().push(node);
    }

    fn open(&mut self, tag: &str, attrs: Vec<(&str, &str)>) {
        let element = create_element(tag, attrs);
        self.append(element.clone());
        let parent = std::mem::replace(&mut self.cursor, element);
        self.ancestors.push(parent);
    }

    fn close(&mut self, event: &Event) -> Result<(), FormatError> {
        self.cursor = self
            .ancestors
            .pop()
            .ok_or_else(|| FormatError::SerializationError(format!("Unbalanced {event:?}")))?;
        Ok(())
    }

    fn flush_code(&mut self) {
        let Some((language, text)) = self.code.take() else {
            return;
        };
        let class = language.map(|lang| format!("language-{lang}"));
        let code = create_element(
            "code",
            class.as_deref().map(|c| vec![("class", c)]).unwrap_or_default(),
        );
        code.children.borrow_mut().push(create_text(&text));
        let pre = create_element("pre", vec![]);
        pre.children.borrow_mut().push(code);
        self.append(pre);
    }

    fn push(&mut self, event: &Event) -> Result<(), FormatError> {
        match event {
            Event::StartDocument | Event::EndDocument => {}
            Event::StartHeading { level, align } => {
                let tag = format!("h{}", (*level).clamp(1, 6));
                let style = align_style(*align);
                self.open(&tag, style_attr(&style));
            }
            Event::StartParagraph { align } => {
                let style = align_style(*align);
                self.open("p", style_attr(&style));
            }
            Event::StartList { kind } => match kind {
                ListKind::Bullet => self.open("ul", vec![]),
                ListKind::Ordered => self.open("ol", vec![]),
                ListKind::Task => self.open("ul", vec![("data-type", "taskList")]),
            },
            Event::StartListItem { checked } => {
                let attrs = match checked {
                    Some(done) => vec![
                        ("data-type", "taskItem"),
                        ("data-checked", if *done { "true" } else { "false" }),
                    ],
                    None => vec![],
                };
                self.open("li", attrs);
            }
            Event::StartBlockquote => self.open("blockquote", vec![]),
            Event::EndHeading
            | Event::EndParagraph
            | Event::EndList
            | Event::EndListItem
            | Event::EndBlockquote => self.close(event)?,
            Event::StartVerbatim(language) => self.code = Some((language.clone(), String::new())),
            Event::EndVerbatim => self.flush_code(),
            Event::Image(image) => self.append(create_image(image)),
            Event::Inline(inline) => match self.code.as_mut() {
                Some((_, text)) => {
                    if let InlineContent::Text(line) = inline {
                        text.push_str(line);
                    }
                }
                None => add_inline_to_node(&self.cursor, inline)?,
            },
        }
        Ok(())
    }

    fn finish(self) -> Result<Handle, FormatError> {
        if !self.ancestors.is_empty() {
            return Err(FormatError::SerializationError(format!(
                "{} unclosed elements",
                self.ancestors.len()
            )));
        }
        Ok(self.root)
    }
}

fn build_html_dom(events: &[Event]) -> Result<Handle, FormatError> {
    let mut builder = DomBuilder::new();
    for event in events {
        builder.push(event)?;
    }
    builder.finish()
}

fn style_attr(style: &Option<String>) -> Vec<(&str, &str)> {
    style
        .as_deref()
        .map(|s| vec![("style", s)])
        .unwrap_or_default()
}

fn align_style(align: Option<TextAlign>) -> Option<String> {
    align.map(|a| format!("text-align: {}", a.as_css()))
}

/// Add inline content to an HTML node
fn add_inline_to_node(parent: &Handle, inline: &InlineContent) -> Result<(), FormatError> {
    match inline {
        InlineContent::Text(text) => {
            parent.children.borrow_mut().push(create_text(text));
        }

        InlineContent::Bold(children) => wrap_inlines(parent, "strong", vec![], children)?,
        InlineContent::Italic(children) => wrap_inlines(parent, "em", vec![], children)?,
        InlineContent::Underline(children) => wrap_inlines(parent, "u", vec![], children)?,
        InlineContent::Strikethrough(children) => wrap_inlines(parent, "s", vec![], children)?,

        InlineContent::Code(code_text) => {
            let code = create_element("code", vec![]);
            code.children.borrow_mut().push(create_text(code_text));
            parent.children.borrow_mut().push(code);
        }

        InlineContent::Link(link) => {
            let mut attrs = vec![("href", link.href.as_str())];
            if let Some(title) = &link.title {
                attrs.push(("title", title.as_str()));
            }
            attrs.push(("target", "_blank"));
            attrs.push(("rel", LINK_REL));
            wrap_inlines(parent, "a", attrs, &link.children)?;
        }

        InlineContent::Image(image) => {
            parent.children.borrow_mut().push(create_image(image));
        }

        InlineContent::HardBreak => {
            parent
                .children
                .borrow_mut()
                .push(create_element("br", vec![]));
        }
    }

    Ok(())
}

fn wrap_inlines(
    parent: &Handle,
    tag: &str,
    attrs: Vec<(&str, &str)>,
    children: &[InlineContent],
) -> Result<(), FormatError> {
    let element = create_element(tag, attrs);
    parent.children.borrow_mut().push(element.clone());
    for child in children {
        add_inline_to_node(&element, child)?;
    }
    Ok(())
}

fn create_image(image: &Image) -> Handle {
    let mut attrs = vec![("src", image.src.as_str()), ("alt", image.alt.as_str())];
    if let Some(title) = &image.title {
        attrs.push(("title", title.as_str()));
    }
    create_element("img", attrs)
}

fn create_element(tag: &str, attrs: Vec<(&str, &str)>) -> Handle {
    let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
    let attributes = attrs
        .into_iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string().into(),
        })
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: qual_name,
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.to_string().into()),
        },
    })
}

/// Print the fragment's children, leaving out the container.
fn serialize_children(container: &Handle) -> Result<String, FormatError> {
    let mut output = Vec::new();

    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };

    for child in container.children.borrow().iter() {
        let serializable = SerializableHandle::from(child.clone());
        serialize(&mut output, &serializable, opts.clone()).map_err(|e| {
            FormatError::SerializationError(format!("HTML serialization failed: {e}"))
        })?;
    }

    String::from_utf8(output)
        .map_err(|e| FormatError::SerializationError(format!("UTF-8 conversion failed: {e}")))
}

//! Flattens the IR into the event stream serializers consume.
//!
//! A pre-order walk: each container writes its `Start*` event, its children or inline
//! content, then its `End*` event. [`crate::common::flat_to_nested`] undoes it.

use crate::ir::events::Event;
use crate::ir::nodes::{DocNode, InlineContent, ListItem};

pub fn tree_to_events(root: &DocNode) -> Vec<Event> {
    let mut out = Vec::new();
    root.flatten_into(&mut out);
    out
}

trait Flatten {
    fn flatten_into(&self, out: &mut Vec<Event>);
}

impl Flatten for [DocNode] {
    fn flatten_into(&self, out: &mut Vec<Event>) {
        for node in self {
            node.flatten_into(out);
        }
    }
}

impl Flatten for ListItem {
    fn flatten_into(&self, out: &mut Vec<Event>) {
        out.push(Event::StartListItem {
            checked: self.checked,
        });
        self.children.flatten_into(out);
        out.push(Event::EndListItem);
    }
}

fn inlines(content: &[InlineContent], out: &mut Vec<Event>) {
    out.extend(content.iter().cloned().map(Event::Inline));
}

impl Flatten for DocNode {
    fn flatten_into(&self, out: &mut Vec<Event>) {
        match self {
            DocNode::Document(doc) => {
                out.push(Event::StartDocument);
                doc.children.flatten_into(out);
                out.push(Event::EndDocument);
            }
            DocNode::Heading(heading) => {
                out.push(Event::StartHeading {
                    level: heading.level,
                    align: heading.align,
                });
                inlines(&heading.content, out);
                out.push(Event::EndHeading);
            }
            DocNode::Paragraph(para) => {
                out.push(Event::StartParagraph { align: para.align });
                inlines(&para.content, out);
                out.push(Event::EndParagraph);
            }
            DocNode::List(list) => {
                out.push(Event::StartList { kind: list.kind });
                for item in &list.items {
                    item.flatten_into(out);
                }
                out.push(Event::EndList);
            }
            // An item outside a list still yields a balanced stream.
            DocNode::ListItem(item) => item.flatten_into(out),
            DocNode::Blockquote(quote) => {
                out.push(Event::StartBlockquote);
                quote.children.flatten_into(out);
                out.push(Event::EndBlockquote);
            }
            DocNode::Verbatim(code) => {
                out.push(Event::StartVerbatim(code.language.clone()));
                out.push(Event::Inline(InlineContent::Text(code.content.clone())));
                out.push(Event::EndVerbatim);
            }
            DocNode::Image(image) => out.push(Event::Image(image.clone())),
            DocNode::Inline(inline) => out.push(Event::Inline(inline.clone())),
        }
    }
}

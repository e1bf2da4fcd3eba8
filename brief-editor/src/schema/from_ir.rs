//! Conversion from the nested IR to the editor schema.
//!
//! Inline mark nesting is flattened: each text run records the full set of marks that
//! enclosed it.

use super::{Block, ImageAttrs, Inline, LinkMark, ListEntry, Marks, RichDocument, TaskEntry};
use brief_babel::ir::nodes::{DocNode, Document, Image, InlineContent, ListKind};

/// Build an editor document from an IR document.
pub fn from_ir_document(doc: &Document) -> RichDocument {
    RichDocument::from_blocks(convert_blocks(&doc.children))
}

fn convert_blocks(nodes: &[DocNode]) -> Vec<Block> {
    let mut blocks = Vec::new();
    for node in nodes {
        convert_node(node, &mut blocks);
    }
    blocks
}

fn convert_node(node: &DocNode, out: &mut Vec<Block>) {
    match node {
        DocNode::Document(doc) => out.extend(convert_blocks(&doc.children)),
        DocNode::Paragraph(p) => out.push(Block::Paragraph {
            align: p.align,
            content: flatten_inlines(&p.content),
        }),
        DocNode::Heading(h) => out.push(Block::Heading {
            level: h.level.min(u8::MAX as usize) as u8,
            align: h.align,
            content: flatten_inlines(&h.content),
        }),
        DocNode::List(list) => out.push(match list.kind {
            ListKind::Bullet => Block::BulletList(list_entries(&list.items)),
            ListKind::Ordered => Block::OrderedList(list_entries(&list.items)),
            ListKind::Task => Block::TaskList(
                list.items
                    .iter()
                    .map(|item| TaskEntry {
                        checked: item.checked.unwrap_or(false),
                        blocks: convert_blocks(&item.children),
                    })
                    .collect(),
            ),
        }),
        DocNode::ListItem(item) => out.extend(convert_blocks(&item.children)),
        DocNode::Blockquote(quote) => out.push(Block::Blockquote(convert_blocks(&quote.children))),
        DocNode::Verbatim(verbatim) => out.push(Block::CodeBlock {
            language: verbatim.language.clone(),
            content: vec![Inline::text(verbatim.content.clone())],
        }),
        DocNode::Image(image) => out.push(Block::Image(image_attrs(image))),
        DocNode::Inline(inline) => out.push(Block::paragraph(flatten_inlines(
            std::slice::from_ref(inline),
        ))),
    }
}

fn list_entries(items: &[brief_babel::ir::nodes::ListItem]) -> Vec<ListEntry> {
    items
        .iter()
        .map(|item| ListEntry {
            blocks: convert_blocks(&item.children),
        })
        .collect()
}

fn image_attrs(image: &Image) -> ImageAttrs {
    ImageAttrs {
        src: image.src.clone(),
        alt: image.alt.clone(),
        title: image.title.clone(),
    }
}

/// Flatten nested IR inlines into marked runs.
pub fn flatten_inlines(inlines: &[InlineContent]) -> Vec<Inline> {
    let mut out = Vec::new();
    flatten_into(inlines, &Marks::default(), &mut out);
    super::content::normalize(&mut out);
    out
}

fn flatten_into(inlines: &[InlineContent], marks: &Marks, out: &mut Vec<Inline>) {
    for inline in inlines {
        match inline {
            InlineContent::Text(text) => out.push(Inline::marked(text.clone(), marks.clone())),
            InlineContent::Bold(children) => {
                let marks = Marks {
                    bold: true,
                    ..marks.clone()
                };
                flatten_into(children, &marks, out);
            }
            InlineContent::Italic(children) => {
                let marks = Marks {
                    italic: true,
                    ..marks.clone()
                };
                flatten_into(children, &marks, out);
            }
            InlineContent::Underline(children) => {
                let marks = Marks {
                    underline: true,
                    ..marks.clone()
                };
                flatten_into(children, &marks, out);
            }
            InlineContent::Strikethrough(children) => {
                let marks = Marks {
                    strike: true,
                    ..marks.clone()
                };
                flatten_into(children, &marks, out);
            }
            InlineContent::Code(code) => {
                let marks = Marks {
                    code: true,
                    ..marks.clone()
                };
                out.push(Inline::marked(code.clone(), marks));
            }
            InlineContent::Link(link) => {
                let marks = Marks {
                    link: Some(LinkMark {
                        href: link.href.clone(),
                        title: link.title.clone(),
                    }),
                    ..marks.clone()
                };
                flatten_into(&link.children, &marks, out);
            }
            InlineContent::Image(image) => out.push(Inline::Image(image_attrs(image))),
            InlineContent::HardBreak => out.push(Inline::HardBreak),
        }
    }
}

//! Folds a flat [`Event`] stream back into a [`Document`].
//!
//! Parsers only ever emit events. Every `Start*` event opens a frame, content events land
//! in the innermost open frame, and the matching `End*` closes that frame and hands the
//! finished node to the frame underneath. When `EndDocument` arrives only the document
//! frame may be left.

use crate::ir::events::Event;
use crate::ir::nodes::*;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("end of {0} with nothing open")]
    StrayEnd(String),
    #[error("expected {expected}, found {found}")]
    Mismatched { expected: String, found: String },
    #[error("misplaced content: {0}")]
    MisplacedContent(String),
    #[error("events after the end of the document")]
    TrailingEvents,
    #[error("{0} block(s) never closed")]
    Unclosed(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Document,
    Heading,
    Paragraph,
    List,
    ListItem,
    Blockquote,
    Verbatim,
}

impl Kind {
    fn label(self) -> &'static str {
        match self {
            Kind::Document => "document",
            Kind::Heading => "heading",
            Kind::Paragraph => "paragraph",
            Kind::List => "list",
            Kind::ListItem => "list item",
            Kind::Blockquote => "blockquote",
            Kind::Verbatim => "code block",
        }
    }
}

/// An open container, built in place from the IR node it will become.
#[derive(Debug)]
enum Frame {
    Document(Document),
    Heading(Heading),
    Paragraph(Paragraph),
    List(List),
    ListItem(ListItem),
    Blockquote(Blockquote),
    Verbatim(Verbatim),
}

impl Frame {
    fn kind(&self) -> Kind {
        match self {
            Frame::Document(_) => Kind::Document,
            Frame::Heading(_) => Kind::Heading,
            Frame::Paragraph(_) => Kind::Paragraph,
            Frame::List(_) => Kind::List,
            Frame::ListItem(_) => Kind::ListItem,
            Frame::Blockquote(_) => Kind::Blockquote,
            Frame::Verbatim(_) => Kind::Verbatim,
        }
    }

    fn into_node(self) -> DocNode {
        match self {
            Frame::Document(doc) => DocNode::Document(doc),
            Frame::Heading(heading) => DocNode::Heading(heading),
            Frame::Paragraph(para) => DocNode::Paragraph(para),
            Frame::List(list) => DocNode::List(list),
            Frame::ListItem(item) => DocNode::ListItem(item),
            Frame::Blockquote(quote) => DocNode::Blockquote(quote),
            Frame::Verbatim(code) => DocNode::Verbatim(code),
        }
    }

    fn push_block(&mut self, node: DocNode) -> Result<(), ConversionError> {
        match self {
            Frame::Document(Document { children })
            | Frame::ListItem(ListItem { children, .. })
            | Frame::Blockquote(Blockquote { children }) => {
                children.push(node);
                Ok(())
            }
            Frame::List(list) => match node {
                DocNode::ListItem(item) => {
                    list.items.push(item);
                    Ok(())
                }
                other => Err(ConversionError::Mismatched {
                    expected: Kind::ListItem.label().to_string(),
                    found: format!("{other:?}"),
                }),
            },
            _ => Err(ConversionError::MisplacedContent(format!(
                "a {} cannot hold blocks",
                self.kind().label()
            ))),
        }
    }

    fn push_inline(&mut self, inline: InlineContent) -> Result<(), ConversionError> {
        match self {
            Frame::Heading(Heading { content, .. })
            | Frame::Paragraph(Paragraph { content, .. }) => {
                content.push(inline);
                Ok(())
            }
            // Code blocks arrive one line per text event.
            Frame::Verbatim(code) => match inline {
                InlineContent::Text(line) => {
                    if !code.content.is_empty() {
                        code.content.push('\n');
                    }
                    code.content.push_str(&line);
                    Ok(())
                }
                _ => Err(ConversionError::MisplacedContent(
                    "formatted text inside a code block".to_string(),
                )),
            },
            _ => Err(ConversionError::MisplacedContent(format!(
                "inline content directly inside a {}",
                self.kind().label()
            ))),
        }
    }
}

struct TreeBuilder {
    frames: Vec<Frame>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            frames: vec![Frame::Document(Document::default())],
        }
    }

    fn innermost(&mut self) -> Result<&mut Frame, ConversionError> {
        self.frames
            .last_mut()
            .ok_or_else(|| ConversionError::StrayEnd(Kind::Document.label().to_string()))
    }

    fn close(&mut self, kind: Kind) -> Result<(), ConversionError> {
        let frame = self
            .frames
            .pop()
            .ok_or_else(|| ConversionError::StrayEnd(kind.label().to_string()))?;
        if frame.kind() != kind {
            return Err(ConversionError::Mismatched {
                expected: kind.label().to_string(),
                found: frame.kind().label().to_string(),
            });
        }
        self.innermost()?.push_block(frame.into_node())
    }

    fn feed(&mut self, event: &Event) -> Result<(), ConversionError> {
        match event {
            Event::StartDocument | Event::EndDocument => Err(ConversionError::Mismatched {
                expected: "document content".to_string(),
                found: format!("{event:?}"),
            }),
            Event::StartHeading { level, align } => {
                self.frames.push(Frame::Heading(Heading {
                    level: *level,
                    content: Vec::new(),
                    align: *align,
                }));
                Ok(())
            }
            Event::StartParagraph { align } => {
                self.frames.push(Frame::Paragraph(Paragraph {
                    content: Vec::new(),
                    align: *align,
                }));
                Ok(())
            }
            Event::StartList { kind } => {
                self.frames.push(Frame::List(List {
                    items: Vec::new(),
                    kind: *kind,
                }));
                Ok(())
            }
            Event::StartListItem { checked } => {
                self.frames.push(Frame::ListItem(ListItem {
                    checked: *checked,
                    children: Vec::new(),
                }));
                Ok(())
            }
            Event::StartBlockquote => {
                self.frames
                    .push(Frame::Blockquote(Blockquote { children: Vec::new() }));
                Ok(())
            }
            Event::StartVerbatim(language) => {
                self.frames.push(Frame::Verbatim(Verbatim {
                    language: language.clone(),
                    content: String::new(),
                }));
                Ok(())
            }
            Event::EndHeading => self.close(Kind::Heading),
            Event::EndParagraph => self.close(Kind::Paragraph),
            Event::EndList => self.close(Kind::List),
            Event::EndListItem => self.close(Kind::ListItem),
            Event::EndBlockquote => self.close(Kind::Blockquote),
            Event::EndVerbatim => self.close(Kind::Verbatim),
            Event::Image(image) => self.innermost()?.push_block(DocNode::Image(image.clone())),
            Event::Inline(inline) => self.innermost()?.push_inline(inline.clone()),
        }
    }

    fn finish(mut self) -> Result<Document, ConversionError> {
        if self.frames.len() > 1 {
            return Err(ConversionError::Unclosed(self.frames.len() - 1));
        }
        match self.frames.pop() {
            Some(Frame::Document(doc)) => Ok(doc),
            Some(other) => Err(ConversionError::Mismatched {
                expected: Kind::Document.label().to_string(),
                found: other.kind().label().to_string(),
            }),
            None => Err(ConversionError::StrayEnd(Kind::Document.label().to_string())),
        }
    }
}

/// Rebuild the tree for a complete event stream. An empty stream is an empty document.
pub fn events_to_tree(events: &[Event]) -> Result<Document, ConversionError> {
    let mut events = events.iter();
    match events.next() {
        None => return Ok(Document::default()),
        Some(Event::StartDocument) => {}
        Some(other) => {
            return Err(ConversionError::Mismatched {
                expected: "StartDocument".to_string(),
                found: format!("{other:?}"),
            })
        }
    }

    let mut builder = TreeBuilder::new();
    while let Some(event) = events.next() {
        if *event == Event::EndDocument {
            let doc = builder.finish()?;
            if !events.as_slice().is_empty() {
                return Err(ConversionError::TrailingEvents);
            }
            return Ok(doc);
        }
        builder.feed(event)?;
    }
    Err(ConversionError::Unclosed(builder.frames.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Event {
        Event::Inline(InlineContent::Text(value.to_string()))
    }

    #[test]
    fn nothing_in_nothing_out() {
        assert_eq!(events_to_tree(&[]).unwrap(), Document::default());
    }

    #[test]
    fn quoted_list_nests() {
        let events = vec![
            Event::StartDocument,
            Event::StartBlockquote,
            Event::StartList {
                kind: ListKind::Bullet,
            },
            Event::StartListItem { checked: None },
            Event::StartParagraph { align: None },
            text("retainer"),
            Event::EndParagraph,
            Event::EndListItem,
            Event::EndList,
            Event::EndBlockquote,
            Event::EndDocument,
        ];
        let doc = events_to_tree(&events).unwrap();
        let DocNode::Blockquote(quote) = &doc.children[0] else {
            panic!("expected a blockquote, got {:?}", doc.children);
        };
        let DocNode::List(list) = &quote.children[0] else {
            panic!("expected a list, got {:?}", quote.children);
        };
        assert_eq!(list.items.len(), 1);
        assert_eq!(
            list.items[0].children,
            vec![DocNode::Paragraph(Paragraph {
                content: vec![InlineContent::Text("retainer".to_string())],
                align: None,
            })]
        );
    }

    #[test]
    fn code_lines_are_joined() {
        let events = vec![
            Event::StartDocument,
            Event::StartVerbatim(Some("rust".to_string())),
            text("let fee = 250;"),
            text("bill(fee);"),
            Event::EndVerbatim,
            Event::EndDocument,
        ];
        let doc = events_to_tree(&events).unwrap();
        assert_eq!(
            doc.children,
            vec![DocNode::Verbatim(Verbatim {
                language: Some("rust".to_string()),
                content: "let fee = 250;\nbill(fee);".to_string(),
            })]
        );
    }

    #[test]
    fn wrong_end_is_reported() {
        let events = vec![
            Event::StartDocument,
            Event::StartParagraph { align: None },
            Event::EndList,
            Event::EndDocument,
        ];
        assert_eq!(
            events_to_tree(&events),
            Err(ConversionError::Mismatched {
                expected: "list".to_string(),
                found: "paragraph".to_string(),
            })
        );
    }

    #[test]
    fn open_blocks_at_end_are_counted() {
        let events = vec![
            Event::StartDocument,
            Event::StartBlockquote,
            Event::EndDocument,
        ];
        assert_eq!(events_to_tree(&events), Err(ConversionError::Unclosed(1)));
    }

    #[test]
    fn loose_text_is_rejected() {
        let events = vec![Event::StartDocument, text("loose"), Event::EndDocument];
        assert!(matches!(
            events_to_tree(&events),
            Err(ConversionError::MisplacedContent(_))
        ));
    }

    #[test]
    fn nothing_may_follow_the_end() {
        let events = vec![Event::StartDocument, Event::EndDocument, Event::EndDocument];
        assert_eq!(events_to_tree(&events), Err(ConversionError::TrailingEvents));
    }
}

//! The flat form of the tree that parsers emit and serializers consume.

use crate::ir::nodes::{Image, InlineContent, ListKind, TextAlign};

/// Every container is bracketed by a `Start*` and `End*` pair. Code block text arrives
/// as `Inline(Text)` events between `StartVerbatim` and `EndVerbatim`.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    StartDocument,
    EndDocument,
    StartHeading {
        level: usize,
        align: Option<TextAlign>,
    },
    EndHeading,
    StartParagraph {
        align: Option<TextAlign>,
    },
    EndParagraph,
    StartList {
        kind: ListKind,
    },
    EndList,
    StartListItem {
        checked: Option<bool>,
    },
    EndListItem,
    StartBlockquote,
    EndBlockquote,
    StartVerbatim(Option<String>),
    EndVerbatim,
    Image(Image),
    Inline(InlineContent),
}

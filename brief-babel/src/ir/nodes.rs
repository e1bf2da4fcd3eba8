//! Nodes of the format-neutral article tree.

use serde::Serialize;

/// Any node of the tree. Serializes with a `type` tag for `brief inspect`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "node", rename_all = "snake_case")]
pub enum DocNode {
    Document(Document),
    Heading(Heading),
    Paragraph(Paragraph),
    List(List),
    ListItem(ListItem),
    Blockquote(Blockquote),
    Verbatim(Verbatim),
    Image(Image),
    Inline(InlineContent),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Document {
    pub children: Vec<DocNode>,
}

/// Headings are flat: article HTML never nests content under one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heading {
    pub level: usize,
    pub content: Vec<InlineContent>,
    pub align: Option<TextAlign>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paragraph {
    pub content: Vec<InlineContent>,
    pub align: Option<TextAlign>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct List {
    pub items: Vec<ListItem>,
    pub kind: ListKind,
}

/// Flavour of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Bullet,
    Ordered,
    Task,
}

/// `checked` is only set inside task lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    pub checked: Option<bool>,
    pub children: Vec<DocNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Blockquote {
    pub children: Vec<DocNode>,
}

/// A code block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verbatim {
    pub language: Option<String>,
    pub content: String,
}

/// Horizontal alignment carried by paragraphs and headings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    /// CSS keyword for this alignment.
    pub fn as_css(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Justify => "justify",
        }
    }

    /// Parse a CSS `text-align` keyword.
    pub fn from_css(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Some(TextAlign::Left),
            "center" => Some(TextAlign::Center),
            "right" | "end" => Some(TextAlign::Right),
            "justify" => Some(TextAlign::Justify),
            _ => None,
        }
    }

    /// Extract the alignment from an inline `style` attribute.
    pub fn from_style(style: &str) -> Option<Self> {
        style.split(';').find_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            if prop.trim().eq_ignore_ascii_case("text-align") {
                TextAlign::from_css(value)
            } else {
                None
            }
        })
    }
}

/// Text-level content. Marks nest by wrapping their children.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum InlineContent {
    Text(String),
    Bold(Vec<InlineContent>),
    Italic(Vec<InlineContent>),
    Underline(Vec<InlineContent>),
    Strikethrough(Vec<InlineContent>),
    Code(String),
    Link(Link),
    Image(Image),
    HardBreak,
}

/// A link around inline content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub href: String,
    pub title: Option<String>,
    pub children: Vec<InlineContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Image {
    pub src: String,
    pub alt: String,
    pub title: Option<String>,
}

impl InlineContent {
    /// Plain text of this inline, with images contributing their alt text.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            InlineContent::Text(text) | InlineContent::Code(text) => out.push_str(text),
            InlineContent::Bold(children)
            | InlineContent::Italic(children)
            | InlineContent::Underline(children)
            | InlineContent::Strikethrough(children) => {
                for child in children {
                    child.collect_text(out);
                }
            }
            InlineContent::Link(link) => {
                for child in &link.children {
                    child.collect_text(out);
                }
            }
            InlineContent::Image(image) => out.push_str(&image.alt),
            InlineContent::HardBreak => out.push('\n'),
        }
    }
}

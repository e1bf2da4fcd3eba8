//! Import tests for Markdown (Markdown → IR)

use brief_babel::format::Format;
use brief_babel::formats::markdown::MarkdownFormat;
use brief_babel::ir::nodes::*;

fn parse(md: &str) -> Document {
    MarkdownFormat.parse(md).expect("markdown should parse")
}

fn text(s: &str) -> InlineContent {
    InlineContent::Text(s.to_string())
}

#[test]
fn test_setext_heading_is_accepted() {
    let doc = parse("Title\n=====");
    assert_eq!(
        doc.children,
        vec![DocNode::Heading(Heading {
            level: 1,
            content: vec![text("Title")],
            align: None,
        })]
    );
}

#[test]
fn test_underscore_emphasis() {
    let doc = parse("__strong__ _em_");
    assert_eq!(
        doc.children,
        vec![DocNode::Paragraph(Paragraph {
            content: vec![
                InlineContent::Bold(vec![text("strong")]),
                text(" "),
                InlineContent::Italic(vec![text("em")]),
            ],
            align: None,
        })]
    );
}

#[test]
fn test_autolink() {
    let doc = parse("See https://firm.example for details");
    match &doc.children[0] {
        DocNode::Paragraph(p) => {
            assert!(p.content.iter().any(|inline| matches!(
                inline,
                InlineContent::Link(link) if link.href == "https://firm.example"
            )));
        }
        other => panic!("expected paragraph, got {other:?}"),
    }
}

#[test]
fn test_blockquote_with_list() {
    let doc = parse("> Note:\n>\n> - one\n> - two");
    match &doc.children[0] {
        DocNode::Blockquote(quote) => {
            assert_eq!(quote.children.len(), 2);
            assert!(matches!(&quote.children[1], DocNode::List(list) if list.items.len() == 2));
        }
        other => panic!("expected blockquote, got {other:?}"),
    }
}

#[test]
fn test_thematic_break_and_raw_html_are_dropped() {
    let doc = parse("before\n\n---\n\n<div>raw</div>\n\nafter");
    assert_eq!(doc.children.len(), 2);
}

#[test]
fn test_inline_html_keeps_text() {
    let doc = parse("a <u>b</u> c");
    assert_eq!(
        doc.children,
        vec![DocNode::Paragraph(Paragraph {
            content: vec![text("a b c")],
            align: None,
        })]
    );
}

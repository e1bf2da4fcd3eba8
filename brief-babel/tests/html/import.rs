//! Import tests for HTML (editor HTML → IR)

use brief_babel::format::Format;
use brief_babel::formats::html::HtmlFormat;
use brief_babel::ir::nodes::*;

fn parse(html: &str) -> Document {
    HtmlFormat.parse(html).expect("html should parse")
}

fn text(s: &str) -> InlineContent {
    InlineContent::Text(s.to_string())
}

#[test]
fn test_editor_article() {
    let html = concat!(
        r#"<h2 style="text-align: center">Know your rights</h2>"#,
        r#"<p>Call <a href="tel:555" target="_blank" rel="noopener noreferrer nofollow">us</a> today.</p>"#,
        r#"<ol><li><p>Stay calm</p></li><li><p>Take notes</p></li></ol>"#,
    );
    let doc = parse(html);

    assert_eq!(doc.children.len(), 3);
    assert_eq!(
        doc.children[0],
        DocNode::Heading(Heading {
            level: 2,
            content: vec![text("Know your rights")],
            align: Some(TextAlign::Center),
        })
    );
    assert_eq!(
        doc.children[1],
        DocNode::Paragraph(Paragraph {
            content: vec![
                text("Call "),
                InlineContent::Link(Link {
                    href: "tel:555".to_string(),
                    title: None,
                    children: vec![text("us")],
                }),
                text(" today."),
            ],
            align: None,
        })
    );
    match &doc.children[2] {
        DocNode::List(list) => {
            assert_eq!(list.kind, ListKind::Ordered);
            assert_eq!(list.items.len(), 2);
        }
        other => panic!("expected ordered list, got {other:?}"),
    }
}

#[test]
fn test_legacy_tags_are_accepted() {
    let doc = parse("<p><b>bold</b> <i>it</i> <strike>old</strike></p>");
    assert_eq!(
        doc.children,
        vec![DocNode::Paragraph(Paragraph {
            content: vec![
                InlineContent::Bold(vec![text("bold")]),
                text(" "),
                InlineContent::Italic(vec![text("it")]),
                text(" "),
                InlineContent::Strikethrough(vec![text("old")]),
            ],
            align: None,
        })]
    );
}

#[test]
fn test_unknown_wrappers_are_transparent() {
    let doc = parse(r#"<section><div><span class="x">Pasted</span> text</div></section>"#);
    assert_eq!(
        doc.children,
        vec![DocNode::Paragraph(Paragraph {
            content: vec![text("Pasted text")],
            align: None,
        })]
    );
}

#[test]
fn test_scripts_and_styles_are_dropped() {
    let doc = parse("<style>p{}</style><p>Safe</p><script>alert(1)</script>");
    assert_eq!(
        doc.children,
        vec![DocNode::Paragraph(Paragraph {
            content: vec![text("Safe")],
            align: None,
        })]
    );
}

#[test]
fn test_full_page_uses_body() {
    let doc = parse("<html><head><title>T</title></head><body><p>Body</p></body></html>");
    assert_eq!(doc.children.len(), 1);
}

#[test]
fn test_hard_break_swallows_following_space() {
    let doc = parse("<p>first \n<br>\n second</p>");
    assert_eq!(
        doc.children,
        vec![DocNode::Paragraph(Paragraph {
            content: vec![text("first "), InlineContent::HardBreak, text("second")],
            align: None,
        })]
    );
}

#[test]
fn test_inline_image_stays_inline() {
    let doc = parse(r#"<p>Logo <img src="/logo.svg" alt="Logo"> here</p>"#);
    match &doc.children[0] {
        DocNode::Paragraph(p) => {
            assert!(matches!(p.content[1], InlineContent::Image(_)));
        }
        other => panic!("expected paragraph, got {other:?}"),
    }
}

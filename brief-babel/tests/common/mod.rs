//! Tests for the flat <-> nested IR conversion.

use brief_babel::common::flat_to_nested::events_to_tree;
use brief_babel::common::nested_to_flat::tree_to_events;
use brief_babel::ir::events::Event;
use brief_babel::ir::nodes::*;

fn text(s: &str) -> InlineContent {
    InlineContent::Text(s.to_string())
}

fn para(content: Vec<InlineContent>) -> DocNode {
    DocNode::Paragraph(Paragraph {
        content,
        align: None,
    })
}

fn create_test_tree() -> Document {
    Document {
        children: vec![
            DocNode::Heading(Heading {
                level: 2,
                content: vec![text("Statute of limitations")],
                align: Some(TextAlign::Center),
            }),
            DocNode::List(List {
                kind: ListKind::Task,
                items: vec![
                    ListItem {
                        checked: Some(true),
                        children: vec![para(vec![text("Gather records")])],
                    },
                    ListItem {
                        checked: Some(false),
                        children: vec![
                            para(vec![text("File claim")]),
                            DocNode::List(List {
                                kind: ListKind::Bullet,
                                items: vec![ListItem {
                                    checked: None,
                                    children: vec![para(vec![text("Nested")])],
                                }],
                            }),
                        ],
                    },
                ],
            }),
            DocNode::Blockquote(Blockquote {
                children: vec![para(vec![
                    text("Final "),
                    InlineContent::Bold(vec![text("word")]),
                ])],
            }),
            DocNode::Verbatim(Verbatim {
                language: None,
                content: "line one\nline two".to_string(),
            }),
            DocNode::Image(Image {
                src: "/office.jpg".to_string(),
                alt: "Office".to_string(),
                title: None,
            }),
        ],
    }
}

#[test]
fn test_round_trip_conversion() {
    let original = create_test_tree();

    let events = tree_to_events(&DocNode::Document(original.clone()));
    let rebuilt = events_to_tree(&events).expect("events should rebuild");

    assert_eq!(rebuilt, original);
}

#[test]
fn test_event_stream_is_balanced() {
    let events = tree_to_events(&DocNode::Document(create_test_tree()));

    assert_eq!(events.first(), Some(&Event::StartDocument));
    assert_eq!(events.last(), Some(&Event::EndDocument));

    let opens = events
        .iter()
        .filter(|e| {
            matches!(
                e,
                Event::StartHeading { .. }
                    | Event::StartParagraph { .. }
                    | Event::StartList { .. }
                    | Event::StartListItem { .. }
                    | Event::StartBlockquote
                    | Event::StartVerbatim(_)
            )
        })
        .count();
    let closes = events
        .iter()
        .filter(|e| {
            matches!(
                e,
                Event::EndHeading
                    | Event::EndParagraph
                    | Event::EndList
                    | Event::EndListItem
                    | Event::EndBlockquote
                    | Event::EndVerbatim
            )
        })
        .count();
    assert_eq!(opens, closes);
}

#[test]
fn test_mismatched_end_is_rejected() {
    let events = vec![
        Event::StartDocument,
        Event::StartParagraph { align: None },
        Event::EndList,
        Event::EndDocument,
    ];
    assert!(events_to_tree(&events).is_err());
}

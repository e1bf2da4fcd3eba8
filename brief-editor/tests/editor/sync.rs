use brief_editor::engine::EditorCommand;
use brief_editor::schema::MarkKind;
use brief_editor::{
    ContentMode, ContentValue, DualRepresentation, EditorOptions, EditorProps, RichTextEditor,
    Selection,
};
use std::cell::RefCell;
use std::rc::Rc;

type Emissions = Rc<RefCell<Vec<DualRepresentation>>>;

fn mounted(value: Option<ContentValue>, mode: Option<ContentMode>) -> (RichTextEditor, Emissions) {
    let emissions: Emissions = Rc::default();
    let sink = Rc::clone(&emissions);
    let mut editor = RichTextEditor::new(
        EditorProps {
            value,
            on_change: Some(Box::new(move |dual| sink.borrow_mut().push(dual))),
            initial_content_mode: mode,
            ..EditorProps::default()
        },
        EditorOptions::default(),
    );
    editor.mount();
    (editor, emissions)
}

#[test]
fn markdown_initial_value_in_markdown_mode() {
    let (mut editor, emissions) = mounted(
        Some(ContentValue::markdown("# Hi")),
        Some(ContentMode::Markdown),
    );
    assert_eq!(editor.html().as_deref(), Some("<h1>Hi</h1>"));
    assert!(emissions.borrow().is_empty());

    editor.set_selection(Selection::caret(0, 2));
    editor.execute(EditorCommand::InsertText("!".to_string()));

    let emissions = emissions.borrow();
    assert_eq!(emissions.len(), 1);
    assert_eq!(emissions[0].html, "<h1>Hi!</h1>");
    assert!(emissions[0].markdown.contains("# Hi"));
    assert_eq!(emissions[0].markdown, "# Hi!");
}

#[test]
fn unchanged_commands_do_not_emit() {
    let (mut editor, emissions) = mounted(Some(ContentValue::html("<p>text</p>")), None);
    editor.set_selection(Selection::caret(0, 2));
    assert!(!editor.execute(EditorCommand::ToggleMark(MarkKind::Bold)));
    assert!(!editor.execute(EditorCommand::SetParagraph));
    assert!(!editor.execute(EditorCommand::Undo));
    assert!(emissions.borrow().is_empty());
}

#[test]
fn each_change_emits_once() {
    let (mut editor, emissions) = mounted(None, None);
    editor.execute(EditorCommand::InsertText("a".to_string()));
    editor.set_selection(Selection::range(0, 0, 1));
    editor.execute(EditorCommand::ToggleMark(MarkKind::Bold));
    editor.execute(EditorCommand::ToggleMark(MarkKind::Bold));

    let html: Vec<String> = emissions.borrow().iter().map(|d| d.html.clone()).collect();
    assert_eq!(
        html,
        vec!["<p>a</p>", "<p><strong>a</strong></p>", "<p>a</p>"]
    );
    for dual in emissions.borrow().iter() {
        assert_eq!(dual.markdown, brief_babel::to_markdown(&dual.html));
    }
}

#[test]
fn echoed_value_is_ignored() {
    let (mut editor, emissions) = mounted(None, None);
    editor.execute(EditorCommand::InsertText("draft".to_string()));
    editor.set_selection(Selection::caret(0, 3));

    let echoed = emissions.borrow()[0].clone();
    editor.set_value(ContentValue {
        html: Some(echoed.html),
        markdown: Some(echoed.markdown),
    });

    assert_eq!(editor.selection(), Some(Selection::caret(0, 3)));
    assert_eq!(emissions.borrow().len(), 1);
}

#[test]
fn equivalent_value_keeps_selection() {
    let (mut editor, _) = mounted(
        Some(ContentValue::markdown("Some **bold** text")),
        Some(ContentMode::Markdown),
    );
    editor.set_selection(Selection::range(0, 2, 6));

    // Same content, now given as the HTML the editor already shows
    editor.set_value(ContentValue::html("<p>Some <strong>bold</strong> text</p>"));
    assert_eq!(editor.selection(), Some(Selection::range(0, 2, 6)));
}

#[test]
fn new_external_value_replaces_without_emitting() {
    let (mut editor, emissions) = mounted(Some(ContentValue::html("<p>old</p>")), None);
    editor.set_value(ContentValue::html("<p><b>new</b></p>"));
    assert_eq!(editor.html().as_deref(), Some("<p><strong>new</strong></p>"));
    assert!(emissions.borrow().is_empty());

    // The same value again is not a change
    editor.set_selection(Selection::caret(0, 2));
    editor.set_value(ContentValue::html("<p><b>new</b></p>"));
    assert_eq!(editor.selection(), Some(Selection::caret(0, 2)));
}

#[test]
fn empty_value_after_edits_keeps_content() {
    let (mut editor, _) = mounted(None, None);
    editor.execute(EditorCommand::InsertText("kept".to_string()));
    editor.set_value(ContentValue::default());
    assert_eq!(editor.html().as_deref(), Some("<p>kept</p>"));
}

#[test]
fn remount_resets_watermark() {
    let (mut editor, emissions) = mounted(Some(ContentValue::html("<p>a</p>")), None);
    editor.unmount();
    assert!(!editor.execute(EditorCommand::InsertText("x".to_string())));
    editor.mount();
    assert_eq!(editor.html().as_deref(), Some("<p>a</p>"));
    editor.execute(EditorCommand::InsertText("b".to_string()));
    assert_eq!(emissions.borrow().len(), 1);
    assert_eq!(emissions.borrow()[0].html, "<p>ba</p>");
}

#[test]
fn italic_with_trailing_space_exports_valid_emphasis() {
    let (mut editor, emissions) = mounted(None, None);
    editor.execute(EditorCommand::InsertText("Note this".to_string()));
    editor.set_selection(Selection::range(0, 0, 5));
    editor.execute(EditorCommand::ToggleMark(MarkKind::Italic));

    let emissions = emissions.borrow();
    let last = emissions.last().unwrap();
    assert_eq!(last.html, "<p><em>Note </em>this</p>");
    assert_eq!(last.markdown, "*Note* this");
    assert_eq!(
        brief_babel::to_markdown(&brief_babel::to_html(&last.markdown)),
        last.markdown
    );
}

#[test]
fn heading_line_break_exports_on_one_line() {
    let (mut editor, emissions) = mounted(Some(ContentValue::html("<h2>Title</h2>")), None);
    editor.set_selection(Selection::caret(0, 5));
    editor.execute(EditorCommand::InsertHardBreak);
    editor.execute(EditorCommand::InsertText("Sub".to_string()));

    let emissions = emissions.borrow();
    let last = emissions.last().unwrap();
    assert_eq!(last.html, "<h2>Title<br>Sub</h2>");
    assert_eq!(last.markdown, "## Title Sub");
    assert_eq!(brief_babel::to_html(&last.markdown), "<h2>Title Sub</h2>");
}

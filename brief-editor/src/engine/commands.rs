//! Editing commands.
//!
//! Every command works on the textblock holding the selection. Structural commands
//! (lists and blockquotes) act on the top-level block around it.

use super::selection::Selection;
use crate::schema::{
    content, Block, ImageAttrs, Inline, LinkMark, ListEntry, MarkKind, Marks, RichDocument,
    TaskEntry, TextAlign, MAX_HEADING_LEVEL,
};

/// A command issued by the toolbar or the editable surface.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    /// Add or remove a mark over the selection. Does nothing for a caret.
    ToggleMark(MarkKind),
    SetParagraph,
    /// Turn the textblock into a heading of the given level, or back into a paragraph.
    ToggleHeading(u8),
    ToggleCodeBlock,
    ToggleBulletList,
    ToggleOrderedList,
    ToggleTaskList,
    ToggleBlockquote,
    /// `None` clears the alignment.
    SetAlign(Option<TextAlign>),
    ToggleTaskChecked,
    InsertText(String),
    InsertHardBreak,
    SplitBlock,
    /// Delete the selected range, or the character before a caret.
    DeleteSelection,
    /// Link the selection; a caret inside a link relinks the whole link.
    SetLink {
        href: String,
    },
    UnsetLink,
    InsertImage(ImageAttrs),
    Undo,
    Redo,
}

/// Apply a document command. History commands are handled by the caller.
pub(super) fn run(doc: &mut RichDocument, selection: &mut Selection, command: &EditorCommand) {
    let at = *selection;
    match command {
        EditorCommand::ToggleMark(kind) => toggle_mark(doc, at, *kind),
        EditorCommand::SetParagraph => retype(doc, at, set_paragraph),
        EditorCommand::ToggleHeading(level) => {
            let level = (*level).clamp(1, MAX_HEADING_LEVEL);
            retype(doc, at, |block| toggle_heading(block, level))
        }
        EditorCommand::ToggleCodeBlock => retype(doc, at, toggle_code_block),
        EditorCommand::ToggleBulletList => toggle_wrapper(doc, at, Wrapper::Bullet),
        EditorCommand::ToggleOrderedList => toggle_wrapper(doc, at, Wrapper::Ordered),
        EditorCommand::ToggleTaskList => toggle_wrapper(doc, at, Wrapper::Task),
        EditorCommand::ToggleBlockquote => toggle_wrapper(doc, at, Wrapper::Quote),
        EditorCommand::SetAlign(align) => set_align(doc, at, *align),
        EditorCommand::ToggleTaskChecked => toggle_task_checked(doc, at),
        EditorCommand::InsertText(text) => insert_text(doc, selection, text),
        EditorCommand::InsertHardBreak => insert_hard_break(doc, selection),
        EditorCommand::SplitBlock => split_block(doc, selection),
        EditorCommand::DeleteSelection => delete_selection(doc, selection),
        EditorCommand::SetLink { href } => set_link(doc, at, href),
        EditorCommand::UnsetLink => unset_link(doc, at),
        EditorCommand::InsertImage(attrs) => insert_image(doc, selection, attrs.clone()),
        EditorCommand::Undo | EditorCommand::Redo => {}
    }
}

/// Replace the content of the selected textblock with `f(is_code, content)`.
fn edit_content(
    doc: &mut RichDocument,
    at: Selection,
    f: impl FnOnce(bool, Vec<Inline>) -> Vec<Inline>,
) {
    let Some(block) = doc.textblock_mut(at.block) else {
        return;
    };
    let is_code = matches!(block, Block::CodeBlock { .. });
    if let Some(content) = block.content_mut() {
        let old = std::mem::take(content);
        *content = f(is_code, old);
    }
}

fn selected_content(doc: &RichDocument, at: Selection) -> Option<&Vec<Inline>> {
    doc.textblock(at.block).and_then(Block::content)
}

pub(super) fn mark_active(doc: &RichDocument, at: Selection, kind: MarkKind) -> bool {
    let Some(content) = selected_content(doc, at) else {
        return false;
    };
    if at.is_empty() {
        return at
            .from
            .checked_sub(1)
            .and_then(|pos| content::marks_at(content, pos))
            .is_some_and(|marks| marks.has(kind));
    }
    let marks = content::marks_in(content, at.from, at.to);
    !marks.is_empty() && marks.iter().all(|marks| marks.has(kind))
}

/// The link under the selection: at its start, or on either side of a caret.
pub(super) fn current_link(doc: &RichDocument, at: Selection) -> Option<LinkMark> {
    let content = selected_content(doc, at)?;
    let before = at.from.checked_sub(1).filter(|_| at.is_empty());
    before
        .into_iter()
        .chain(std::iter::once(at.from))
        .filter_map(|pos| content::marks_at(content, pos))
        .find_map(|marks| marks.link.clone())
}

fn toggle_mark(doc: &mut RichDocument, at: Selection, kind: MarkKind) {
    if at.is_empty() {
        return;
    }
    let active = mark_active(doc, at, kind);
    edit_content(doc, at, |is_code, content| {
        if is_code {
            return content;
        }
        content::map_marks(content, at.from, at.to, |marks| marks.set(kind, !active))
    });
}

fn retype(doc: &mut RichDocument, at: Selection, f: impl FnOnce(Block) -> Block) {
    let Some(slot) = doc.textblock_mut(at.block) else {
        return;
    };
    let block = std::mem::replace(slot, Block::empty_paragraph());
    *slot = f(block);
}

/// Code text back to inline runs: newlines become hard breaks.
fn code_to_inline(content: Vec<Inline>) -> Vec<Inline> {
    let text = content::plain_text(&content);
    let mut out = Vec::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push(Inline::HardBreak);
        }
        out.push(Inline::text(line));
    }
    content::normalize(&mut out);
    out
}

fn set_paragraph(block: Block) -> Block {
    match block {
        Block::Heading { align, content, .. } => Block::Paragraph { align, content },
        Block::CodeBlock { content, .. } => Block::paragraph(code_to_inline(content)),
        other => other,
    }
}

fn toggle_heading(block: Block, level: u8) -> Block {
    match block {
        Block::Heading {
            level: current,
            align,
            content,
        } if current == level => Block::Paragraph { align, content },
        Block::Heading { align, content, .. } | Block::Paragraph { align, content } => {
            Block::Heading {
                level,
                align,
                content,
            }
        }
        Block::CodeBlock { content, .. } => Block::Heading {
            level,
            align: None,
            content: code_to_inline(content),
        },
        other => other,
    }
}

fn toggle_code_block(block: Block) -> Block {
    match block {
        Block::CodeBlock { content, .. } => Block::paragraph(code_to_inline(content)),
        Block::Paragraph { content, .. } | Block::Heading { content, .. } => Block::CodeBlock {
            language: None,
            content: vec![Inline::text(content::plain_text(&content))],
        },
        other => other,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wrapper {
    Bullet,
    Ordered,
    Task,
    Quote,
}

fn wrapper_of(block: &Block) -> Option<Wrapper> {
    match block {
        Block::BulletList(_) => Some(Wrapper::Bullet),
        Block::OrderedList(_) => Some(Wrapper::Ordered),
        Block::TaskList(_) => Some(Wrapper::Task),
        Block::Blockquote(_) => Some(Wrapper::Quote),
        _ => None,
    }
}

/// Wrap the top-level block around the selection, unwrap it when it already is the
/// requested wrapper, or switch between list kinds.
fn toggle_wrapper(doc: &mut RichDocument, at: Selection, wanted: Wrapper) {
    let Some(top) = doc.textblock_path(at.block).and_then(|path| path.first().copied()) else {
        return;
    };
    let Some(slot) = doc.blocks.get_mut(top) else {
        return;
    };
    let block = std::mem::replace(slot, Block::empty_paragraph());
    let replacement = match wrapper_of(&block) {
        Some(current) if current == wanted => unwrap_children(block),
        Some(current) if current != Wrapper::Quote && wanted != Wrapper::Quote => {
            vec![build_wrapper(wanted, entry_groups(block))]
        }
        _ => vec![build_wrapper(wanted, vec![vec![block]])],
    };
    doc.blocks.splice(top..=top, replacement);
}

fn entry_groups(block: Block) -> Vec<Vec<Block>> {
    match block {
        Block::BulletList(entries) | Block::OrderedList(entries) => {
            entries.into_iter().map(|entry| entry.blocks).collect()
        }
        Block::TaskList(entries) => entries.into_iter().map(|entry| entry.blocks).collect(),
        Block::Blockquote(children) => vec![children],
        other => vec![vec![other]],
    }
}

fn unwrap_children(block: Block) -> Vec<Block> {
    entry_groups(block).into_iter().flatten().collect()
}

fn build_wrapper(wrapper: Wrapper, groups: Vec<Vec<Block>>) -> Block {
    match wrapper {
        Wrapper::Bullet => Block::BulletList(list_entries(groups)),
        Wrapper::Ordered => Block::OrderedList(list_entries(groups)),
        Wrapper::Task => Block::TaskList(
            groups
                .into_iter()
                .map(|blocks| TaskEntry {
                    checked: false,
                    blocks,
                })
                .collect(),
        ),
        Wrapper::Quote => Block::Blockquote(groups.into_iter().flatten().collect()),
    }
}

fn list_entries(groups: Vec<Vec<Block>>) -> Vec<ListEntry> {
    groups
        .into_iter()
        .map(|blocks| ListEntry { blocks })
        .collect()
}

fn set_align(doc: &mut RichDocument, at: Selection, align: Option<TextAlign>) {
    if let Some(Block::Paragraph { align: current, .. } | Block::Heading { align: current, .. }) =
        doc.textblock_mut(at.block)
    {
        *current = align;
    }
}

fn toggle_task_checked(doc: &mut RichDocument, at: Selection) {
    let Some(path) = doc.textblock_path(at.block) else {
        return;
    };
    if let Some(entry) = doc.task_entry_mut(&path) {
        entry.checked = !entry.checked;
    }
}

/// Marks for typed text: those of the character before the caret. A link only
/// continues when the character after the selection carries the same link.
fn inherited_marks(content: &[Inline], from: usize, to: usize) -> Marks {
    let Some(previous) = from.checked_sub(1) else {
        let mut marks = content::marks_at(content, from)
            .cloned()
            .unwrap_or_default();
        marks.link = None;
        return marks;
    };
    let mut marks = content::marks_at(content, previous)
        .cloned()
        .unwrap_or_default();
    let next_link = content::marks_at(content, to).and_then(|m| m.link.as_ref());
    if marks.link.is_some() && next_link != marks.link.as_ref() {
        marks.link = None;
    }
    marks
}

fn text_runs(text: &str, marks: &Marks) -> Vec<Inline> {
    let mut out = Vec::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push(Inline::HardBreak);
        }
        if !line.is_empty() {
            out.push(Inline::marked(line, marks.clone()));
        }
    }
    out
}

fn insert_text(doc: &mut RichDocument, selection: &mut Selection, text: &str) {
    if text.is_empty() {
        return;
    }
    let at = *selection;
    let mut inserted = 0;
    edit_content(doc, at, |is_code, content| {
        let runs = if is_code {
            vec![Inline::text(text)]
        } else {
            text_runs(text, &inherited_marks(&content, at.from, at.to))
        };
        inserted = content::len(&runs);
        content::replace(content, at.from, at.to, runs)
    });
    *selection = Selection::caret(at.block, at.from + inserted);
}

fn insert_hard_break(doc: &mut RichDocument, selection: &mut Selection) {
    let at = *selection;
    edit_content(doc, at, |is_code, content| {
        let run = if is_code {
            Inline::text("\n")
        } else {
            Inline::HardBreak
        };
        content::replace(content, at.from, at.to, vec![run])
    });
    *selection = Selection::caret(at.block, at.from + 1);
}

fn split_block(doc: &mut RichDocument, selection: &mut Selection) {
    let at = *selection;
    let Some(path) = doc.textblock_path(at.block) else {
        return;
    };
    let Some((container, index)) = doc.container_mut(&path) else {
        return;
    };
    let Some(block) = container.get_mut(index) else {
        return;
    };

    // Enter inside code keeps typing in the same block
    if let Block::CodeBlock { content, .. } = block {
        let old = std::mem::take(content);
        *content = content::replace(old, at.from, at.to, vec![Inline::text("\n")]);
        *selection = Selection::caret(at.block, at.from + 1);
        return;
    }

    let align = block.align();
    let Some(content) = block.content_mut() else {
        return;
    };
    let (before, _, after) = content::slice(std::mem::take(content), at.from, at.to);
    *content = before;
    container.insert(
        index + 1,
        Block::Paragraph {
            align,
            content: after,
        },
    );
    *selection = Selection::caret(at.block + 1, 0);
}

fn delete_selection(doc: &mut RichDocument, selection: &mut Selection) {
    let at = *selection;
    let (from, to) = if at.is_empty() {
        match at.from.checked_sub(1) {
            Some(previous) => (previous, at.from),
            None => return,
        }
    } else {
        (at.from, at.to)
    };
    edit_content(doc, at, |_, content| {
        content::replace(content, from, to, Vec::new())
    });
    *selection = Selection::caret(at.block, from);
}

/// Range a link command applies to: the selection, or the link around a caret.
fn link_target(doc: &RichDocument, at: Selection) -> Option<(usize, usize)> {
    if !at.is_empty() {
        return Some((at.from, at.to));
    }
    let link = current_link(doc, at)?;
    content::link_range(selected_content(doc, at)?, at.from, &link.href)
}

fn set_link(doc: &mut RichDocument, at: Selection, href: &str) {
    let href = href.trim();
    if href.is_empty() {
        return unset_link(doc, at);
    }
    let Some((from, to)) = link_target(doc, at) else {
        return;
    };
    edit_content(doc, at, |is_code, content| {
        if is_code {
            return content;
        }
        content::map_marks(content, from, to, |marks| {
            marks.link = Some(LinkMark::new(href))
        })
    });
}

fn unset_link(doc: &mut RichDocument, at: Selection) {
    let Some((from, to)) = link_target(doc, at) else {
        return;
    };
    edit_content(doc, at, |_, content| {
        content::map_marks(content, from, to, |marks| marks.link = None)
    });
}

/// Insert a block image after the selected textblock, or in place of it when it is
/// an empty paragraph.
fn insert_image(doc: &mut RichDocument, selection: &mut Selection, attrs: ImageAttrs) {
    let Some(path) = doc.textblock_path(selection.block) else {
        return;
    };
    let Some((container, index)) = doc.container_mut(&path) else {
        return;
    };
    let replaces_empty = matches!(
        container.get(index),
        Some(Block::Paragraph { content, .. }) if content.is_empty()
    );
    if replaces_empty {
        if let Some(slot) = container.get_mut(index) {
            *slot = Block::Image(attrs);
        }
        *selection = Selection::caret(selection.block, 0);
    } else {
        container.insert(index + 1, Block::Image(attrs));
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::{DocumentEditor, EditorCommand, Selection};
    use crate::schema::{ImageAttrs, MarkKind, TextAlign};

    fn editor(html: &str) -> DocumentEditor {
        DocumentEditor::from_html(html, 100)
    }

    #[test]
    fn toggle_mark_on_range() {
        let mut ed = editor("<p>hello world</p>");
        ed.set_selection(Selection::range(0, 0, 5));
        assert!(ed.apply(EditorCommand::ToggleMark(MarkKind::Bold)));
        assert_eq!(ed.html(), "<p><strong>hello</strong> world</p>");
        assert!(ed.apply(EditorCommand::ToggleMark(MarkKind::Bold)));
        assert_eq!(ed.html(), "<p>hello world</p>");
    }

    #[test]
    fn toggle_mark_on_caret_does_nothing() {
        let mut ed = editor("<p>hello</p>");
        ed.set_selection(Selection::caret(0, 2));
        assert!(!ed.apply(EditorCommand::ToggleMark(MarkKind::Italic)));
    }

    #[test]
    fn partially_marked_range_becomes_fully_marked() {
        let mut ed = editor("<p><em>ab</em>cd</p>");
        ed.set_selection(Selection::range(0, 0, 4));
        ed.apply(EditorCommand::ToggleMark(MarkKind::Italic));
        assert_eq!(ed.html(), "<p><em>abcd</em></p>");
    }

    #[test]
    fn heading_toggles_back_to_paragraph() {
        let mut ed = editor(r#"<p style="text-align: center">Title</p>"#);
        ed.apply(EditorCommand::ToggleHeading(2));
        assert_eq!(ed.html(), r#"<h2 style="text-align: center">Title</h2>"#);
        ed.apply(EditorCommand::ToggleHeading(2));
        assert_eq!(ed.html(), r#"<p style="text-align: center">Title</p>"#);
    }

    #[test]
    fn heading_level_is_clamped() {
        let mut ed = editor("<p>x</p>");
        ed.apply(EditorCommand::ToggleHeading(6));
        assert_eq!(ed.html(), "<h4>x</h4>");
    }

    #[test]
    fn code_block_round_trips_hard_breaks() {
        let mut ed = editor("<p><strong>a</strong><br>b</p>");
        ed.apply(EditorCommand::ToggleCodeBlock);
        assert_eq!(ed.html(), "<pre><code>a\nb</code></pre>");
        ed.apply(EditorCommand::SetParagraph);
        assert_eq!(ed.html(), "<p>a<br>b</p>");
    }

    #[test]
    fn bullet_list_wraps_and_unwraps() {
        let mut ed = editor("<p>item</p>");
        ed.apply(EditorCommand::ToggleBulletList);
        assert_eq!(ed.html(), "<ul><li><p>item</p></li></ul>");
        ed.apply(EditorCommand::ToggleBulletList);
        assert_eq!(ed.html(), "<p>item</p>");
    }

    #[test]
    fn list_kinds_convert_in_place() {
        let mut ed = editor("<ul><li><p>a</p></li><li><p>b</p></li></ul>");
        ed.apply(EditorCommand::ToggleOrderedList);
        assert_eq!(ed.html(), "<ol><li><p>a</p></li><li><p>b</p></li></ol>");
        ed.apply(EditorCommand::ToggleTaskList);
        assert_eq!(
            ed.html(),
            r#"<ul data-type="taskList"><li data-type="taskItem" data-checked="false"><p>a</p></li><li data-type="taskItem" data-checked="false"><p>b</p></li></ul>"#
        );
    }

    #[test]
    fn blockquote_wraps_a_list() {
        let mut ed = editor("<ul><li><p>a</p></li></ul>");
        ed.apply(EditorCommand::ToggleBlockquote);
        assert_eq!(ed.html(), "<blockquote><ul><li><p>a</p></li></ul></blockquote>");
    }

    #[test]
    fn task_checked_toggles() {
        let mut ed = editor(
            r#"<ul data-type="taskList"><li data-type="taskItem" data-checked="false"><p>a</p></li></ul>"#,
        );
        ed.apply(EditorCommand::ToggleTaskChecked);
        assert!(ed.html().contains(r#"data-checked="true""#));
    }

    #[test]
    fn task_checked_outside_task_list_does_nothing() {
        let mut ed = editor("<p>a</p>");
        assert!(!ed.apply(EditorCommand::ToggleTaskChecked));
    }

    #[test]
    fn align_applies_to_paragraphs() {
        let mut ed = editor("<p>a</p>");
        ed.apply(EditorCommand::SetAlign(Some(TextAlign::Justify)));
        assert_eq!(ed.html(), r#"<p style="text-align: justify">a</p>"#);
        ed.apply(EditorCommand::SetAlign(None));
        assert_eq!(ed.html(), "<p>a</p>");
    }

    #[test]
    fn typed_text_inherits_marks() {
        let mut ed = editor("<p><strong>bold</strong></p>");
        ed.set_selection(Selection::caret(0, 4));
        ed.apply(EditorCommand::InsertText("er".to_string()));
        assert_eq!(ed.html(), "<p><strong>bolder</strong></p>");
        assert_eq!(ed.selection(), Selection::caret(0, 6));
    }

    #[test]
    fn typing_after_a_link_does_not_extend_it() {
        let mut ed = editor(r#"<p><a href="/x">go</a></p>"#);
        ed.set_selection(Selection::caret(0, 2));
        ed.apply(EditorCommand::InsertText("!".to_string()));
        assert!(ed.html().ends_with("go</a>!</p>"));
    }

    #[test]
    fn split_creates_sibling_paragraph() {
        let mut ed = editor(r#"<h1 style="text-align: right">Headline</h1>"#);
        ed.set_selection(Selection::caret(0, 4));
        ed.apply(EditorCommand::SplitBlock);
        assert_eq!(
            ed.html(),
            r#"<h1 style="text-align: right">Head</h1><p style="text-align: right">line</p>"#
        );
        assert_eq!(ed.selection(), Selection::caret(1, 0));
    }

    #[test]
    fn split_inside_code_inserts_newline() {
        let mut ed = editor("<pre><code>ab</code></pre>");
        ed.set_selection(Selection::caret(0, 1));
        ed.apply(EditorCommand::SplitBlock);
        assert_eq!(ed.html(), "<pre><code>a\nb</code></pre>");
    }

    #[test]
    fn split_inside_list_entry_stays_in_entry() {
        let mut ed = editor("<ul><li><p>ab</p></li></ul>");
        ed.set_selection(Selection::caret(0, 1));
        ed.apply(EditorCommand::SplitBlock);
        assert_eq!(ed.html(), "<ul><li><p>a</p><p>b</p></li></ul>");
    }

    #[test]
    fn backspace_and_range_delete() {
        let mut ed = editor("<p>abcdef</p>");
        ed.set_selection(Selection::caret(0, 3));
        ed.apply(EditorCommand::DeleteSelection);
        assert_eq!(ed.html(), "<p>abdef</p>");
        ed.set_selection(Selection::range(0, 0, 2));
        ed.apply(EditorCommand::DeleteSelection);
        assert_eq!(ed.html(), "<p>def</p>");
        ed.set_selection(Selection::caret(0, 0));
        assert!(!ed.apply(EditorCommand::DeleteSelection));
    }

    #[test]
    fn set_link_on_caret_relinks_enclosing_link() {
        let mut ed = editor(r#"<p>see <a href="/old">our firm</a> today</p>"#);
        ed.set_selection(Selection::caret(0, 6));
        ed.apply(EditorCommand::SetLink {
            href: " /new ".to_string(),
        });
        assert!(ed.html().contains(r#"<a href="/new" target="_blank" rel="noopener noreferrer nofollow">our firm</a>"#));
    }

    #[test]
    fn set_link_on_caret_outside_link_does_nothing() {
        let mut ed = editor("<p>plain</p>");
        ed.set_selection(Selection::caret(0, 2));
        assert!(!ed.apply(EditorCommand::SetLink {
            href: "/x".to_string()
        }));
    }

    #[test]
    fn unset_link_removes_enclosing_link() {
        let mut ed = editor(r#"<p><a href="/x">linked</a></p>"#);
        ed.set_selection(Selection::caret(0, 3));
        ed.apply(EditorCommand::UnsetLink);
        assert_eq!(ed.html(), "<p>linked</p>");
    }

    #[test]
    fn image_replaces_empty_paragraph() {
        let mut ed = editor("");
        ed.apply(EditorCommand::InsertImage(ImageAttrs {
            src: "/a.png".to_string(),
            alt: "a.png".to_string(),
            title: None,
        }));
        assert_eq!(ed.html(), r#"<img src="/a.png" alt="a.png"><p></p>"#);
    }

    #[test]
    fn image_goes_after_non_empty_block() {
        let mut ed = editor("<p>text</p><p>more</p>");
        ed.apply(EditorCommand::InsertImage(ImageAttrs {
            src: "/a.png".to_string(),
            alt: String::new(),
            title: None,
        }));
        assert_eq!(ed.html(), r#"<p>text</p><img src="/a.png" alt=""><p>more</p>"#);
    }
}

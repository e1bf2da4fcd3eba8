//! Operations on a textblock's inline run list.
//!
//! Offsets are editor positions: one per character, one per hard break or image.

use super::{Inline, Marks};

/// Merge adjacent runs with equal marks and drop empty runs.
pub fn normalize(content: &mut Vec<Inline>) {
    let mut out: Vec<Inline> = Vec::with_capacity(content.len());
    for inline in content.drain(..) {
        if let Inline::Text { text, marks } = &inline {
            if text.is_empty() {
                continue;
            }
            if let Some(Inline::Text {
                text: prev,
                marks: prev_marks,
            }) = out.last_mut()
            {
                if prev_marks == marks {
                    prev.push_str(text);
                    continue;
                }
            }
        }
        out.push(inline);
    }
    *content = out;
}

pub fn len(content: &[Inline]) -> usize {
    content.iter().map(Inline::len).sum()
}

/// Text of the runs; hard breaks become newlines and images contribute nothing.
pub fn plain_text(content: &[Inline]) -> String {
    let mut out = String::new();
    for inline in content {
        match inline {
            Inline::Text { text, .. } => out.push_str(text),
            Inline::HardBreak => out.push('\n'),
            Inline::Image(_) => {}
        }
    }
    out
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Split the runs at `at`, returning everything before and everything after.
pub fn split(content: Vec<Inline>, at: usize) -> (Vec<Inline>, Vec<Inline>) {
    let mut before = Vec::new();
    let mut after = Vec::new();
    let mut pos = 0;
    for inline in content {
        let len = inline.len();
        if pos + len <= at {
            before.push(inline);
        } else if pos >= at {
            after.push(inline);
        } else if let Inline::Text { text, marks } = inline {
            let cut = byte_offset(&text, at - pos);
            before.push(Inline::marked(&text[..cut], marks.clone()));
            after.push(Inline::marked(&text[cut..], marks));
        }
        pos += len;
    }
    (before, after)
}

/// Split the runs into the parts before, inside and after `from..to`.
pub fn slice(content: Vec<Inline>, from: usize, to: usize) -> (Vec<Inline>, Vec<Inline>, Vec<Inline>) {
    let (before, rest) = split(content, from);
    let (middle, after) = split(rest, to.saturating_sub(from));
    (before, middle, after)
}

/// Marks of the text position at `offset`, if a text run covers it.
pub fn marks_at(content: &[Inline], offset: usize) -> Option<&Marks> {
    let mut pos = 0;
    for inline in content {
        let len = inline.len();
        if offset < pos + len {
            return inline.marks();
        }
        pos += len;
    }
    None
}

/// Marks of every text position in `from..to`.
pub fn marks_in(content: &[Inline], from: usize, to: usize) -> Vec<&Marks> {
    let mut out = Vec::new();
    let mut pos = 0;
    for inline in content {
        let len = inline.len();
        let start = pos.max(from);
        let end = (pos + len).min(to);
        if start < end {
            if let Some(marks) = inline.marks() {
                out.extend(std::iter::repeat(marks).take(end - start));
            }
        }
        pos += len;
    }
    out
}

/// Extent of the contiguous run of text carrying the link `href` around `offset`.
pub fn link_range(content: &[Inline], offset: usize, href: &str) -> Option<(usize, usize)> {
    let mut spans = Vec::new();
    let mut pos = 0;
    for inline in content {
        let len = inline.len();
        let linked = inline
            .marks()
            .and_then(|m| m.link.as_ref())
            .is_some_and(|link| link.href == href);
        spans.push((pos, pos + len, linked));
        pos += len;
    }

    let hit = spans
        .iter()
        .position(|&(start, end, linked)| linked && start <= offset && offset <= end)?;
    let mut first = hit;
    while first > 0 && spans[first - 1].2 {
        first -= 1;
    }
    let mut last = hit;
    while last + 1 < spans.len() && spans[last + 1].2 {
        last += 1;
    }
    Some((spans[first].0, spans[last].1))
}

/// Apply `f` to the marks of every text run inside `from..to`.
pub fn map_marks(
    content: Vec<Inline>,
    from: usize,
    to: usize,
    mut f: impl FnMut(&mut Marks),
) -> Vec<Inline> {
    let (mut out, middle, after) = slice(content, from, to);
    for mut inline in middle {
        if let Inline::Text { marks, .. } = &mut inline {
            f(marks);
        }
        out.push(inline);
    }
    out.extend(after);
    normalize(&mut out);
    out
}

/// Replace `from..to` with `insert`.
pub fn replace(content: Vec<Inline>, from: usize, to: usize, insert: Vec<Inline>) -> Vec<Inline> {
    let (mut out, _, after) = slice(content, from, to);
    out.extend(insert);
    out.extend(after);
    normalize(&mut out);
    out
}

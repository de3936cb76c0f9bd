//! Shared helpers for the unit tests.
//!
//! States are written with the selection inline: `|` is a caret, `<` and
//! `>` are the anchor and head of a selected range. A `>` with no open `<`
//! is plain text, so quotes can be written as usual.

use markdown_structedit_config::EditorConfig;

use crate::editing::{EditorState, Selection, SelectionRange};

/// Route `log` output through the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Build a state from text with inline selection markers.
pub fn state_with_caret(marked: &str) -> EditorState {
    init_logging();
    let mut text = String::with_capacity(marked.len());
    let mut ranges = Vec::new();
    let mut anchor = None;
    for c in marked.chars() {
        match (c, anchor) {
            ('|', _) => ranges.push(SelectionRange::cursor(text.len())),
            ('<', _) => anchor = Some(text.len()),
            ('>', Some(from)) => {
                ranges.push(SelectionRange::new(from, text.len()));
                anchor = None;
            }
            _ => text.push(c),
        }
    }
    EditorState::new(&text, Selection::new(ranges, 0), EditorConfig::default())
}

/// Write the state's text with its selection markers back in.
pub fn render(state: &EditorState) -> String {
    let mut marks: Vec<(usize, char)> = Vec::new();
    for range in state.selection().ranges() {
        if range.is_empty() {
            marks.push((range.head, '|'));
        } else {
            marks.push((range.anchor, '<'));
            marks.push((range.head, '>'));
        }
    }
    marks.sort_by_key(|(pos, _)| *pos);

    let text = state.text();
    let mut out = String::with_capacity(text.len() + marks.len());
    let mut last = 0;
    for (pos, mark) in marks {
        out.push_str(&text[last..pos]);
        out.push(mark);
        last = pos;
    }
    out.push_str(&text[last..]);
    out
}

#[test]
fn test_markers_round_trip() {
    for marked in ["a|b|c", "<He>llo", "> quote|", "|"] {
        assert_eq!(render(&state_with_caret(marked)), marked);
    }
}

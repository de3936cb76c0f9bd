//! Caret notation for integration tests: `|` is a caret, `<` and `>` the
//! anchor and head of a selected range. A `>` with no open `<` is text.

use markdown_structedit_config::EditorConfig;
use markdown_structedit_engine::{Editor, Selection, SelectionRange};

#[allow(dead_code)]
pub fn editor(marked: &str) -> Editor {
    editor_with_config(marked, EditorConfig::default())
}

#[allow(dead_code)]
pub fn editor_with_config(marked: &str, config: EditorConfig) -> Editor {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut text = String::new();
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
    let mut editor = Editor::new(&text, config);
    editor.set_selection(Selection::new(ranges, 0));
    editor
}

#[allow(dead_code)]
pub fn render(editor: &Editor) -> String {
    let mut marks: Vec<(usize, char)> = Vec::new();
    for range in editor.selection().ranges() {
        if range.is_empty() {
            marks.push((range.head, '|'));
        } else {
            marks.push((range.anchor, '<'));
            marks.push((range.head, '>'));
        }
    }
    marks.sort_by_key(|(pos, _)| *pos);

    let text = editor.text();
    let mut out = String::new();
    let mut last = 0;
    for (pos, mark) in marks {
        out.push_str(&text[last..pos]);
        out.push(mark);
        last = pos;
    }
    out.push_str(&text[last..]);
    out
}

use std::sync::OnceLock;

use regex::Regex;

use crate::editing::{ChangeSet, ChangeSpec, EditorState, Line, Selection, Transaction};

/// A run of one character at the start of a line, like `##` or `>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadingMark {
    Heading,
    Blockquote,
}

impl LeadingMark {
    pub fn mark(self) -> char {
        match self {
            LeadingMark::Heading => '#',
            LeadingMark::Blockquote => '>',
        }
    }

    /// Matches the marks and the spaces after them
    fn regex(self) -> &'static Regex {
        static HEADING: OnceLock<Regex> = OnceLock::new();
        static BLOCKQUOTE: OnceLock<Regex> = OnceLock::new();
        match self {
            LeadingMark::Heading => {
                HEADING.get_or_init(|| Regex::new(r"^(#+)( +)").expect("valid heading regex"))
            }
            LeadingMark::Blockquote => {
                BLOCKQUOTE.get_or_init(|| Regex::new(r"^(>+)( +)").expect("valid blockquote regex"))
            }
        }
    }
}

/// Every line touched by a selection range, each line once.
fn selected_lines(state: &EditorState) -> Vec<Line> {
    let doc = state.doc();
    let mut numbers: Vec<usize> = state
        .selection()
        .ranges()
        .iter()
        .flat_map(|range| doc.line_at(range.from()).number..=doc.line_at(range.to()).number)
        .collect();
    numbers.sort_unstable();
    numbers.dedup();
    numbers.into_iter().map(|n| doc.line(n)).collect()
}

/// Set the leading marks of every selected line to `level` marks.
///
/// When every line already has exactly `level` marks they are removed
/// instead. Lines at another level are resized, unmarked lines get the marks
/// and a space prepended. Empty lines are left alone unless they are the only
/// line, in which case the caret lands after the new marks.
pub fn toggle_line_leading_mark(state: &EditorState, mark: LeadingMark, level: usize) -> Transaction {
    let doc = state.doc();
    let regex = mark.regex();
    let lines = selected_lines(state);
    let marks = mark.mark().to_string().repeat(level);

    let remove_marks = lines.iter().all(|line| {
        regex
            .captures(&line.text)
            .is_some_and(|caps| caps[1].len() == level)
    });

    let mut changes = Vec::new();
    let mut cursor = None;
    for line in &lines {
        match regex.captures(&line.text) {
            Some(caps) if caps[1].len() == level => {
                if remove_marks {
                    changes.push(ChangeSpec::delete(line.from, line.from + caps[0].len()));
                }
            }
            Some(caps) => {
                changes.push(ChangeSpec::replace(
                    line.from,
                    line.from + caps[1].len(),
                    marks.clone(),
                ));
            }
            None if !line.text.is_empty() || lines.len() == 1 => {
                changes.push(ChangeSpec::insert(line.from, format!("{marks} ")));
                if line.text.is_empty() {
                    cursor = Some(line.from + marks.len() + 1);
                }
            }
            None => {}
        }
    }

    log::trace!("toggling {:?} level {level} on {} lines", mark, lines.len());
    match ChangeSet::new(changes, doc.len()) {
        Ok(changes) => Transaction::new(changes, cursor.map(Selection::cursor)),
        Err(err) => {
            log::warn!("leading mark toggle produced conflicting edits: {err}");
            Transaction::new(ChangeSet::empty(doc.len()), None)
        }
    }
}

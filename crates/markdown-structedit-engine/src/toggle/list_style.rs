use std::sync::OnceLock;

use regex::Regex;

use crate::editing::transaction::Assoc;
use crate::editing::{ChangeSet, ChangeSpec, EditorState, Line, Selection, SelectionRange, Transaction};

fn bullet_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^ *[-*+] ").expect("valid bullet regex"))
}

fn task_box_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^ *\[[ xX]\]").expect("valid task box regex"))
}

fn todo_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^ *- +\[[ xX]\] +").expect("valid todo regex"))
}

fn unchecked_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(- +\[) (\].*)").expect("valid unchecked todo regex"))
}

fn any_marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([-*+] +\[[ xX]\] +|[-*+] +|\d+[.)] +)").expect("valid list marker regex")
    })
}

/// Strip whatever list marker `text` starts with.
fn remove_list_markers(text: &str) -> &str {
    match any_marker_regex().find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}

/// The list styles the toggle switches between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// `- item`, `* item` or `+ item`
    Bullet,
    /// `1. item`
    Numbering,
    /// `- [ ] item` or `- [x] item`
    Todo,
}

impl ListKind {
    /// Length of this kind's marker at the start of `text`, for the line
    /// numbered `index` within its group.
    fn marker_len(self, text: &str, index: usize) -> Option<usize> {
        match self {
            ListKind::Bullet => {
                let marker = bullet_regex().find(text)?;
                let rest = &text[marker.end()..];
                if task_box_regex().is_match(rest) {
                    return None;
                }
                let spaces = rest.len() - rest.trim_start_matches(' ').len();
                Some(marker.end() + spaces)
            }
            ListKind::Numbering => {
                let indent = text.len() - text.trim_start_matches(' ').len();
                let prefix = format!("{}. ", index + 1);
                text[indent..]
                    .starts_with(&prefix)
                    .then(|| indent + prefix.len())
            }
            ListKind::Todo => todo_regex().find(text).map(|m| m.end()),
        }
    }

    fn create_mark(self, index: usize, suggested: Option<char>) -> String {
        match self {
            ListKind::Bullet => suggested.unwrap_or('-').to_string(),
            ListKind::Numbering => format!("{}.", index + 1),
            ListKind::Todo => "- [ ]".to_string(),
        }
    }

    /// Switch a marked line to another state of the same style instead of
    /// removing its marker. Only todos have one: unchecked becomes checked.
    fn toggle_mark(self, text: &str) -> Option<String> {
        match self {
            ListKind::Todo if unchecked_regex().is_match(text) => {
                Some(unchecked_regex().replace(text, "${1}x${2}").into_owned())
            }
            _ => None,
        }
    }
}

/// Where a group's selection ranges go after the edit.
enum GroupSelection {
    /// Select the whole replaced span
    Span,
    /// Shifted ranges, `None` where the shift left the line
    Shifted(Vec<Option<SelectionRange>>),
}

/// Lines covered by one or more overlapping selection ranges.
struct LineGroup {
    first: usize,
    last: usize,
    ranges: Vec<SelectionRange>,
}

fn line_groups(state: &EditorState) -> Vec<LineGroup> {
    let doc = state.doc();
    let mut groups: Vec<LineGroup> = Vec::new();
    for range in state.selection().ranges() {
        let first = doc.line_at(range.from()).number;
        let last = doc.line_at(range.to()).number;
        match groups.last_mut() {
            Some(group) if group.last >= first => {
                group.last = group.last.max(last);
                group.ranges.push(*range);
            }
            _ => groups.push(LineGroup {
                first,
                last,
                ranges: vec![*range],
            }),
        }
    }
    groups
}

/// Numbering index of each line, and whether the line is a skipped blank.
/// Blank lines only count as blank inside multi-line groups.
fn indices(lines: &[Line]) -> Vec<(usize, bool)> {
    let multi = lines.len() > 1;
    let mut skipped = 0;
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let empty = multi && line.text.is_empty();
            let index = i - skipped;
            if empty {
                skipped += 1;
            }
            (index, empty)
        })
        .collect()
}

/// Replacement text for a group, with how far each changed line moved.
fn restyle(lines: &[Line], kind: ListKind) -> (Vec<String>, Vec<i64>) {
    let slots = indices(lines);

    // First pass: work out what the group already looks like
    let mut remove_marks = true;
    let mut suggested = None;
    for (line, &(index, empty)) in lines.iter().zip(&slots) {
        match kind.marker_len(&line.text, index) {
            Some(len) => suggested = line.text[..len].trim_start().chars().next(),
            None if !empty => remove_marks = false,
            None => {}
        }
    }

    let mut updates = Vec::with_capacity(lines.len());
    let mut moved = Vec::new();
    for (line, &(index, _)) in lines.iter().zip(&slots) {
        let text = &line.text;
        let update = match kind.marker_len(text, index) {
            Some(len) if remove_marks => kind
                .toggle_mark(text)
                .unwrap_or_else(|| text[len..].to_string()),
            Some(_) => {
                updates.push(text.clone());
                continue;
            }
            None if !text.is_empty() || lines.len() == 1 => format!(
                "{} {}",
                kind.create_mark(index, suggested),
                remove_list_markers(text)
            ),
            None => {
                updates.push(text.clone());
                continue;
            }
        };
        moved.push(update.len() as i64 - text.len() as i64);
        updates.push(update);
    }
    (updates, moved)
}

/// Toggle a list style on every selected line.
///
/// Lines of one group lose their markers when all non-blank lines already
/// have this style; otherwise unmarked lines get a marker, replacing any
/// other list marker they had. Numbering counts only non-blank lines. A
/// multi-line group ends up fully selected, a single line keeps its
/// selection on the same text.
pub fn toggle_list_style(state: &EditorState, kind: ListKind) -> Transaction {
    let doc = state.doc();
    let br = doc.line_break();
    let groups = line_groups(state);

    let mut changes = Vec::with_capacity(groups.len());
    let mut selections = Vec::with_capacity(groups.len());
    let mut shift: i64 = 0;
    for group in &groups {
        let lines: Vec<Line> = (group.first..=group.last).map(|n| doc.line(n)).collect();
        let (updates, moved) = restyle(&lines, kind);
        let from = lines[0].from;
        let to = lines[lines.len() - 1].to;
        let insert = updates.join(br);

        let selection = if lines.len() == 1 {
            // Keep the selected text selected
            let start = from as i64 + shift;
            let end = start + insert.len() as i64;
            let first = moved.first().copied().unwrap_or(0);
            let total: i64 = moved.iter().sum();
            let ranges = group
                .ranges
                .iter()
                .map(|range| {
                    let anchor = range.from() as i64 + first + shift;
                    let head = range.to() as i64 + total + shift;
                    (anchor >= start && head <= end && anchor <= head)
                        .then(|| SelectionRange::new(anchor as usize, head as usize))
                })
                .collect();
            GroupSelection::Shifted(ranges)
        } else {
            GroupSelection::Span
        };
        selections.push(selection);

        shift += insert.len() as i64 - (to - from) as i64;
        changes.push(ChangeSpec::replace(from, to, insert));
    }

    let changes = match ChangeSet::new(changes, doc.len()) {
        Ok(changes) => changes,
        Err(err) => {
            log::warn!("list style toggle produced conflicting edits: {err}");
            return Transaction::new(ChangeSet::empty(doc.len()), None);
        }
    };

    let mut ranges = Vec::new();
    for (group, selection) in groups.iter().zip(selections) {
        match selection {
            GroupSelection::Shifted(shifted) => {
                for (range, moved) in group.ranges.iter().zip(shifted) {
                    ranges.push(moved.unwrap_or_else(|| range.map(&changes)));
                }
            }
            GroupSelection::Span => {
                let from = changes.map_pos(doc.line(group.first).from, Assoc::Before);
                let to = changes.map_pos(doc.line(group.last).to, Assoc::After);
                ranges.push(SelectionRange::new(from, to));
            }
        }
    }

    log::trace!("toggled {kind:?} on {} line groups", groups.len());
    let main = state.selection().main_index();
    Transaction::new(changes, Some(Selection::new(ranges, main)))
}

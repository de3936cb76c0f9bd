//! Enter: continue the list items and quotes around the caret on a new line.

use std::sync::OnceLock;

use regex::Regex;

use crate::editing::commands::{DeclineReason, Declined, RangeEdit, change_by_range};
use crate::editing::document::{count_column, text_from};
use crate::editing::{ChangeSet, ChangeSpec, EditorState, SelectionRange, Transaction};
use crate::markup::context::{get_context, normalize_indent};
use crate::markup::renumber::renumber_list;
use crate::markup::tree;

fn quote_tail_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r">\s*$").expect("valid quote tail regex"))
}

fn leading_markup_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\s\d.)\-+*>]*").expect("valid leading markup regex"))
}

fn has_non_space(text: &str) -> bool {
    text.chars().any(|c| !c.is_whitespace())
}

/// Split the line at each caret, repeating the surrounding list and quote
/// markup on the new line.
///
/// On an item that is still empty the markup is removed instead: the caret
/// moves out one nesting level, or out of the list entirely when the item
/// sits right after a blank line or is the first item. Empty quote lines
/// after another empty quote line end the quote.
///
/// Declines (so the caller can insert a plain newline) when any range is a
/// selection, a caret is outside Markdown or not after any markup.
pub fn insert_newline_continue_markup(state: &EditorState) -> Result<Transaction, Declined> {
    change_by_range(state, |range| continue_markup(state, range))
}

fn continue_markup(state: &EditorState, range: SelectionRange) -> Result<RangeEdit, DeclineReason> {
    if !range.is_empty() {
        return Err(DeclineReason::NotCaret);
    }
    let pos = range.head;
    if !state.is_markdown_at(pos) {
        return Err(DeclineReason::NotMarkdown);
    }

    let doc = state.doc();
    let line = doc.line_at(pos);
    let col = pos - line.from;
    let element = tree::resolve_inner(state.tree(), doc, pos);
    let mut context = get_context(&element, doc);
    while context.last().is_some_and(|frame| frame.from > col) {
        context.pop();
    }
    let Some(inner) = context.last() else {
        return Err(DeclineReason::NoContext);
    };
    if inner.marker_end() > col {
        return Err(DeclineReason::InsideMarkup);
    }

    let empty_line = !has_non_space(text_from(&line.text, inner.to));

    if let (Some(item), true) = (&inner.item, empty_line) {
        let list_start = inner
            .node
            .first_child()
            .map(|first| usize::from(first.text_range().end()));
        let first_item = list_start.is_some_and(|end| end >= pos);
        let after_blank = line.from > 0
            && !doc
                .line_at(line.from - 1)
                .text
                .contains(|c: char| !c.is_whitespace() && c != '>');

        if first_item || after_blank {
            // Move the caret out one level
            let next = context.len().checked_sub(2).map(|i| &context[i]);
            let (del_to, insert) = match next {
                Some(next) if next.item.is_some() => {
                    (line.from + next.from, next.marker(doc, 1))
                }
                Some(next) => (line.from + next.to, String::new()),
                None => (line.from, String::new()),
            };
            let del_to = del_to.min(pos);

            let mut changes = vec![ChangeSpec::replace(del_to, pos, insert.clone())];
            if inner.is_ordered() {
                renumber_list(item, doc, &mut changes, -2);
            }
            if let Some(next) = next {
                if let (true, Some(next_item)) = (next.is_ordered(), &next.item) {
                    renumber_list(next_item, doc, &mut changes, 0);
                }
            }
            log::debug!("leaving empty list item at {pos}");
            return Ok(RangeEdit {
                changes,
                range: SelectionRange::cursor(del_to + insert.len()),
            });
        }

        // Keep the list going with a blank line instead of a new marker
        let indent_len = line.text.len() - line.text.trim_start().len();
        let insert = format!("{}{}", doc.line_break(), &line.text[..indent_len]);
        let cursor = (pos + insert.len()).saturating_sub(line.to - line.from);
        return Ok(RangeEdit {
            changes: vec![ChangeSpec::replace(line.from, line.to, insert)],
            range: SelectionRange::cursor(cursor),
        });
    }

    if inner.is_quote() && empty_line && line.from > 0 {
        let prev = doc.line_at(line.from - 1);
        if let Some(tail) = quote_tail_regex().find(&prev.text) {
            if tail.start() == inner.from {
                // Second empty quote line: drop both
                let changes = ChangeSet::new(
                    vec![
                        ChangeSpec::delete(prev.from + tail.start(), prev.to),
                        ChangeSpec::delete(line.from + inner.from, line.to),
                    ],
                    doc.len(),
                )
                .map_err(|_| DeclineReason::ConflictingChanges)?;
                let range = range.map(&changes);
                log::debug!("closing quote at {pos}");
                return Ok(RangeEdit {
                    changes: changes.into_changes(),
                    range,
                });
            }
        }
    }

    let mut changes = Vec::new();
    if let (true, Some(item)) = (inner.is_ordered(), &inner.item) {
        renumber_list(item, doc, &mut changes, 0);
    }

    // A caret on a continuation line of an item only gets blank prefixes
    let continued = inner
        .item
        .as_ref()
        .is_some_and(|item| usize::from(item.text_range().start()) < line.from);
    let tab_size = state.config().tab_size;
    let mut prefix = String::new();
    let markup_len = leading_markup_regex()
        .find(&line.text)
        .map_or(0, |m| m.end());
    if !continued || markup_len >= inner.to {
        let last = context.len() - 1;
        for (i, frame) in context.iter().enumerate() {
            let part = if i == last && !continued {
                frame.marker(doc, 1)
            } else if i < last {
                let width = count_column(&line.text, tab_size, context[i + 1].from);
                frame.blank(Some(width.saturating_sub(prefix.len())), true)
            } else {
                frame.blank(None, true)
            };
            prefix.push_str(&part);
        }
    }

    // Trailing whitespace before the caret does not survive the split
    let from = line.from + line.text[..col].trim_end().len();
    let insert = format!(
        "{}{}",
        doc.line_break(),
        normalize_indent(&prefix, state.config())
    );
    let cursor = from + insert.len();
    changes.push(ChangeSpec::replace(from, pos, insert));

    Ok(RangeEdit {
        changes,
        range: SelectionRange::cursor(cursor),
    })
}

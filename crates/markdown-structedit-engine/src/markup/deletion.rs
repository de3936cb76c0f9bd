//! Backspace: remove container markup in front of the caret.

use markdown_structedit_syntax::{SyntaxKind, SyntaxNode};
use rowan::NodeOrToken;

use crate::editing::commands::{DeclineReason, Declined, RangeEdit, change_by_range};
use crate::editing::document::{count_column, slice_text};
use crate::editing::{ChangeSpec, EditorState, SelectionRange, Transaction};
use crate::markup::context::{ContextFrame, get_context, normalize_indent};
use crate::markup::tree;

fn has_non_space(text: &str) -> bool {
    text.chars().any(|c| !c.is_whitespace())
}

/// Remove one step of markup before each caret.
///
/// Extra whitespace after a marker goes first. Right after a list marker
/// the marker glyphs turn into indentation (so the content becomes a
/// continuation of the previous item); right after indentation or a quote
/// mark two characters are deleted. A line left blank by an emptied item's
/// marker loses two characters per press as well.
///
/// Declines when any range is a selection, a caret is outside Markdown or
/// not directly after markup.
pub fn delete_markup_backward(state: &EditorState) -> Result<Transaction, Declined> {
    change_by_range(state, |range| delete_markup(state, range))
}

/// The node to take the context from when deleting at `pos`.
///
/// Resolves like Enter does, then walks backwards over marks and into the
/// last item of lists ending at the caret, so a caret on a nested item's
/// line gets that item's context.
fn context_node_for_delete(state: &EditorState, pos: usize) -> Option<SyntaxNode> {
    let mut scan = pos;
    let mut node = match tree::resolve_inner(state.tree(), state.doc(), pos) {
        NodeOrToken::Token(token) => {
            if matches!(token.kind(), SyntaxKind::QUOTE_MARK | SyntaxKind::LIST_MARK) {
                scan = token.text_range().start().into();
            }
            token.parent()?
        }
        NodeOrToken::Node(node) => node,
    };

    while let Some(before) = tree::child_before(&node, scan) {
        match before {
            NodeOrToken::Token(mark)
                if matches!(mark.kind(), SyntaxKind::QUOTE_MARK | SyntaxKind::LIST_MARK) =>
            {
                scan = mark.text_range().start().into();
            }
            NodeOrToken::Node(list) if list.kind().is_list() => {
                let Some(last) = list.last_child() else {
                    break;
                };
                scan = last.text_range().end().into();
                node = last;
            }
            _ => break,
        }
    }
    Some(node)
}

fn delete_markup(state: &EditorState, range: SelectionRange) -> Result<RangeEdit, DeclineReason> {
    if !range.is_empty() {
        return Err(DeclineReason::NotCaret);
    }
    let pos = range.head;
    if !state.is_markdown_at(pos) {
        return Err(DeclineReason::NotMarkdown);
    }

    match delete_after_markup(state, pos) {
        Err(DeclineReason::NoContext | DeclineReason::NotAfterMarkup)
            if on_blanked_line(state, pos) =>
        {
            Ok(delete_pair(state, pos))
        }
        result => result,
    }
}

fn delete_after_markup(state: &EditorState, pos: usize) -> Result<RangeEdit, DeclineReason> {
    let doc = state.doc();
    let node = context_node_for_delete(state, pos).ok_or(DeclineReason::NoContext)?;
    let context = get_context(&NodeOrToken::Node(node), doc);
    let Some(inner) = context.last() else {
        return Err(DeclineReason::NoContext);
    };

    let line = doc.line_at(pos);
    let col = pos - line.from;
    let space_end = inner.marker_end() + usize::from(!inner.space_after.is_empty());

    // Surplus spaces after the marker
    if col > space_end && !has_non_space(slice_text(&line.text, space_end, col)) {
        return Ok(RangeEdit {
            changes: vec![ChangeSpec::delete(line.from + space_end, pos)],
            range: SelectionRange::cursor(line.from + space_end),
        });
    }

    if col == space_end {
        let item_from = inner
            .item
            .as_ref()
            .map(|item| usize::from(item.text_range().start()));
        let on_marker_line = match item_from {
            None => true,
            Some(item_from) => line.from <= item_from,
        };
        if on_marker_line || !has_non_space(slice_text(&line.text, 0, inner.to)) {
            let start = line.from + inner.from;
            if inner.item.is_some() && has_non_space(slice_text(&line.text, inner.from, inner.to)) {
                return Ok(blank_marker(state, &line.text, line.from, inner, start));
            }
            if start < pos {
                return Ok(delete_pair(state, pos));
            }
        }
    }

    Err(DeclineReason::NotAfterMarkup)
}

/// A line holding nothing but at least two columns of whitespace, as left by
/// blanking the marker of an empty item. It no longer parses as a list item.
fn on_blanked_line(state: &EditorState, pos: usize) -> bool {
    let line = state.doc().line_at(pos);
    pos - line.from >= 2 && !has_non_space(&line.text)
}

/// Delete the two characters before the caret, staying on its line.
fn delete_pair(state: &EditorState, pos: usize) -> RangeEdit {
    let doc = state.doc();
    let from = doc.chars_before(pos, 2).max(doc.line_at(pos).from);
    RangeEdit {
        changes: vec![ChangeSpec::delete(from, pos)],
        range: SelectionRange::cursor(from),
    }
}

/// Replace a list marker with the same width of spaces.
fn blank_marker(
    state: &EditorState,
    line_text: &str,
    line_from: usize,
    inner: &ContextFrame,
    start: usize,
) -> RangeEdit {
    let tab_size = state.config().tab_size;
    let width =
        count_column(line_text, tab_size, inner.to) - count_column(line_text, tab_size, inner.from);
    let mut insert = inner.blank(Some(width), true);
    if start == line_from {
        insert = normalize_indent(&insert, state.config());
    }
    log::debug!("blanking list marker at {start}");
    RangeEdit {
        changes: vec![ChangeSpec::replace(start, line_from + inner.to, insert.clone())],
        range: SelectionRange::cursor(start + insert.len()),
    }
}

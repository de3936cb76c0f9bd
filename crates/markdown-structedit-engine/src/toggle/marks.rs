use markdown_structedit_syntax::{SyntaxKind, SyntaxToken};
use rowan::TextRange;

use crate::editing::commands::{RangeEdit, change_by_range};
use crate::editing::{ChangeSet, ChangeSpec, EditorState, SelectionRange, Transaction};
use crate::markup::tree;

/// Inline markup wrapped around a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkPair {
    pub left: &'static str,
    pub right: &'static str,
    /// Node kind and mark token kind the parser produces for this markup
    pub node: Option<(SyntaxKind, SyntaxKind)>,
}

impl MarkPair {
    pub const BOLD: MarkPair = MarkPair::symmetric("**", SyntaxKind::STRONG, SyntaxKind::EMPHASIS_MARK);
    pub const ITALIC: MarkPair = MarkPair::symmetric("*", SyntaxKind::EMPHASIS, SyntaxKind::EMPHASIS_MARK);
    pub const STRIKETHROUGH: MarkPair = MarkPair::symmetric(
        "~~",
        SyntaxKind::STRIKETHROUGH,
        SyntaxKind::STRIKETHROUGH_MARK,
    );
    pub const INLINE_CODE: MarkPair = MarkPair::symmetric("`", SyntaxKind::CODE_SPAN, SyntaxKind::CODE_MARK);
    /// Math has no syntax node, it is only matched textually
    pub const INLINE_MATH: MarkPair = MarkPair {
        left: "$",
        right: "$",
        node: None,
    };

    const fn symmetric(mark: &'static str, node: SyntaxKind, token: SyntaxKind) -> Self {
        MarkPair {
            left: mark,
            right: mark,
            node: Some((node, token)),
        }
    }
}

/// Add or remove `pair` around every selection range.
///
/// Marks directly around a range are removed. Otherwise a range inside a node
/// of the pair's kind has that node's marks removed (several ranges in one
/// node remove them once), and failing that the range is wrapped with the
/// content still selected. When the per-range edits collide, only the marks
/// directly around each range are considered; edits that still collide leave
/// the document alone.
pub fn toggle_block_with_marks(state: &EditorState, pair: MarkPair) -> Transaction {
    let mut handled: Vec<TextRange> = Vec::new();
    let with_tree = change_by_range(state, |range| {
        if let Some(edit) = unwrap_surrounding(state, pair, range) {
            return Ok(edit);
        }
        if let Some(edit) = unwrap_node(state, pair, range, &mut handled) {
            return Ok(edit);
        }
        Ok(wrap(state, pair, range))
    });
    let declined = match with_tree {
        Ok(tr) => return tr,
        Err(declined) => declined,
    };

    log::debug!("{declined}, toggling {} textually", pair.left);
    change_by_range(state, |range| {
        Ok(unwrap_surrounding(state, pair, range).unwrap_or_else(|| wrap(state, pair, range)))
    })
    .unwrap_or_else(|declined| {
        log::warn!("mark toggle left the document alone: {declined}");
        Transaction::new(ChangeSet::empty(state.doc().len()), None)
    })
}

/// Remove the marks of the enclosing node of the pair's kind.
fn unwrap_node(
    state: &EditorState,
    pair: MarkPair,
    range: SelectionRange,
    handled: &mut Vec<TextRange>,
) -> Option<RangeEdit> {
    let (node_kind, mark_kind) = pair.node?;
    let node = tree::covering_node(state.tree(), range.from(), range.to(), node_kind)?;
    let marks: Vec<SyntaxToken> = node
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| t.kind() == mark_kind)
        .collect();
    if marks.len() != 2 {
        log::warn!(
            "{node_kind:?} at {:?} has {} marks, expected 2",
            node.text_range(),
            marks.len()
        );
        return None;
    }

    if handled.contains(&node.text_range()) {
        return Some(RangeEdit {
            changes: Vec::new(),
            range,
        });
    }
    handled.push(node.text_range());

    let changes: Vec<ChangeSpec> = marks
        .iter()
        .map(|mark| ChangeSpec::delete(mark.text_range().start().into(), mark.text_range().end().into()))
        .collect();
    let set = ChangeSet::new(changes, state.doc().len()).ok()?;
    let range = range.map(&set);
    Some(RangeEdit {
        changes: set.into_changes(),
        range,
    })
}

/// Remove marks that directly surround the range.
fn unwrap_surrounding(state: &EditorState, pair: MarkPair, range: SelectionRange) -> Option<RangeEdit> {
    let doc = state.doc();
    let (from, to) = (range.from(), range.to());
    let outer_from = from.checked_sub(pair.left.len())?;
    let outer_to = to + pair.right.len();
    if outer_to > doc.len()
        || doc.slice(outer_from, from) != pair.left
        || doc.slice(to, outer_to) != pair.right
    {
        return None;
    }

    let selected = doc.slice(from, to).to_string();
    Some(RangeEdit {
        range: SelectionRange::new(outer_from, outer_from + selected.len()),
        changes: vec![ChangeSpec::replace(outer_from, outer_to, selected)],
    })
}

/// Wrap the range in the pair, keeping the content selected.
fn wrap(state: &EditorState, pair: MarkPair, range: SelectionRange) -> RangeEdit {
    let (from, to) = (range.from(), range.to());
    let selected = state.doc().slice(from, to);
    let start = from + pair.left.len();
    RangeEdit {
        range: SelectionRange::new(start, start + selected.len()),
        changes: vec![ChangeSpec::replace(
            from,
            to,
            format!("{}{selected}{}", pair.left, pair.right),
        )],
    }
}

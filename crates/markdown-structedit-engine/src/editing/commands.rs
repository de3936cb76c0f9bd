use thiserror::Error;

use crate::editing::transaction::Assoc;
use crate::editing::{
    ChangeSet, ChangeSpec, EditorState, Selection, SelectionRange, Transaction,
};
use crate::markup::{continuation, deletion};
use crate::toggle::{self, LeadingMark, ListKind, MarkPair};

/// Commands that can be run against the editor state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// Enter: continue list/quote markup, or decline for a plain newline
    InsertNewlineContinueMarkup,
    /// Backspace: remove markup before the caret, or decline
    DeleteMarkupBackward,
    ToggleBold,
    ToggleItalic,
    ToggleStrikethrough,
    ToggleInlineCode,
    ToggleInlineMath,
    /// Toggle an ATX heading; levels outside 1..=6 are clamped
    ToggleHeading {
        level: usize,
    },
    ToggleBlockquote,
    ToggleBullet,
    ToggleNumbering,
    ToggleTodo,
    ReplaceSelections {
        text: String,
        /// Caret offset within `text`, defaults to its end
        caret_offset: Option<usize>,
    },
    InsertHorizontalRule,
    InsertCodeBlock,
    InsertMathBlock,
    /// Apply the configured final newline and whitespace trimming
    FormatContent {
        user_initiated: bool,
    },
}

/// Why a command left the document alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeclineReason {
    #[error("a range is a selection, not a caret")]
    NotCaret,
    #[error("the caret is not in Markdown")]
    NotMarkdown,
    #[error("there is no list or quote markup around the caret")]
    NoContext,
    #[error("the caret is inside a marker")]
    InsideMarkup,
    #[error("the caret is not directly after markup")]
    NotAfterMarkup,
    #[error("edits for different ranges overlap")]
    ConflictingChanges,
}

/// The command did not apply; the host should fall back to its default
/// behaviour (plain newline, plain backspace).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("command declined: {reason}")]
pub struct Declined {
    pub reason: DeclineReason,
}

impl From<DeclineReason> for Declined {
    fn from(reason: DeclineReason) -> Self {
        Self { reason }
    }
}

/// Edits for one selection range. `range` is where that range ends up once
/// only its own `changes` are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeEdit {
    pub changes: Vec<ChangeSpec>,
    pub range: SelectionRange,
}

/// Run `f` for every selection range and combine the results into one
/// transaction.
///
/// Each range's result is mapped through the changes made for the other
/// ranges. The first range that declines declines the whole command.
pub fn change_by_range<F>(state: &EditorState, mut f: F) -> Result<Transaction, Declined>
where
    F: FnMut(SelectionRange) -> Result<RangeEdit, DeclineReason>,
{
    let doc_len = state.doc().len();
    let selection = state.selection();

    let mut edits = Vec::with_capacity(selection.ranges().len());
    for range in selection.ranges() {
        match f(*range) {
            Ok(edit) => edits.push(edit),
            Err(reason) => {
                log::debug!(
                    "declined at {}..{}: {reason}",
                    range.from(),
                    range.to()
                );
                return Err(reason.into());
            }
        }
    }

    let all = edits
        .iter()
        .flat_map(|edit| edit.changes.iter().cloned())
        .collect();
    let changes = ChangeSet::new(all, doc_len).map_err(|err| {
        log::warn!("discarding command with conflicting edits: {err}");
        Declined::from(DeclineReason::ConflictingChanges)
    })?;

    let ranges = edits
        .iter()
        .enumerate()
        .map(|(i, edit)| {
            let others = edits
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .flat_map(|(_, other)| other.changes.iter())
                .filter(|change| !edit.changes.contains(change));
            map_through_others(edit, others, doc_len)
        })
        .collect();

    Ok(Transaction::new(
        changes,
        Some(Selection::new(ranges, selection.main_index())),
    ))
}

/// Move a range from "own changes applied" coordinates to the final
/// document, by replaying the other ranges' changes on top.
fn map_through_others<'a>(
    edit: &RangeEdit,
    others: impl Iterator<Item = &'a ChangeSpec>,
    doc_len: usize,
) -> SelectionRange {
    let own = match ChangeSet::new(edit.changes.clone(), doc_len) {
        Ok(own) => own,
        Err(_) => return edit.range,
    };
    let shifted = others
        .map(|change| {
            let from = own.map_pos(change.from, Assoc::After);
            let to = if change.from == change.to {
                from
            } else {
                own.map_pos(change.to, Assoc::Before).max(from)
            };
            ChangeSpec::replace(from, to, change.insert.clone())
        })
        .collect();
    match ChangeSet::new(shifted, own.new_len()) {
        Ok(others) => edit.range.map(&others),
        Err(err) => {
            log::warn!("could not map selection through other edits: {err}");
            edit.range
        }
    }
}

/// Compile a command against the state
pub fn compile(state: &EditorState, cmd: &Cmd) -> Result<Transaction, Declined> {
    let br = state.doc().line_break();
    match cmd {
        Cmd::InsertNewlineContinueMarkup => continuation::insert_newline_continue_markup(state),
        Cmd::DeleteMarkupBackward => deletion::delete_markup_backward(state),
        Cmd::ToggleBold => Ok(toggle::toggle_block_with_marks(state, MarkPair::BOLD)),
        Cmd::ToggleItalic => Ok(toggle::toggle_block_with_marks(state, MarkPair::ITALIC)),
        Cmd::ToggleStrikethrough => Ok(toggle::toggle_block_with_marks(
            state,
            MarkPair::STRIKETHROUGH,
        )),
        Cmd::ToggleInlineCode => Ok(toggle::toggle_block_with_marks(
            state,
            MarkPair::INLINE_CODE,
        )),
        Cmd::ToggleInlineMath => Ok(toggle::toggle_block_with_marks(
            state,
            MarkPair::INLINE_MATH,
        )),
        Cmd::ToggleHeading { level } => Ok(toggle::toggle_line_leading_mark(
            state,
            LeadingMark::Heading,
            (*level).clamp(1, 6),
        )),
        Cmd::ToggleBlockquote => Ok(toggle::toggle_line_leading_mark(
            state,
            LeadingMark::Blockquote,
            1,
        )),
        Cmd::ToggleBullet => Ok(toggle::toggle_list_style(state, ListKind::Bullet)),
        Cmd::ToggleNumbering => Ok(toggle::toggle_list_style(state, ListKind::Numbering)),
        Cmd::ToggleTodo => Ok(toggle::toggle_list_style(state, ListKind::Todo)),
        Cmd::ReplaceSelections { text, caret_offset } => {
            replace_selections(state, text, *caret_offset)
        }
        Cmd::InsertHorizontalRule => replace_selections(state, &format!("{br}---{br}"), None),
        Cmd::InsertCodeBlock => insert_block_with_marks(state, "```"),
        Cmd::InsertMathBlock => insert_block_with_marks(state, "$$"),
        Cmd::FormatContent { user_initiated } => {
            let format = state.config().format;
            Ok(format_content(
                state,
                format.insert_final_newline,
                format.trim_trailing_whitespace,
                *user_initiated,
            ))
        }
    }
}

/// Replace every range with `text`, leaving a caret `caret_offset` bytes
/// into it (at its end by default).
pub fn replace_selections(
    state: &EditorState,
    text: &str,
    caret_offset: Option<usize>,
) -> Result<Transaction, Declined> {
    let offset = caret_offset.unwrap_or(text.len()).min(text.len());
    change_by_range(state, |range| {
        Ok(RangeEdit {
            changes: vec![ChangeSpec::replace(range.from(), range.to(), text)],
            range: SelectionRange::cursor(range.from() + offset),
        })
    })
}

/// Insert an empty fenced block (```` ``` ```` or `$$`) with the caret on
/// its middle line.
pub fn insert_block_with_marks(state: &EditorState, marks: &str) -> Result<Transaction, Declined> {
    let br = state.doc().line_break();
    replace_selections(
        state,
        &format!("{marks}{br}{br}{marks}"),
        Some(marks.len() + br.len()),
    )
}

/// Append a missing final line break and trim trailing whitespace.
///
/// Lines whose end holds a caret keep their whitespace unless the user asked
/// for the format explicitly, so formatting on save doesn't eat the space
/// being typed.
pub fn format_content(
    state: &EditorState,
    insert_final_newline: bool,
    trim_trailing_whitespace: bool,
    user_initiated: bool,
) -> Transaction {
    let doc = state.doc();
    let br = doc.line_break();
    let mut changes = Vec::new();

    if insert_final_newline && !doc.is_empty() && !doc.text().ends_with(br) {
        changes.push(ChangeSpec::insert(doc.len(), br));
    }

    if trim_trailing_whitespace {
        for number in 1..=doc.lines() {
            let line = doc.line(number);
            let caret_at_end = state
                .selection()
                .ranges()
                .iter()
                .any(|r| r.is_empty() && r.head == line.to);
            if caret_at_end && !user_initiated {
                continue;
            }
            let kept = line.text.trim_end().len();
            if kept < line.text.len() {
                changes.push(ChangeSpec::delete(line.from + kept, line.to));
            }
        }
    }

    match ChangeSet::new(changes, doc.len()) {
        Ok(changes) => Transaction::new(changes, None),
        Err(err) => {
            log::warn!("format produced conflicting edits: {err}");
            Transaction::new(ChangeSet::empty(doc.len()), None)
        }
    }
}

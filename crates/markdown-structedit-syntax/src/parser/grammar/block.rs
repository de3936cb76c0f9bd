//! Block-level grammar rules.
//!
//! Blocks are parsed one line at a time against a stack of open containers
//! (blockquotes, lists, list items), the way CommonMark describes it:
//!
//! 1. Walk the open containers and check which ones this line continues
//!    (`>` for quotes, enough indentation or a blank line for list items).
//! 2. Close what was not continued, unless the line is a lazy paragraph
//!    continuation or a sibling list item keeps its list alive.
//! 3. Emit the continued prefix (quote marks, indentation) into the open node.
//! 4. Open new containers, then the leaf block for the rest of the line.
//!
//! Lists and list items start at their marker: leading indentation is left in
//! the parent node, so an item's offset is the column of its `-` or `1.`.
//! Indentation of four or more columns has no special meaning here (there are
//! no indented code blocks) and is treated as text.

use crate::parser::{Marker, Parser};
use crate::syntax_kind::SyntaxKind;

use super::inline;

const TAB_STOP: usize = 4;
/// Maximum indentation before a block marker stops being recognised.
const MAX_MARKER_INDENT: usize = 3;

/// Parse every line of the document into nested blocks.
pub fn document(p: &mut Parser<'_, '_>) {
    let mut blocks = BlockStack::default();
    while !p.at_end() {
        blocks.line(p);
    }
    blocks.close_all(p);
}

/// What decides whether two items belong to the same list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListStyle {
    /// Bullet character kind (`DASH`, `STAR` or `PLUS`)
    Bullet(SyntaxKind),
    /// Ordered delimiter, `.` or `)`
    Ordered(char),
}

impl ListStyle {
    fn node_kind(self) -> SyntaxKind {
        match self {
            ListStyle::Bullet(_) => SyntaxKind::BULLET_LIST,
            ListStyle::Ordered(_) => SyntaxKind::ORDERED_LIST,
        }
    }
}

enum Container {
    Quote(Marker),
    List(Marker, ListStyle),
    /// Open list item and the column its content starts at
    Item(Marker, usize),
}

enum Leaf {
    Paragraph(Marker),
    Fence {
        marker: Marker,
        fence: SyntaxKind,
        len: usize,
    },
}

/// How the remainder of a line (after continued container prefixes) starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockStart {
    Blank,
    Quote,
    Item {
        style: ListStyle,
        /// Raw tokens making up the marker (1, or 2 for `3)`)
        marker_tokens: usize,
        /// Marker directly followed by the end of the line
        bare: bool,
    },
    Heading(usize),
    ThematicBreak,
    Fence(SyntaxKind, usize),
    Text,
}

/// Lookahead position within the current line.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    /// Token distance from the parser position
    n: usize,
    /// Column of the token at `n`
    col: usize,
    /// Column that marker indentation is measured from
    base: usize,
}

impl Cursor {
    fn line_start() -> Self {
        Cursor {
            n: 0,
            col: 0,
            base: 0,
        }
    }

    /// Same columns, re-anchored at the parser position after a bump.
    fn rebased(self) -> Self {
        Cursor { n: 0, ..self }
    }
}

#[derive(Default)]
struct BlockStack {
    containers: Vec<Container>,
    leaf: Option<Leaf>,
}

impl BlockStack {
    fn line(&mut self, p: &mut Parser<'_, '_>) {
        let (matched, cur, quote_marks) = self.match_containers(p);
        let all_matched = matched == self.containers.len();
        let (_, start) = classify(p, cur);

        if matches!(self.leaf, Some(Leaf::Fence { .. })) {
            if all_matched {
                consume_prefix(p, cur.n, &quote_marks);
                self.fence_line(p, cur.rebased());
                return;
            }
            self.close_leaf(p);
        }

        if matches!(self.leaf, Some(Leaf::Paragraph(_))) {
            let continues = match start {
                BlockStart::Text => true,
                BlockStart::Item { bare: true, .. } => all_matched,
                _ => false,
            };
            if continues {
                consume_prefix(p, cur.n, &quote_marks);
                inline::inline_line(p);
                p.eat(SyntaxKind::NEWLINE);
                return;
            }
            self.close_leaf(p);
        }

        self.close_unmatched(p, matched, start);
        consume_prefix(p, cur.n, &quote_marks);
        self.open_blocks(p, cur.rebased());
    }

    /// Phase 1: how many open containers does this line continue?
    ///
    /// Returns the count, the cursor after their prefixes and the lookahead
    /// indices of the `>` tokens that continued quotes.
    fn match_containers(&self, p: &Parser<'_, '_>) -> (usize, Cursor, Vec<usize>) {
        let mut cur = Cursor::line_start();
        let mut matched = 0;
        let mut quote_marks = Vec::new();

        for (index, container) in self.containers.iter().enumerate() {
            match container {
                Container::Quote(_) => {
                    let at = skip_ws(p, cur);
                    if p.nth(at.n) != SyntaxKind::GT
                        || at.col.saturating_sub(cur.base) > MAX_MARKER_INDENT
                    {
                        break;
                    }
                    quote_marks.push(at.n);
                    cur = after_quote_mark(p, at);
                    matched = index + 1;
                }
                // A list is continued exactly when its open item is
                Container::List(..) => {}
                Container::Item(_, content_col) => {
                    let at = skip_ws(p, cur);
                    let blank = is_line_end(p.nth(at.n));
                    if !blank && at.col < *content_col {
                        break;
                    }
                    cur.base = cur.base.max(*content_col);
                    matched = index + 1;
                }
            }
        }

        (matched, cur, quote_marks)
    }

    /// Phase 2: close containers the line did not continue.
    ///
    /// A list whose item ended survives when the line starts a sibling item.
    fn close_unmatched(&mut self, p: &mut Parser<'_, '_>, matched: usize, start: BlockStart) {
        let sibling_item = match (self.containers.get(matched), start) {
            (Some(Container::List(_, style)), BlockStart::Item { style: next, .. }) => {
                *style == next
            }
            _ => false,
        };
        let keep = if sibling_item { matched + 1 } else { matched };
        while self.containers.len() > keep {
            self.close_container(p);
        }
    }

    /// Phase 4: open new containers, then the leaf block.
    fn open_blocks(&mut self, p: &mut Parser<'_, '_>, mut cur: Cursor) {
        loop {
            let (at, start) = classify(p, cur);
            match start {
                BlockStart::Quote => {
                    bump_tokens(p, at.n);
                    let m = p.start();
                    p.bump_n(1, SyntaxKind::QUOTE_MARK);
                    let mut col = at.col + 1;
                    let mut base = col;
                    if p.at(SyntaxKind::WHITESPACE) {
                        base += 1;
                        col = advance_col(p.current_text(), col);
                        p.bump();
                    }
                    self.containers.push(Container::Quote(m));
                    cur = Cursor { n: 0, col, base };
                }
                BlockStart::Item {
                    style,
                    marker_tokens,
                    ..
                } => {
                    bump_tokens(p, at.n);
                    let continues_list = matches!(
                        self.containers.last(),
                        Some(Container::List(_, open)) if *open == style
                    );
                    if !continues_list {
                        let list = p.start();
                        self.containers.push(Container::List(list, style));
                    }

                    let item = p.start();
                    let marker_end = (0..marker_tokens)
                        .fold(at.col, |col, n| advance_col(p.nth_text(n), col));
                    p.bump_n(marker_tokens, SyntaxKind::LIST_MARK);

                    let mut col = marker_end;
                    let mut content_col = marker_end + 1;
                    if p.at(SyntaxKind::WHITESPACE) {
                        col = advance_col(p.current_text(), marker_end);
                        let blank_item = is_line_end(p.nth(1));
                        // Five or more spaces: content starts one column after the marker
                        if !blank_item && col - marker_end <= TAB_STOP {
                            content_col = col;
                        }
                        p.bump();
                    }
                    self.containers.push(Container::Item(item, content_col));
                    cur = Cursor {
                        n: 0,
                        col,
                        base: content_col,
                    };
                }
                _ => {
                    bump_tokens(p, at.n);
                    self.open_leaf(p, start);
                    return;
                }
            }
        }
    }

    fn open_leaf(&mut self, p: &mut Parser<'_, '_>, start: BlockStart) {
        match start {
            BlockStart::Blank => {
                p.eat(SyntaxKind::NEWLINE);
            }
            BlockStart::Heading(level) => {
                let m = p.start();
                p.bump_n(level, SyntaxKind::HEADER_MARK);
                inline::inline_line(p);
                p.eat(SyntaxKind::NEWLINE);
                m.complete(p, SyntaxKind::HEADING);
            }
            BlockStart::ThematicBreak => {
                let m = p.start();
                p.bump_to_line_end();
                p.eat(SyntaxKind::NEWLINE);
                m.complete(p, SyntaxKind::THEMATIC_BREAK);
            }
            BlockStart::Fence(fence, len) => {
                let marker = p.start();
                p.bump_n(len, SyntaxKind::CODE_MARK);
                // Info string
                p.bump_to_line_end();
                p.eat(SyntaxKind::NEWLINE);
                self.leaf = Some(Leaf::Fence { marker, fence, len });
            }
            BlockStart::Text | BlockStart::Quote | BlockStart::Item { .. } => {
                let m = p.start();
                inline::inline_line(p);
                p.eat(SyntaxKind::NEWLINE);
                self.leaf = Some(Leaf::Paragraph(m));
            }
        }
    }

    /// A line inside an open fence: either content or the closing fence.
    fn fence_line(&mut self, p: &mut Parser<'_, '_>, cur: Cursor) {
        if let Some(Leaf::Fence { fence, len, .. }) = &self.leaf {
            let at = skip_ws(p, cur);
            let run = run_length(p, at.n, *fence);
            if at.col.saturating_sub(at.base) <= MAX_MARKER_INDENT
                && run >= *len
                && rest_is_blank(p, at.n + run)
            {
                bump_tokens(p, at.n);
                p.bump_n(run, SyntaxKind::CODE_MARK);
                p.bump_to_line_end();
                p.eat(SyntaxKind::NEWLINE);
                self.close_leaf(p);
                return;
            }
        }
        p.bump_to_line_end();
        p.eat(SyntaxKind::NEWLINE);
    }

    fn close_leaf(&mut self, p: &mut Parser<'_, '_>) {
        match self.leaf.take() {
            Some(Leaf::Paragraph(m)) => m.complete(p, SyntaxKind::PARAGRAPH),
            Some(Leaf::Fence { marker, .. }) => marker.complete(p, SyntaxKind::FENCED_CODE),
            None => {}
        }
    }

    fn close_container(&mut self, p: &mut Parser<'_, '_>) {
        self.close_leaf(p);
        match self.containers.pop() {
            Some(Container::Quote(m)) => m.complete(p, SyntaxKind::BLOCK_QUOTE),
            Some(Container::List(m, style)) => m.complete(p, style.node_kind()),
            Some(Container::Item(m, _)) => m.complete(p, SyntaxKind::LIST_ITEM),
            None => {}
        }
    }

    fn close_all(&mut self, p: &mut Parser<'_, '_>) {
        self.close_leaf(p);
        while !self.containers.is_empty() {
            self.close_container(p);
        }
    }
}

/// Classify the rest of the line at `cur`, returning the cursor moved past
/// leading whitespace.
fn classify(p: &Parser<'_, '_>, cur: Cursor) -> (Cursor, BlockStart) {
    let at = skip_ws(p, cur);
    let kind = p.nth(at.n);
    if is_line_end(kind) {
        return (at, BlockStart::Blank);
    }
    if at.col.saturating_sub(at.base) > MAX_MARKER_INDENT {
        return (at, BlockStart::Text);
    }

    let start = match kind {
        SyntaxKind::GT => BlockStart::Quote,
        SyntaxKind::HASH => {
            let level = run_length(p, at.n, SyntaxKind::HASH);
            let next = p.nth(at.n + level);
            if level <= 6 && (next == SyntaxKind::WHITESPACE || is_line_end(next)) {
                BlockStart::Heading(level)
            } else {
                BlockStart::Text
            }
        }
        SyntaxKind::DASH | SyntaxKind::STAR | SyntaxKind::UNDERSCORE
            if is_thematic_break(p, at.n) =>
        {
            BlockStart::ThematicBreak
        }
        SyntaxKind::DASH | SyntaxKind::STAR | SyntaxKind::PLUS => {
            bullet_item(p, at.n, kind).unwrap_or(BlockStart::Text)
        }
        SyntaxKind::BACKTICK | SyntaxKind::TILDE => {
            let len = run_length(p, at.n, kind);
            if len >= 3 && !(kind == SyntaxKind::BACKTICK && backtick_in_info(p, at.n + len)) {
                BlockStart::Fence(kind, len)
            } else {
                BlockStart::Text
            }
        }
        SyntaxKind::TEXT => ordered_item(p, at.n).unwrap_or(BlockStart::Text),
        _ => BlockStart::Text,
    };
    (at, start)
}

fn bullet_item(p: &Parser<'_, '_>, n: usize, kind: SyntaxKind) -> Option<BlockStart> {
    item_after_marker(p, n + 1).map(|bare| BlockStart::Item {
        style: ListStyle::Bullet(kind),
        marker_tokens: 1,
        bare,
    })
}

/// `12.` arrives as one TEXT token, `12)` as TEXT + RPAREN.
fn ordered_item(p: &Parser<'_, '_>, n: usize) -> Option<BlockStart> {
    let text = p.nth_text(n);
    let (digits, delimiter, marker_tokens) = match text.strip_suffix('.') {
        Some(digits) => (digits, '.', 1),
        None if p.nth(n + 1) == SyntaxKind::RPAREN => (text, ')', 2),
        None => return None,
    };
    if digits.is_empty() || digits.len() > 9 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    item_after_marker(p, n + marker_tokens).map(|bare| BlockStart::Item {
        style: ListStyle::Ordered(delimiter),
        marker_tokens,
        bare,
    })
}

/// A marker must be followed by whitespace or the end of the line.
/// Returns whether the item is bare (nothing at all after the marker).
fn item_after_marker(p: &Parser<'_, '_>, n: usize) -> Option<bool> {
    match p.nth(n) {
        SyntaxKind::WHITESPACE => Some(false),
        kind if is_line_end(kind) => Some(true),
        _ => None,
    }
}

/// Three or more of the same marker character, optionally spaced out.
fn is_thematic_break(p: &Parser<'_, '_>, n: usize) -> bool {
    let marker = p.nth(n);
    let mut count = 0;
    let mut i = n;
    while !is_line_end(p.nth(i)) {
        match p.nth(i) {
            k if k == marker => count += 1,
            SyntaxKind::WHITESPACE => {}
            _ => return false,
        }
        i += 1;
    }
    count >= 3
}

fn backtick_in_info(p: &Parser<'_, '_>, mut n: usize) -> bool {
    while !is_line_end(p.nth(n)) {
        if p.nth(n) == SyntaxKind::BACKTICK {
            return true;
        }
        n += 1;
    }
    false
}

fn rest_is_blank(p: &Parser<'_, '_>, n: usize) -> bool {
    match p.nth(n) {
        SyntaxKind::WHITESPACE => is_line_end(p.nth(n + 1)),
        kind => is_line_end(kind),
    }
}

fn run_length(p: &Parser<'_, '_>, n: usize, kind: SyntaxKind) -> usize {
    let mut len = 0;
    while p.nth(n + len) == kind {
        len += 1;
    }
    len
}

fn skip_ws(p: &Parser<'_, '_>, cur: Cursor) -> Cursor {
    if p.nth(cur.n) == SyntaxKind::WHITESPACE {
        Cursor {
            n: cur.n + 1,
            col: advance_col(p.nth_text(cur.n), cur.col),
            base: cur.base,
        }
    } else {
        cur
    }
}

/// Cursor after a `>` at `at`; one following space belongs to the marker.
fn after_quote_mark(p: &Parser<'_, '_>, at: Cursor) -> Cursor {
    let col = at.col + 1;
    let base = if p.nth(at.n + 1) == SyntaxKind::WHITESPACE {
        col + 1
    } else {
        col
    };
    Cursor {
        n: at.n + 1,
        col,
        base,
    }
}

/// Emit the continued container prefix, gluing each continued `>`.
fn consume_prefix(p: &mut Parser<'_, '_>, n: usize, quote_marks: &[usize]) {
    for i in 0..n {
        if quote_marks.contains(&i) {
            p.bump_n(1, SyntaxKind::QUOTE_MARK);
        } else {
            p.bump();
        }
    }
}

fn bump_tokens(p: &mut Parser<'_, '_>, n: usize) {
    for _ in 0..n {
        p.bump();
    }
}

fn is_line_end(kind: SyntaxKind) -> bool {
    matches!(kind, SyntaxKind::NEWLINE | SyntaxKind::EOF)
}

fn advance_col(text: &str, col: usize) -> usize {
    text.chars().fold(col, |col, c| {
        if c == '\t' {
            col + TAB_STOP - col % TAB_STOP
        } else {
            col + 1
        }
    })
}

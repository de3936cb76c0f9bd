//! # Inline-Level Grammar
//!
//! Inline elements are the formatting within a line: code spans, emphasis,
//! strong emphasis and strikethrough. Unlike blocks, inline parsing is driven
//! by **delimiter runs** rather than line-start patterns.
//!
//! ## Dispatch Logic
//!
//! | Token | Possible Element |
//! |-------|-----------------|
//! | `` ` `` | Code span |
//! | `*` / `_` | Emphasis or strong |
//! | `~` | Strikethrough |
//! | (other) | Plain text |
//!
//! ## Delimiters Become Marks
//!
//! The delimiters of a recognised element are glued into mark tokens
//! (`CODE_MARK`, `EMPHASIS_MARK`, `STRIKETHROUGH_MARK`), so an element node
//! always has exactly one mark at each end:
//!
//! ```text
//! **bold** → STRONG [EMPHASIS_MARK "**", TEXT "bold", EMPHASIS_MARK "**"]
//! ```
//!
//! ## Error Tolerance
//!
//! A delimiter run without a matching closer on the same line is consumed as
//! plain text. Nothing ever spans a line break.

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Parse inline content up to (not including) the end of the line.
pub fn inline_line(p: &mut Parser<'_, '_>) {
    let mut n = 0;
    while !matches!(p.nth(n), SyntaxKind::NEWLINE | SyntaxKind::EOF) {
        n += 1;
    }
    let end = p.token_index() + n;
    inline_until(p, end);
}

/// Parse inline elements until the absolute token index `end`.
fn inline_until(p: &mut Parser<'_, '_>, end: usize) {
    while p.token_index() < end && !p.at_line_end() {
        inline_element(p, end);
    }
}

fn inline_element(p: &mut Parser<'_, '_>, end: usize) {
    match p.current() {
        SyntaxKind::BACKTICK => code_span(p, end),
        SyntaxKind::STAR | SyntaxKind::UNDERSCORE => emphasis_or_strong(p, end),
        SyntaxKind::TILDE => strikethrough(p, end),
        _ => p.bump(),
    }
}

/// Parse a code span closed by a backtick run of the same length.
fn code_span(p: &mut Parser<'_, '_>, end: usize) {
    let limit = end - p.token_index();
    let open = run_length(p, 0, SyntaxKind::BACKTICK, limit);

    let mut n = open;
    while n < limit {
        if p.nth(n) != SyntaxKind::BACKTICK {
            n += 1;
            continue;
        }
        let run = run_length(p, n, SyntaxKind::BACKTICK, limit);
        if run == open {
            let m = p.start();
            p.bump_n(open, SyntaxKind::CODE_MARK);
            // Code span content is never parsed further
            for _ in open..n {
                p.bump();
            }
            p.bump_n(open, SyntaxKind::CODE_MARK);
            m.complete(p, SyntaxKind::CODE_SPAN);
            return;
        }
        n += run;
    }

    for _ in 0..open {
        p.bump();
    }
}

/// Parse `*em*`, `**strong**` or their underscore variants.
///
/// A run of two or more delimiters tries strong emphasis first; otherwise one
/// delimiter opens emphasis. Openers must be followed by non-whitespace and
/// closers preceded by it.
fn emphasis_or_strong(p: &mut Parser<'_, '_>, end: usize) {
    let delimiter = p.current();
    let limit = end - p.token_index();
    let open = run_length(p, 0, delimiter, limit);
    let followed_by_text =
        open < limit && !matches!(p.nth(open), SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE);

    if followed_by_text {
        let strong_close = if open >= 2 {
            find_closer(p, delimiter, 2, open, limit)
        } else {
            None
        };
        if let Some(close) = strong_close {
            wrap(p, 2, close, SyntaxKind::EMPHASIS_MARK, SyntaxKind::STRONG);
            return;
        }
        if let Some(close) = find_closer(p, delimiter, 1, open, limit) {
            wrap(p, 1, close, SyntaxKind::EMPHASIS_MARK, SyntaxKind::EMPHASIS);
            return;
        }
    }

    // Unmatched: one delimiter is plain text, the rest get another chance
    p.bump();
}

/// Parse `~~strike~~`. Only runs of exactly two tildes count.
fn strikethrough(p: &mut Parser<'_, '_>, end: usize) {
    let limit = end - p.token_index();
    let open = run_length(p, 0, SyntaxKind::TILDE, limit);
    let followed_by_text =
        open < limit && !matches!(p.nth(open), SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE);

    if open == 2 && followed_by_text {
        let mut n = open;
        while n < limit {
            if p.nth(n) != SyntaxKind::TILDE {
                n += 1;
                continue;
            }
            let run = run_length(p, n, SyntaxKind::TILDE, limit);
            if run == 2 && p.nth(n - 1) != SyntaxKind::WHITESPACE {
                wrap(
                    p,
                    2,
                    n,
                    SyntaxKind::STRIKETHROUGH_MARK,
                    SyntaxKind::STRIKETHROUGH,
                );
                return;
            }
            n += run;
        }
    }

    for _ in 0..open {
        p.bump();
    }
}

/// Find where the closing delimiters start, as a lookahead index.
///
/// Strong (`width == 2`) closes on any run of two or more, using its last
/// two delimiters. Emphasis closes on a run of one, or the first delimiter of
/// a run of three or more.
fn find_closer(
    p: &Parser<'_, '_>,
    delimiter: SyntaxKind,
    width: usize,
    from: usize,
    limit: usize,
) -> Option<usize> {
    let mut n = from;
    while n < limit {
        if p.nth(n) != delimiter {
            n += 1;
            continue;
        }
        let run = run_length(p, n, delimiter, limit);
        let preceded_by_text = p.nth(n - 1) != SyntaxKind::WHITESPACE;
        let fits = if width == 2 {
            run >= 2
        } else {
            run == 1 || run >= 3
        };
        if preceded_by_text && fits {
            return Some(if width == 2 { n + run - 2 } else { n });
        }
        n += run;
    }
    None
}

/// Emit `width` opening delimiters, the content up to `close`, then `width`
/// closing delimiters, all inside a `kind` node.
fn wrap(p: &mut Parser<'_, '_>, width: usize, close: usize, mark: SyntaxKind, kind: SyntaxKind) {
    let close_at = p.token_index() + close;
    let m = p.start();
    p.bump_n(width, mark);
    inline_until(p, close_at);
    p.bump_n(width, mark);
    m.complete(p, kind);
}

fn run_length(p: &Parser<'_, '_>, n: usize, kind: SyntaxKind, limit: usize) -> usize {
    let mut len = 0;
    while n + len < limit && p.nth(n + len) == kind {
        len += 1;
    }
    len
}

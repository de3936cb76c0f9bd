//! Raw tokens for the block and inline parsers.
//!
//! Each character that can end up inside a mark token (`>` quote marks, `-`
//! `*` `+` bullets, `#` heading runs, emphasis and strikethrough delimiters,
//! code fences and spans) is lexed on its own, one character per token. The
//! parser later glues runs of them into a single mark such as `**` or `###`.
//! Runs of anything else are `TEXT`.
//!
//! Nothing is skipped, so concatenating the token texts yields the input
//! byte for byte and tree offsets are document offsets:
//!
//! ```
//! use markdown_structedit_syntax::lexer::lex;
//!
//! let input = "> - [ ] **todo**\r\n";
//! let text: String = lex(input).iter().map(|t| t.text).collect();
//! assert_eq!(text, input);
//! ```
//!
//! Ordered list numbers are not split: `12.` is one `TEXT` token and the
//! block parser recognises it by its digits. `)` gets its own token because
//! `3)` is a marker too.

use logos::Logos;

use crate::syntax_kind::SyntaxKind;

/// What Logos matches. Converted into [`SyntaxKind`] right away.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"")]
enum RawKind {
    /// Spaces and tabs; marker widths are measured from these
    #[regex(r"[ \t]+")]
    Blank,

    #[regex(r"\r?\n")]
    LineEnd,

    #[token(">")]
    Quote,

    #[token("-")]
    Dash,

    #[token("*")]
    Star,

    #[token("+")]
    Plus,

    #[token("_")]
    Underscore,

    #[token("`")]
    Backtick,

    #[token("~")]
    Tilde,

    #[token(")")]
    CloseParen,

    #[token("#")]
    Hash,

    #[regex(r"[^\s>`*+#~_)-]+")]
    Word,
}

impl From<RawKind> for SyntaxKind {
    fn from(raw: RawKind) -> Self {
        match raw {
            RawKind::Blank => SyntaxKind::WHITESPACE,
            RawKind::LineEnd => SyntaxKind::NEWLINE,
            RawKind::Quote => SyntaxKind::GT,
            RawKind::Dash => SyntaxKind::DASH,
            RawKind::Star => SyntaxKind::STAR,
            RawKind::Plus => SyntaxKind::PLUS,
            RawKind::Underscore => SyntaxKind::UNDERSCORE,
            RawKind::Backtick => SyntaxKind::BACKTICK,
            RawKind::Tilde => SyntaxKind::TILDE,
            RawKind::CloseParen => SyntaxKind::RPAREN,
            RawKind::Hash => SyntaxKind::HASH,
            RawKind::Word => SyntaxKind::TEXT,
        }
    }
}

/// A token and the slice of input it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
}

/// Split `input` into tokens covering every byte.
///
/// Input Logos cannot match (a lone `\r`, Unicode whitespace other than
/// spaces and tabs) becomes `TEXT`.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    RawKind::lexer(input)
        .spanned()
        .map(|(raw, span)| Token {
            kind: raw.map_or(SyntaxKind::TEXT, SyntaxKind::from),
            text: &input[span],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use SyntaxKind::*;

    fn kinds(input: &str) -> Vec<(SyntaxKind, &str)> {
        lex(input).into_iter().map(|t| (t.kind, t.text)).collect()
    }

    #[test]
    fn test_empty_input_has_no_tokens() {
        assert!(lex("").is_empty());
    }

    #[rstest]
    #[case(">", GT)]
    #[case("-", DASH)]
    #[case("*", STAR)]
    #[case("+", PLUS)]
    #[case("_", UNDERSCORE)]
    #[case("`", BACKTICK)]
    #[case("~", TILDE)]
    #[case("#", HASH)]
    #[case(")", RPAREN)]
    fn test_mark_characters_stand_alone(#[case] input: &str, #[case] kind: SyntaxKind) {
        assert_eq!(kinds(input), vec![(kind, input)]);
    }

    #[test]
    fn test_runs_are_split_per_character() {
        assert_eq!(
            kinds("**a~~"),
            vec![(STAR, "*"), (STAR, "*"), (TEXT, "a"), (TILDE, "~"), (TILDE, "~")]
        );
    }

    #[test]
    fn test_nested_container_prefix() {
        assert_eq!(
            kinds(">  - x"),
            vec![
                (GT, ">"),
                (WHITESPACE, "  "),
                (DASH, "-"),
                (WHITESPACE, " "),
                (TEXT, "x"),
            ]
        );
    }

    #[rstest]
    #[case("12. a", vec![(TEXT, "12."), (WHITESPACE, " "), (TEXT, "a")])]
    #[case("3) b", vec![(TEXT, "3"), (RPAREN, ")"), (WHITESPACE, " "), (TEXT, "b")])]
    fn test_ordered_numbers(#[case] input: &str, #[case] expected: Vec<(SyntaxKind, &str)>) {
        assert_eq!(kinds(input), expected);
    }

    #[test]
    fn test_task_box_is_text() {
        assert_eq!(
            kinds("- [x] done"),
            vec![
                (DASH, "-"),
                (WHITESPACE, " "),
                (TEXT, "[x]"),
                (WHITESPACE, " "),
                (TEXT, "done"),
            ]
        );
    }

    #[test]
    fn test_crlf_is_one_newline() {
        assert_eq!(kinds("a\r\nb"), vec![(TEXT, "a"), (NEWLINE, "\r\n"), (TEXT, "b")]);
    }

    #[test]
    fn test_lone_carriage_return_is_text() {
        let tokens = lex("a\rb");
        assert!(tokens.iter().all(|t| t.kind == TEXT));
        assert_eq!(tokens.iter().map(|t| t.text).collect::<String>(), "a\rb");
    }

    #[test]
    fn test_every_byte_is_kept() {
        let input = "## Heading\n\n> A *quote*\n\n1) List item\n   - Nested ünïcode\n\n```rust\ncode\n```";
        let text: String = lex(input).iter().map(|t| t.text).collect();
        assert_eq!(text, input);
    }
}

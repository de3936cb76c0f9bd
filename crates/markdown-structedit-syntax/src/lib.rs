//! # markdown-structedit-syntax
//!
//! A lossless Markdown syntax tree using [Rowan] + [Logos], following the
//! [rust-analyzer] architecture model. It is the structural view the editing
//! engine consults to find the list, quote and emphasis nodes around a caret.
//!
//! [Rowan]: https://docs.rs/rowan
//! [Logos]: https://docs.rs/logos
//! [rust-analyzer]: https://rust-analyzer.github.io/book/contributing/syntax.html
//!
//! ## What is a Lossless CST?
//!
//! Unlike an Abstract Syntax Tree (AST) which discards formatting details, a
//! Concrete Syntax Tree (CST) preserves **every byte** of the original source.
//! Every node's range is therefore a real byte range of the document, which is
//! what lets an editor turn "the list item under the cursor" into an edit.
//!
//! ## Architecture Overview
//!
//! The parsing pipeline has three stages:
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Events → Sink → Rowan Tree
//!               (Logos)          (Grammar)        (GreenNodeBuilder)
//! ```
//!
//! ### 1. Lexer ([`lexer`] module)
//!
//! The lexer uses [Logos] to tokenize input into a flat sequence of tokens.
//! Every character becomes part of some token - nothing is discarded.
//!
//! ```text
//! "# Hello\n" → [HASH, WHITESPACE, TEXT("Hello"), NEWLINE]
//! ```
//!
//! ### 2. Parser ([`parser`] module)
//!
//! The parser consumes tokens and emits **events** (Start, Token, Finish).
//! Block structure is decided line by line against a stack of open
//! containers; delimiters are glued into mark tokens on the way.
//!
//! ```text
//! Tokens → Events: [Start(HEADING), Token(HEADER_MARK), Token(WHITESPACE),
//!                   Token(TEXT), Token(NEWLINE), Finish]
//! ```
//!
//! ### 3. Sink ([`parser::sink`] module)
//!
//! The sink consumes events and builds a Rowan green tree using
//! `GreenNodeBuilder`. The resulting tree is immutable and can be
//! cheaply cloned (it's reference-counted internally).
//!
//! ## Module Structure
//!
//! ```text
//! markdown-structedit-syntax/
//! ├── lib.rs           # This file - public API and integration tests
//! ├── syntax_kind.rs   # SyntaxKind enum (tokens, marks, nodes) and Rowan integration
//! ├── lexer.rs         # Logos-based tokenizer
//! └── parser/
//!     ├── mod.rs       # Parser struct, Marker system, public parse() function
//!     ├── event.rs     # Event enum (Start, Token, Finish, Placeholder)
//!     ├── sink.rs      # Converts events to Rowan GreenNode
//!     └── grammar/
//!         ├── mod.rs   # Root document parsing
//!         ├── block.rs # Containers and leaf blocks (quotes, lists, fences)
//!         └── inline.rs# Delimited inline elements (code, emphasis)
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use markdown_structedit_syntax::{parse, SyntaxKind};
//!
//! let tree = parse("> - item\n");
//!
//! // The tree preserves all text
//! assert_eq!(tree.text().to_string(), "> - item\n");
//!
//! // Navigate the tree structure
//! let quote = tree.first_child().unwrap();
//! assert_eq!(quote.kind(), SyntaxKind::BLOCK_QUOTE);
//! let list = quote.first_child().unwrap();
//! assert_eq!(list.kind(), SyntaxKind::BULLET_LIST);
//! ```

pub mod lexer;
pub mod parser;
pub mod syntax_kind;

pub use parser::parse;
pub use syntax_kind::{MarkdownLang, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    /// Helper to format a syntax tree for snapshot testing.
    fn format_tree(node: &SyntaxNode, indent: usize) -> String {
        let mut result = String::new();
        let prefix = "  ".repeat(indent);

        result.push_str(&format!(
            "{}{:?}@{:?}\n",
            prefix,
            node.kind(),
            node.text_range()
        ));

        for child in node.children_with_tokens() {
            match child {
                rowan::NodeOrToken::Node(n) => {
                    result.push_str(&format_tree(&n, indent + 1));
                }
                rowan::NodeOrToken::Token(t) => {
                    result.push_str(&format!(
                        "{}  {:?}@{:?} {:?}\n",
                        prefix,
                        t.kind(),
                        t.text_range(),
                        t.text()
                    ));
                }
            }
        }

        result
    }

    #[test]
    fn snapshot_heading() {
        let tree = parse("# Hello\n");
        assert_snapshot!(format_tree(&tree, 0), @r##"
        ROOT@0..8
          HEADING@0..8
            HEADER_MARK@0..1 "#"
            WHITESPACE@1..2 " "
            TEXT@2..7 "Hello"
            NEWLINE@7..8 "\n"
        "##);
    }

    #[test]
    fn snapshot_nested_list() {
        let tree = parse("- a\n  - b\n");
        assert_snapshot!(format_tree(&tree, 0), @r#"
        ROOT@0..10
          BULLET_LIST@0..10
            LIST_ITEM@0..10
              LIST_MARK@0..1 "-"
              WHITESPACE@1..2 " "
              PARAGRAPH@2..4
                TEXT@2..3 "a"
                NEWLINE@3..4 "\n"
              WHITESPACE@4..6 "  "
              BULLET_LIST@6..10
                LIST_ITEM@6..10
                  LIST_MARK@6..7 "-"
                  WHITESPACE@7..8 " "
                  PARAGRAPH@8..10
                    TEXT@8..9 "b"
                    NEWLINE@9..10 "\n"
        "#);
    }

    #[test]
    fn snapshot_quote_continuation() {
        let tree = parse("> a\n> b\n");
        assert_snapshot!(format_tree(&tree, 0), @r#"
        ROOT@0..8
          BLOCK_QUOTE@0..8
            QUOTE_MARK@0..1 ">"
            WHITESPACE@1..2 " "
            PARAGRAPH@2..8
              TEXT@2..3 "a"
              NEWLINE@3..4 "\n"
              QUOTE_MARK@4..5 ">"
              WHITESPACE@5..6 " "
              TEXT@6..7 "b"
              NEWLINE@7..8 "\n"
        "#);
    }

    // === Error tolerance / messy input tests ===
    // Documents being edited are half-finished most of the time. These test
    // that we produce a valid tree for them, preserving all bytes.

    #[test]
    fn messy_real_world_notes() {
        let input = r#"#Meeting Notes 2024-01-15
(no space after #, technically not a heading per CommonMark)

##Action Items
- [ ] Call John about project
- [x] Review PR #123
* mixed bullet style
+ another style
  - nested but inconsistent indent
10) ten
11. eleven

> half finished blockquote
that continues without >
>> nested *quote

Some **unclosed strong and ~~strike

```python
def broken():
    # oops forgot to close the fence
"#;
        let tree = parse(input);
        assert_eq!(tree.text().to_string(), input);
    }

    #[test]
    fn roundtrip_preserves_text() {
        let inputs = [
            "Hello, world!\n",
            "# Heading\n",
            "> Quote\n",
            "- Item\n",
            "1) Item\r\n2) Item\r\n",
            "```\ncode\n```\n",
            "*emphasis*\n",
            "**strong**\n",
            "`code span`\n",
            "- \t- \t\t-",
            ">>>",
        ];

        for input in inputs {
            let tree = parse(input);
            assert_eq!(
                tree.text().to_string(),
                input,
                "Roundtrip failed for: {:?}",
                input
            );
        }
    }
}

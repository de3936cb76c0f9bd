//! # Parser Events
//!
//! Events are the intermediate representation between parsing and tree
//! building. The parser emits a **flat sequence** of them and the
//! [`Sink`](super::sink::Sink) replays it with a stack of open nodes:
//!
//! ```text
//! Start(BULLET_LIST)
//!   Start(LIST_ITEM)
//!     Token(LIST_MARK)     ← "-"
//!     Token(WHITESPACE)
//!     Start(PARAGRAPH)
//!       Token(TEXT)
//!       Token(NEWLINE)
//!     Finish
//!   Finish
//! Finish
//! ```

use crate::syntax_kind::SyntaxKind;

/// An event emitted by the parser during tree construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Begin a new composite node.
    Start { kind: SyntaxKind },

    /// Add a token to the current node.
    ///
    /// `n_raw_tokens` lexer tokens are glued into one token of `kind`. It is
    /// 1 for plain tokens and larger for marks such as `**` or `12)`.
    Token { kind: SyntaxKind, n_raw_tokens: u8 },

    /// Finish the current node.
    Finish,

    /// A reserved slot that `Marker::complete` turns into `Start`.
    ///
    /// An abandoned marker may leave one behind; the Sink ignores it.
    Placeholder,
}

impl Event {
    /// Create a start event.
    pub fn start(kind: SyntaxKind) -> Self {
        Event::Start { kind }
    }

    /// Create a token event for a single raw token.
    pub fn token(kind: SyntaxKind) -> Self {
        Event::Token {
            kind,
            n_raw_tokens: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_start_creation() {
        let event = Event::start(SyntaxKind::BLOCK_QUOTE);
        assert_eq!(
            event,
            Event::Start {
                kind: SyntaxKind::BLOCK_QUOTE
            }
        );
    }

    #[test]
    fn event_token_creation() {
        let event = Event::token(SyntaxKind::TEXT);
        assert_eq!(
            event,
            Event::Token {
                kind: SyntaxKind::TEXT,
                n_raw_tokens: 1
            }
        );
    }
}

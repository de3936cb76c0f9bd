//! # Parser - Event-Based Tree Construction
//!
//! The parser turns the token stream into a flat list of [`Event`]s which the
//! [`Sink`] then replays into a Rowan tree (the rust-analyzer architecture).
//!
//! Markdown block structure is decided line by line with lookahead, and a
//! container (blockquote, list, list item) stays open across many lines
//! before we know where it ends. Events make that cheap: a container is a
//! [`Marker`] held on a stack, and completing it later just appends a
//! `Finish` event.
//!
//! ## The Marker System
//!
//! `parser.start()` reserves a `Placeholder` event and returns a [`Marker`].
//! Every marker **must** be completed (`marker.complete(p, KIND)`) or
//! abandoned (`marker.abandon(p)`); dropping one is a bug and panics.
//!
//! ```ignore
//! let m = parser.start();
//! parser.bump_n(2, SyntaxKind::LIST_MARK); // "1" + ")" glued into one token
//! m.complete(parser, SyntaxKind::LIST_ITEM);
//! ```
//!
//! ## Public API
//!
//! ```
//! use markdown_structedit_syntax::{parse, SyntaxKind};
//!
//! let tree = parse("- item\n");
//! let list = tree.children().next().unwrap();
//! assert_eq!(list.kind(), SyntaxKind::BULLET_LIST);
//! ```

pub mod event;
pub mod sink;

mod grammar;

use crate::lexer::{Token, lex};
use crate::syntax_kind::{SyntaxKind, SyntaxNode};
use event::Event;
use sink::Sink;

/// The parser state machine.
///
/// Holds the token stream, current position, and accumulated events.
/// Grammar functions receive `&mut Parser` and use its methods to:
///
/// - Inspect tokens: `current()`, `nth()`, `nth_text()`, `at()`, `at_end()`
/// - Consume tokens: `bump()`, `bump_n()`, `eat()`
/// - Build structure: `start()` → `Marker` → `complete()`/`abandon()`
pub struct Parser<'t, 'input> {
    tokens: &'t [Token<'input>],
    pos: usize,
    events: Vec<Event>,
}

impl<'t, 'input> Parser<'t, 'input> {
    /// Create a new parser from a slice of tokens.
    pub fn new(tokens: &'t [Token<'input>]) -> Self {
        Self {
            tokens,
            pos: 0,
            events: Vec::new(),
        }
    }

    /// Parse the tokens and return a syntax tree.
    pub fn parse(mut self) -> SyntaxNode {
        grammar::root(&mut self);
        let sink = Sink::new(self.tokens, self.events);
        sink.finish()
    }

    /// Start a new node and return a marker.
    pub fn start(&mut self) -> Marker {
        let pos = self.events.len();
        self.events.push(Event::Placeholder);
        Marker {
            pos,
            completed: false,
        }
    }

    /// Current token kind, or EOF if past end.
    pub fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Look ahead n tokens.
    pub fn nth(&self, n: usize) -> SyntaxKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(SyntaxKind::EOF)
    }

    /// Text of the token n ahead, or `""` past the end.
    pub fn nth_text(&self, n: usize) -> &'input str {
        self.tokens.get(self.pos + n).map(|t| t.text).unwrap_or("")
    }

    /// Get the text of the current token.
    pub fn current_text(&self) -> &'input str {
        self.nth_text(0)
    }

    /// Absolute index of the current token, for bounding nested inline runs.
    pub fn token_index(&self) -> usize {
        self.pos
    }

    /// Check if at end of input.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Check if current token is of given kind.
    pub fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    /// True at a NEWLINE or at the end of input.
    pub fn at_line_end(&self) -> bool {
        matches!(self.current(), SyntaxKind::NEWLINE | SyntaxKind::EOF)
    }

    /// Consume the current token if it matches.
    pub fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume the current token unconditionally.
    pub fn bump(&mut self) {
        if !self.at_end() {
            let kind = self.current();
            self.events.push(Event::token(kind));
            self.pos += 1;
        }
    }

    /// Consume n tokens as a single composite token of the given kind.
    pub fn bump_n(&mut self, n: usize, kind: SyntaxKind) {
        if n == 0 || self.pos + n > self.tokens.len() {
            return;
        }
        // Absurdly long runs stay as raw tokens
        let Ok(n_raw_tokens) = u8::try_from(n) else {
            for _ in 0..n {
                self.bump();
            }
            return;
        };
        self.events.push(Event::Token { kind, n_raw_tokens });
        self.pos += n;
    }

    /// Consume everything up to (not including) the next line break.
    pub fn bump_to_line_end(&mut self) {
        while !self.at_line_end() {
            self.bump();
        }
    }
}

/// A marker for a node being constructed.
///
/// `parser.start()` pushes a `Placeholder` event and hands out a `Marker`
/// pointing at it. The marker must be completed, which turns the placeholder
/// into `Start { kind }` and pushes `Finish`, or abandoned. Dropping it
/// otherwise panics, so a forgotten container shows up as a test failure
/// instead of a corrupt tree.
#[must_use = "Markers must be completed or abandoned, dropping them is a bug"]
pub struct Marker {
    /// Position in the events vector where our Placeholder lives
    pos: usize,
    /// Tracks whether complete() or abandon() was called
    completed: bool,
}

impl Marker {
    /// Complete this marker, creating a node of the given kind.
    pub fn complete(mut self, p: &mut Parser<'_, '_>, kind: SyntaxKind) {
        self.completed = true;
        let event_at_pos = &mut p.events[self.pos];
        assert!(matches!(event_at_pos, Event::Placeholder));
        *event_at_pos = Event::Start { kind };
        p.events.push(Event::Finish);
    }

    /// Abandon this marker without creating a node.
    ///
    /// The placeholder is removed if nothing was pushed after it; otherwise
    /// it stays behind as an inert event the Sink ignores.
    pub fn abandon(mut self, p: &mut Parser<'_, '_>) {
        self.completed = true;
        if self.pos == p.events.len() - 1 {
            match p.events.pop() {
                Some(Event::Placeholder) => {}
                _ => unreachable!(),
            }
        }
    }
}

impl Drop for Marker {
    fn drop(&mut self) {
        if !self.completed && !std::thread::panicking() {
            panic!("Marker must be either completed or abandoned");
        }
    }
}

/// Parse markdown source into a syntax tree.
pub fn parse(source: &str) -> SyntaxNode {
    let tokens = lex(source);
    let parser = Parser::new(&tokens);
    parser.parse()
}

//! # Grammar Rules
//!
//! This module contains the grammar rules that drive parsing. Each function
//! takes a `&mut Parser` and uses its methods to:
//!
//! 1. Inspect the current token (`p.current()`, `p.at()`, `p.nth()`)
//! 2. Consume tokens (`p.bump()`, `p.bump_n()`, `p.eat()`)
//! 3. Build tree structure (`p.start()` → marker → `complete()`)
//!
//! ## Module Structure
//!
//! - [`block`] - Line-by-line container and leaf blocks (quotes, lists,
//!   headings, fences, paragraphs)
//! - [`inline`] - Delimited inline elements (code spans, emphasis,
//!   strikethrough)
//!
//! ## Writing Grammar Rules
//!
//! A typical grammar function looks like:
//!
//! ```ignore
//! fn heading(p: &mut Parser, level: usize) {
//!     let m = p.start();                          // 1. Start a node
//!     p.bump_n(level, SyntaxKind::HEADER_MARK);   // 2. Glue the `###` run
//!     inline::inline_line(p);                     // 3. Call other grammar rules
//!     p.eat(SyntaxKind::NEWLINE);
//!     m.complete(p, SyntaxKind::HEADING);         // 4. Complete the node
//! }
//! ```
//!
//! ## Error Recovery
//!
//! Grammar functions are lenient: any input produces a tree, and every input
//! byte ends up in exactly one token. Text that does not form a construct is
//! consumed into the current node as plain tokens.

mod block;
mod inline;

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Parse the root document.
///
/// This is the entry point for parsing. It creates a ROOT node containing
/// all top-level blocks in the document.
pub fn root(p: &mut Parser<'_, '_>) {
    let m = p.start();
    block::document(p);
    m.complete(p, SyntaxKind::ROOT);
}

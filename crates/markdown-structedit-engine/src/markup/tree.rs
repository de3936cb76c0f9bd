//! Caret-oriented lookups on the syntax tree.

use markdown_structedit_syntax::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
use rowan::{NodeOrToken, TextSize, TokenAtOffset};

use crate::editing::Document;
use crate::editing::document::to_range;

/// Start offset of a node or token.
pub fn start(element: &SyntaxElement) -> usize {
    element.text_range().start().into()
}

/// The innermost element the caret at `pos` sits in, looking at what ends
/// at `pos` rather than what starts there.
///
/// Mark tokens (`>`, `-`, `**`, ...) are returned as themselves, anything
/// else as its enclosing node. A node only contains the caret up to the end
/// of its last line with content, so a caret on a blank line after a list
/// resolves outside of it.
pub fn resolve_inner(root: &SyntaxNode, doc: &Document, pos: usize) -> SyntaxElement {
    let pos = pos.min(doc.len());
    let Some(token) = token_before(root, pos) else {
        return NodeOrToken::Node(root.clone());
    };
    if token.kind().is_mark() {
        return NodeOrToken::Token(token);
    }

    let Some(mut node) = token.parent() else {
        return NodeOrToken::Node(root.clone());
    };
    while node != *root && pos > content_end(&node, doc) {
        match node.parent() {
            Some(parent) => node = parent,
            None => break,
        }
    }
    NodeOrToken::Node(node)
}

/// The token ending at or spanning `pos`, if any.
pub fn token_before(root: &SyntaxNode, pos: usize) -> Option<SyntaxToken> {
    let offset = TextSize::from(pos as u32);
    match root.token_at_offset(offset) {
        TokenAtOffset::None => None,
        TokenAtOffset::Single(token) if token.text_range().start() == offset => None,
        TokenAtOffset::Single(token) => Some(token),
        TokenAtOffset::Between(left, _) => Some(left),
    }
}

/// End of the last line that holds a non-whitespace token of `node`.
pub fn content_end(node: &SyntaxNode, doc: &Document) -> usize {
    let range = to_range(node.text_range());
    let mut token = node.last_token();
    while let Some(t) = token {
        let t_start: usize = t.text_range().start().into();
        if t_start < range.start {
            break;
        }
        if !t.kind().is_trivia() {
            return doc.line_at(t_start).to;
        }
        token = t.prev_token();
    }
    range.end
}

/// The last child node or mark token of `node` that starts before `pos`.
pub fn child_before(node: &SyntaxNode, pos: usize) -> Option<SyntaxElement> {
    node.children_with_tokens()
        .take_while(|child| start(child) < pos)
        .filter(|child| match child {
            NodeOrToken::Node(_) => true,
            NodeOrToken::Token(token) => token.kind().is_mark(),
        })
        .last()
}

/// The node itself, or the parent of a token.
pub fn enclosing_node(element: &SyntaxElement) -> Option<SyntaxNode> {
    match element {
        NodeOrToken::Node(node) => Some(node.clone()),
        NodeOrToken::Token(token) => token.parent(),
    }
}

/// The closest ancestor (or self) of kind `kind` around the span
/// `from..to`.
pub fn covering_node(root: &SyntaxNode, from: usize, to: usize, kind: SyntaxKind) -> Option<SyntaxNode> {
    let len: usize = root.text_range().end().into();
    let range = rowan::TextRange::new(
        TextSize::from(from.min(len) as u32),
        TextSize::from(to.min(len) as u32),
    );
    let element = root.covering_element(range);
    enclosing_node(&element)?
        .ancestors()
        .find(|node| node.kind() == kind)
}

/// Whether the caret at `pos` edits Markdown rather than the body of a
/// fenced code block that names a language.
pub fn is_markdown_at(root: &SyntaxNode, doc: &Document, pos: usize) -> bool {
    let Some(token) = token_before(root, pos.min(doc.len())) else {
        return true;
    };
    let Some(fence) = token
        .parent_ancestors()
        .find(|node| node.kind() == SyntaxKind::FENCED_CODE)
    else {
        return true;
    };

    let info: String = fence
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .skip_while(|t| t.kind() == SyntaxKind::CODE_MARK)
        .take_while(|t| t.kind() != SyntaxKind::NEWLINE)
        .map(|t| t.text().to_string())
        .collect();
    let opening_line_end = doc.line_at(start(&NodeOrToken::Node(fence))).to;

    info.trim().is_empty() || pos <= opening_line_end
}

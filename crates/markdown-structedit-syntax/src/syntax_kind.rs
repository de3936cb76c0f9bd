//! SyntaxKind enum for all tokens and nodes in the Markdown CST.
//!
//! Following the rust-analyzer model, all tokens and nodes share a single enum.
//! Every byte in the source must appear as a token in the tree.

/// All syntax kinds for the Markdown CST.
///
/// This enum represents both tokens (lexer output, plus the composite mark
/// tokens the parser glues together) and nodes (parser output).
/// The `repr(u16)` ensures efficient storage in rowan's green tree.
///
/// We use SCREAMING_CASE following the rust-analyzer convention for SyntaxKind.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // === Tokens (lexer output) ===
    /// Horizontal whitespace (spaces, tabs)
    WHITESPACE,
    /// Line ending
    NEWLINE,
    /// Plain text content, including ordered list numbers such as `12.`
    TEXT,
    /// `>` character for blockquotes
    GT,
    /// `-` character for lists and thematic breaks
    DASH,
    /// `*` character for lists, emphasis, and thematic breaks
    STAR,
    /// `+` character for lists
    PLUS,
    /// `_` character for emphasis and thematic breaks
    UNDERSCORE,
    /// Single backtick for code spans and fences
    BACKTICK,
    /// `~` character for fenced code and strikethrough
    TILDE,
    /// `)` delimiter of ordered list markers
    RPAREN,
    /// `#` for headings
    HASH,

    // === Mark tokens (glued by the parser from raw tokens) ===
    /// `>` that opens a blockquote line
    QUOTE_MARK,
    /// Bullet (`-`, `*`, `+`) or ordered (`1.`, `1)`) list marker
    LIST_MARK,
    /// Run of `#` opening an ATX heading
    HEADER_MARK,
    /// Backtick or tilde run delimiting code spans and fences
    CODE_MARK,
    /// `*`/`_` run delimiting emphasis or strong emphasis
    EMPHASIS_MARK,
    /// `~~` delimiting strikethrough
    STRIKETHROUGH_MARK,

    /// End of file marker
    EOF,

    // === Composite Nodes (parser output) ===
    /// Root document node
    ROOT,
    /// Blockquote container (`> ...`)
    BLOCK_QUOTE,
    /// List whose items use `-`, `*` or `+`
    BULLET_LIST,
    /// List whose items use `1.` or `1)`
    ORDERED_LIST,
    /// Individual list item, starting at its marker
    LIST_ITEM,
    /// Paragraph block
    PARAGRAPH,
    /// ATX heading (`# ...`)
    HEADING,
    /// Thematic break (`---`, `***`, etc.)
    THEMATIC_BREAK,
    /// Fenced code block
    FENCED_CODE,
    /// Inline code span
    CODE_SPAN,
    /// Emphasis `*text*`
    EMPHASIS,
    /// Strong emphasis `**text**`
    STRONG,
    /// Strikethrough `~~text~~`
    STRIKETHROUGH,

    /// Error recovery node
    ERROR,
}

impl SyntaxKind {
    /// Returns true if this kind represents a token (lexer output or mark).
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::EOF as u16)
    }

    /// Returns true if this kind represents a composite node.
    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    /// Returns true if this kind is trivia (whitespace/newlines).
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::NEWLINE)
    }

    /// Returns true for the composite tokens that carry Markdown syntax.
    pub fn is_mark(self) -> bool {
        matches!(
            self,
            Self::QUOTE_MARK
                | Self::LIST_MARK
                | Self::HEADER_MARK
                | Self::CODE_MARK
                | Self::EMPHASIS_MARK
                | Self::STRIKETHROUGH_MARK
        )
    }

    /// Returns true for the two list container kinds.
    pub fn is_list(self) -> bool {
        matches!(self, Self::BULLET_LIST | Self::ORDERED_LIST)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language definition for rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MarkdownLang {}

impl rowan::Language for MarkdownLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::ERROR as u16);
        // SAFETY: We check bounds above and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type alias for our syntax nodes.
pub type SyntaxNode = rowan::SyntaxNode<MarkdownLang>;
/// Type alias for our syntax tokens.
pub type SyntaxToken = rowan::SyntaxToken<MarkdownLang>;
/// Type alias for syntax elements (node or token).
pub type SyntaxElement = rowan::SyntaxElement<MarkdownLang>;

#[cfg(test)]
mod tests {
    use super::*;
    use rowan::Language;

    #[test]
    fn token_kinds_are_tokens() {
        assert!(SyntaxKind::WHITESPACE.is_token());
        assert!(SyntaxKind::TEXT.is_token());
        assert!(SyntaxKind::LIST_MARK.is_token());
        assert!(SyntaxKind::EOF.is_token());
    }

    #[test]
    fn node_kinds_are_nodes() {
        assert!(SyntaxKind::ROOT.is_node());
        assert!(SyntaxKind::PARAGRAPH.is_node());
        assert!(SyntaxKind::ORDERED_LIST.is_node());
    }

    #[test]
    fn trivia_detection() {
        assert!(SyntaxKind::WHITESPACE.is_trivia());
        assert!(SyntaxKind::NEWLINE.is_trivia());
        assert!(!SyntaxKind::TEXT.is_trivia());
    }

    #[test]
    fn mark_detection() {
        assert!(SyntaxKind::QUOTE_MARK.is_mark());
        assert!(SyntaxKind::EMPHASIS_MARK.is_mark());
        assert!(!SyntaxKind::GT.is_mark());
        assert!(!SyntaxKind::LIST_ITEM.is_mark());
    }

    #[test]
    fn rowan_conversion_roundtrip() {
        let kind = SyntaxKind::BULLET_LIST;
        let raw: rowan::SyntaxKind = kind.into();
        let back = MarkdownLang::kind_from_raw(raw);
        assert_eq!(kind, back);
    }
}

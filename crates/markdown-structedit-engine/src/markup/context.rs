//! The stack of container markup (quotes, list items, code fences) around a
//! position, measured on the line where each container starts.

use std::sync::OnceLock;

use markdown_structedit_config::EditorConfig;
use markdown_structedit_syntax::{SyntaxElement, SyntaxKind, SyntaxNode};
use regex::Regex;

use crate::editing::document::{count_column, text_from};
use crate::editing::Document;
use crate::markup::tree;

/// One level of container markup.
///
/// `from..to` are byte columns of the container's first line: `to` is where
/// its content starts, so `to - space_after.len()` is the end of the marker
/// glyphs themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextFrame {
    /// The quote, the list (for items) or the fenced code block
    pub node: SyntaxNode,
    pub from: usize,
    pub to: usize,
    /// Indentation between the container start and its marker
    pub space_before: String,
    /// Whitespace between the marker and the content
    pub space_after: String,
    /// Marker glyphs: `>`, the bullet (plus `[ ]` for tasks) or the ordered
    /// delimiter
    pub marker_type: String,
    /// The list item, for list frames
    pub item: Option<SyntaxNode>,
}

impl ContextFrame {
    pub fn is_quote(&self) -> bool {
        self.node.kind() == SyntaxKind::BLOCK_QUOTE
    }

    pub fn is_ordered(&self) -> bool {
        self.node.kind() == SyntaxKind::ORDERED_LIST
    }

    /// End column of the marker glyphs
    pub fn marker_end(&self) -> usize {
        self.to - self.space_after.len()
    }

    /// Continuation prefix for this frame without a list marker: `>` for
    /// quotes, spaces in place of list markers.
    ///
    /// With `max_width` the result is padded with spaces to that width.
    /// Otherwise it is padded to the frame's width, and `trailing` decides
    /// whether the space after the marker is included.
    pub fn blank(&self, max_width: Option<usize>, trailing: bool) -> String {
        let mut result = self.space_before.clone();
        if self.is_quote() {
            result.push('>');
        }
        match max_width {
            Some(width) => {
                while result.len() < width {
                    result.push(' ');
                }
                result
            }
            None => {
                let width = (self.to - self.from).saturating_sub(result.len() + self.space_after.len());
                result.push_str(&" ".repeat(width));
                if trailing {
                    result.push_str(&self.space_after);
                }
                result
            }
        }
    }

    /// The marker for a new sibling item (or quote line). Ordered lists use
    /// the current item's number plus `add`.
    pub fn marker(&self, doc: &Document, add: u64) -> String {
        let number = match (&self.item, self.is_ordered()) {
            (Some(item), true) => item_number(item, doc)
                .map(|n| (n.number + add).to_string())
                .unwrap_or_default(),
            _ => String::new(),
        };
        format!(
            "{}{}{}{}",
            self.space_before, number, self.marker_type, self.space_after
        )
    }
}

fn quote_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^ *>( ?)").expect("valid quote regex"))
}

fn ordered_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^( *)\d+([.)])( *)").expect("valid ordered marker regex"))
}

fn bullet_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^( *)([-+*])( {1,4}\[[ xX]\])?( +)").expect("valid bullet marker regex")
    })
}

fn item_number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\s*)(\d+)[.)]").expect("valid item number regex"))
}

/// Collect the container frames around `element`, outermost first.
///
/// Containers whose first line doesn't carry a recognisable marker are left
/// out. Inside a fenced code block the fence is the only frame, with no
/// markup.
pub fn get_context(element: &SyntaxElement, doc: &Document) -> Vec<ContextFrame> {
    let mut nodes = Vec::new();
    let mut current = tree::enclosing_node(element);
    while let Some(node) = current {
        match node.kind() {
            SyntaxKind::LIST_ITEM | SyntaxKind::BLOCK_QUOTE | SyntaxKind::FENCED_CODE => {
                nodes.push(node.clone())
            }
            _ => {}
        }
        current = node.parent();
    }

    let mut context = Vec::new();
    for node in nodes.into_iter().rev() {
        let node_from: usize = node.text_range().start().into();
        let line = doc.line_at(node_from);
        let start = node_from - line.from;
        let text = text_from(&line.text, start);

        match node.kind() {
            SyntaxKind::FENCED_CODE => context.push(ContextFrame {
                node,
                from: start,
                to: start,
                space_before: String::new(),
                space_after: String::new(),
                marker_type: String::new(),
                item: None,
            }),
            SyntaxKind::BLOCK_QUOTE => {
                if let Some(caps) = quote_regex().captures(text) {
                    context.push(ContextFrame {
                        from: start,
                        to: start + caps[0].len(),
                        space_before: String::new(),
                        space_after: caps[1].to_string(),
                        marker_type: ">".to_string(),
                        item: None,
                        node,
                    });
                }
            }
            SyntaxKind::LIST_ITEM => {
                if let Some(frame) = list_frame(node, start, text) {
                    context.push(frame);
                }
            }
            _ => {}
        }
    }
    context
}

fn list_frame(item: SyntaxNode, start: usize, text: &str) -> Option<ContextFrame> {
    let list = item.parent()?;
    match list.kind() {
        SyntaxKind::ORDERED_LIST => {
            let caps = ordered_regex().captures(text)?;
            let mut after = caps[3].to_string();
            let mut len = caps[0].len();
            // Four or more spaces: the extra ones are content indentation
            if after.len() >= 4 {
                after.truncate(after.len() - 4);
                len -= 4;
            }
            Some(ContextFrame {
                node: list,
                from: start,
                to: start + len,
                space_before: caps[1].to_string(),
                space_after: after,
                marker_type: caps[2].to_string(),
                item: Some(item),
            })
        }
        SyntaxKind::BULLET_LIST => {
            let caps = bullet_regex().captures(text)?;
            let mut after = caps[4].to_string();
            let mut len = caps[0].len();
            if after.len() > 4 {
                after.truncate(after.len() - 4);
                len -= 4;
            }
            let mut marker_type = caps[2].to_string();
            if let Some(task) = caps.get(3) {
                // New task items start unchecked
                marker_type.push_str(&task.as_str().replace(['x', 'X'], " "));
            }
            Some(ContextFrame {
                node: list,
                from: start,
                to: start + len,
                space_before: caps[1].to_string(),
                space_after: after,
                marker_type,
                item: Some(item),
            })
        }
        _ => None,
    }
}

/// The number of an ordered list item, with the byte spans of its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemNumber {
    /// Length of the whitespace before the digits
    pub indent: usize,
    /// Length of whitespace plus digits
    pub digits_end: usize,
    pub number: u64,
}

/// Read the number of an ordered list item from its first few bytes.
pub fn item_number(item: &SyntaxNode, doc: &Document) -> Option<ItemNumber> {
    let from: usize = item.text_range().start().into();
    let head = doc.slice(from, from + 10);
    let caps = item_number_regex().captures(head)?;
    let number = caps[2].parse().ok()?;
    Some(ItemNumber {
        indent: caps[1].len(),
        digits_end: caps[1].len() + caps[2].len(),
        number,
    })
}

/// Rewrite the leading blank run of `content` as tabs when the indent unit
/// is a tab. Space indentation is returned unchanged.
pub fn normalize_indent(content: &str, config: &EditorConfig) -> String {
    let blank_len = content.len() - content.trim_start_matches([' ', '\t']).len();
    if blank_len == 0 || !config.indent_unit.is_tab() {
        return content.to_string();
    }
    let tab_size = config.tab_size.max(1);
    let col = count_column(content, tab_size, blank_len);
    let mut result = "\t".repeat(col / tab_size);
    result.push_str(&" ".repeat(col % tab_size));
    result.push_str(&content[blank_len..]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdown_structedit_config::IndentUnit;
    use markdown_structedit_syntax::parse;
    use pretty_assertions::assert_eq;
    use rowan::NodeOrToken;

    /// Context of the deepest node of `kind`.
    fn context_of(text: &str, kind: SyntaxKind) -> (Document, Vec<ContextFrame>) {
        let doc = Document::new(text);
        let tree = parse(text);
        let node = tree.descendants().filter(|n| n.kind() == kind).last().unwrap();
        let context = get_context(&NodeOrToken::Node(node), &doc);
        (doc, context)
    }

    /// `(from, to, space_before, space_after, marker_type)` per frame.
    fn shape(context: &[ContextFrame]) -> Vec<(usize, usize, &str, &str, &str)> {
        context
            .iter()
            .map(|f| {
                (
                    f.from,
                    f.to,
                    f.space_before.as_str(),
                    f.space_after.as_str(),
                    f.marker_type.as_str(),
                )
            })
            .collect()
    }

    // ============ Frame extraction tests ============

    #[test]
    fn test_bullet_frame() {
        let (_, context) = context_of("- item", SyntaxKind::PARAGRAPH);
        assert_eq!(shape(&context), vec![(0, 2, "", " ", "-")]);
        assert_eq!(context[0].node.kind(), SyntaxKind::BULLET_LIST);
        assert!(context[0].item.is_some());
    }

    #[test]
    fn test_quote_then_list() {
        let (_, context) = context_of("> 1. item", SyntaxKind::PARAGRAPH);
        assert_eq!(
            shape(&context),
            vec![(0, 2, "", " ", ">"), (2, 5, "", " ", ".")]
        );
        assert!(context[0].is_quote());
        assert!(context[1].is_ordered());
    }

    #[test]
    fn test_nested_item_frames_use_their_own_line() {
        let (_, context) = context_of("- a\n  - b", SyntaxKind::PARAGRAPH);
        assert_eq!(
            shape(&context),
            vec![(0, 2, "", " ", "-"), (2, 4, "", " ", "-")]
        );
    }

    #[test]
    fn test_task_marker_is_unchecked() {
        let (_, context) = context_of("- [x] done", SyntaxKind::PARAGRAPH);
        assert_eq!(shape(&context), vec![(0, 6, "", " ", "- [ ]")]);
    }

    #[test]
    fn test_wide_spacing_keeps_one_column() {
        let (_, context) = context_of("1.     code", SyntaxKind::LIST_ITEM);
        assert_eq!(shape(&context), vec![(0, 3, "", " ", ".")]);
    }

    #[test]
    fn test_fence_frame_is_empty() {
        let (_, context) = context_of("- a\n\n  ```\n  code\n  ```", SyntaxKind::FENCED_CODE);
        assert_eq!(context.len(), 2);
        assert_eq!(context[1].node.kind(), SyntaxKind::FENCED_CODE);
        assert_eq!((context[1].from, context[1].to), (2, 2));
    }

    // ============ Prefix construction tests ============

    #[test]
    fn test_marker_increments_ordered_number() {
        let (doc, context) = context_of("9) nine", SyntaxKind::PARAGRAPH);
        assert_eq!(context[0].marker(&doc, 1), "10) ");
        assert_eq!(context[0].marker(&doc, 0), "9) ");
    }

    #[test]
    fn test_blank_replaces_markers() {
        let (_, context) = context_of("> - item", SyntaxKind::PARAGRAPH);
        assert_eq!(context[0].blank(None, true), "> ");
        assert_eq!(context[0].blank(None, false), ">");
        assert_eq!(context[1].blank(None, true), "  ");
        assert_eq!(context[0].blank(Some(4), true), ">   ");
    }

    #[test]
    fn test_item_number() {
        let (doc, _) = context_of("12. twelve", SyntaxKind::PARAGRAPH);
        let tree = parse(doc.text());
        let item = tree
            .descendants()
            .find(|n| n.kind() == SyntaxKind::LIST_ITEM)
            .unwrap();
        assert_eq!(
            item_number(&item, &doc),
            Some(ItemNumber {
                indent: 0,
                digits_end: 2,
                number: 12,
            })
        );
    }

    // ============ Indent normalization tests ============

    #[test]
    fn test_normalize_indent_with_tabs() {
        let config = EditorConfig {
            indent_unit: IndentUnit::Tab,
            ..EditorConfig::default()
        };
        assert_eq!(normalize_indent("      - ", &config), "\t  - ");
        assert_eq!(normalize_indent("- ", &config), "- ");
    }

    #[test]
    fn test_normalize_indent_keeps_spaces() {
        let config = EditorConfig::default();
        assert_eq!(normalize_indent("      - ", &config), "      - ");
    }
}

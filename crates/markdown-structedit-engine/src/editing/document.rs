use std::ops::Range;

use xi_rope::Rope;

use crate::editing::ChangeSet;

/// One line of a [`Document`], without its line break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Offset of the first byte of the line
    pub from: usize,
    /// Offset just before the line break (or the end of the document)
    pub to: usize,
    /// 1-based line number
    pub number: usize,
    pub text: String,
}

/// Immutable document text with line addressing.
///
/// The xi-rope buffer is the source of truth and edits are applied to it as
/// Deltas; a flat copy of the text and the line start table are kept
/// alongside so line lookups and regex matching don't walk the rope.
/// Editing never mutates a document in place, [`Document::apply`] returns a
/// new one.
#[derive(Debug, Clone)]
pub struct Document {
    buffer: Rope,
    text: String,
    /// Offset of the start of every line
    line_starts: Vec<usize>,
    line_break: &'static str,
}

impl Document {
    pub fn new(text: &str) -> Self {
        Self::with_line_break(text, "\n")
    }

    /// Create a document whose inserted line breaks are `line_break`.
    pub fn with_line_break(text: &str, line_break: &'static str) -> Self {
        Self {
            buffer: Rope::from(text),
            text: text.to_string(),
            line_starts: line_starts(text),
            line_break,
        }
    }

    /// Create a new document from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        // Convert bytes to string, ensuring valid UTF-8
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::new(text))
    }

    /// Get the document's content as raw bytes (exact round-trip)
    pub fn to_bytes(&self) -> Vec<u8> {
        self.text.clone().into_bytes()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The line break inserted by editing commands
    pub fn line_break(&self) -> &'static str {
        self.line_break
    }

    /// Number of lines (an empty document has one empty line)
    pub fn lines(&self) -> usize {
        self.line_starts.len()
    }

    /// Line by 1-based number, clamped to the existing lines.
    pub fn line(&self, number: usize) -> Line {
        let index = number.clamp(1, self.lines()) - 1;
        self.line_by_index(index)
    }

    /// The line containing `offset`, clamped to the document.
    pub fn line_at(&self, offset: usize) -> Line {
        let offset = offset.min(self.len());
        let index = match self.line_starts.binary_search(&offset) {
            Ok(index) => index,
            Err(next) => next - 1,
        };
        self.line_by_index(index)
    }

    /// Text between two offsets, clamped to the document and to character
    /// boundaries.
    pub fn slice(&self, from: usize, to: usize) -> &str {
        slice_text(&self.text, from, to)
    }

    /// Offset `count` characters before `pos`, stopping at the start.
    pub fn chars_before(&self, pos: usize, count: usize) -> usize {
        let head = self.slice(0, pos);
        head.char_indices()
            .rev()
            .nth(count.saturating_sub(1))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    /// Apply a change set, producing the edited document.
    pub fn apply(&self, changes: &ChangeSet) -> Document {
        let delta = changes.to_delta();
        let buffer = delta.apply(&self.buffer);
        let text = buffer.to_string();
        Self {
            line_starts: line_starts(&text),
            buffer,
            text,
            line_break: self.line_break,
        }
    }

    fn line_by_index(&self, index: usize) -> Line {
        let from = self.line_starts[index];
        let to = match self.line_starts.get(index + 1) {
            Some(next) => {
                let end = next - 1;
                if end > from && self.text.as_bytes()[end - 1] == b'\r' {
                    end - 1
                } else {
                    end
                }
            }
            None => self.len(),
        };
        Line {
            from,
            to,
            number: index + 1,
            text: self.text[from..to].to_string(),
        }
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.line_break == other.line_break
    }
}

fn line_starts(text: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(text.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}

/// Slice `text`, clamping both ends to its length and rounding them down to
/// character boundaries.
pub(crate) fn slice_text(text: &str, from: usize, to: usize) -> &str {
    let to = floor_boundary(text, to);
    let from = floor_boundary(text, from).min(to);
    &text[from..to]
}

/// Everything in `text` from `from` on (empty past the end).
pub(crate) fn text_from(text: &str, from: usize) -> &str {
    slice_text(text, from, text.len())
}

fn floor_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Visual column of byte offset `to` in `text`, expanding tabs to `tab_size`.
pub fn count_column(text: &str, tab_size: usize, to: usize) -> usize {
    let tab_size = tab_size.max(1);
    slice_text(text, 0, to).chars().fold(0, |col, c| {
        if c == '\t' {
            col + tab_size - col % tab_size
        } else {
            col + 1
        }
    })
}

/// Byte range helper for rowan ranges.
pub(crate) fn to_range(range: rowan::TextRange) -> Range<usize> {
    range.start().into()..range.end().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ============ Basic document tests ============

    #[test]
    fn test_document_from_bytes_valid_utf8() {
        let doc = Document::from_bytes("# Hello 世界".as_bytes()).unwrap();
        assert_eq!(doc.text(), "# Hello 世界");
        assert_eq!(doc.to_bytes(), "# Hello 世界".as_bytes());
    }

    #[test]
    fn test_document_from_bytes_invalid_utf8() {
        let invalid = vec![0xFF, 0xFE, 0xFD];
        assert!(Document::from_bytes(&invalid).is_err());
    }

    // ============ Line addressing tests ============

    #[test]
    fn test_line_at() {
        let doc = Document::new("one\ntwo\n\nfour");
        assert_eq!(doc.lines(), 4);

        let line = doc.line_at(5);
        assert_eq!(
            line,
            Line {
                from: 4,
                to: 7,
                number: 2,
                text: "two".to_string(),
            }
        );
        // The line break belongs to the line it ends
        assert_eq!(doc.line_at(3).number, 1);
        assert_eq!(doc.line_at(8).text, "");
        assert_eq!(doc.line_at(100).number, 4);
    }

    #[test]
    fn test_empty_document_has_one_line() {
        let doc = Document::new("");
        assert_eq!(doc.lines(), 1);
        assert_eq!(doc.line(1).to, 0);
        assert_eq!(doc.line_at(0).text, "");
    }

    #[test]
    fn test_crlf_lines_exclude_carriage_return() {
        let doc = Document::new("a\r\nbc\r\n");
        let first = doc.line(1);
        assert_eq!((first.from, first.to, first.text.as_str()), (0, 1, "a"));
        let second = doc.line(2);
        assert_eq!((second.from, second.to, second.text.as_str()), (3, 5, "bc"));
        assert_eq!(doc.line(3).from, 7);
    }

    #[test]
    fn test_line_numbers_are_clamped() {
        let doc = Document::new("a\nb");
        assert_eq!(doc.line(0).text, "a");
        assert_eq!(doc.line(9).text, "b");
    }

    // ============ Slicing tests ============

    #[test]
    fn test_slice_clamps_to_bounds() {
        let doc = Document::new("Hello");
        assert_eq!(doc.slice(1, 3), "el");
        assert_eq!(doc.slice(3, 100), "lo");
        assert_eq!(doc.slice(4, 2), "");
    }

    #[test]
    fn test_slice_respects_char_boundaries() {
        let doc = Document::new("a世b");
        // 世 occupies bytes 1..4
        assert_eq!(doc.slice(0, 2), "a");
        assert_eq!(doc.slice(2, 5), "世b");
    }

    #[test]
    fn test_chars_before() {
        let doc = Document::new("ab世c");
        assert_eq!(doc.chars_before(5, 1), 2);
        assert_eq!(doc.chars_before(5, 2), 1);
        assert_eq!(doc.chars_before(1, 5), 0);
    }

    #[test]
    fn test_count_column_expands_tabs() {
        assert_eq!(count_column("\t- a", 4, 1), 4);
        assert_eq!(count_column("  \t- a", 4, 3), 4);
        assert_eq!(count_column("ab", 4, 10), 2);
        assert_eq!(count_column("\t\t", 2, 2), 4);
    }
}

use markdown_structedit_syntax::{SyntaxKind, SyntaxNode};

use crate::editing::{ChangeSpec, Document};
use crate::markup::context::item_number;

/// Renumber the ordered list items following `after` (inclusive).
///
/// Walks the siblings of `after` while they keep counting up by one and
/// rewrites each number to `previous + 2 + offset`: with `offset == 0` the
/// run shifts up to make room for an inserted item, with `offset == -2` it
/// shifts down after one was removed. Stops at the first gap so separately
/// numbered runs are left alone.
pub fn renumber_list(after: &SyntaxNode, doc: &Document, changes: &mut Vec<ChangeSpec>, offset: i64) {
    let mut prev: Option<u64> = None;
    let items = std::iter::successors(Some(after.clone()), |node| node.next_sibling())
        .filter(|node| node.kind() == SyntaxKind::LIST_ITEM);

    for item in items {
        let Some(number) = item_number(&item, doc) else {
            return;
        };
        if let Some(prev) = prev {
            if number.number != prev + 1 {
                return;
            }
            let from: usize = item.text_range().start().into();
            let renumbered = (prev as i64 + 2 + offset).max(0);
            log::trace!("renumbering list item at {from} to {renumbered}");
            changes.push(ChangeSpec::replace(
                from + number.indent,
                from + number.digits_end,
                renumbered.to_string(),
            ));
        }
        prev = Some(number.number);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::ChangeSet;
    use markdown_structedit_syntax::parse;
    use pretty_assertions::assert_eq;

    fn renumber(text: &str, item_index: usize, offset: i64) -> String {
        let doc = Document::new(text);
        let tree = parse(text);
        let item = tree
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::LIST_ITEM)
            .nth(item_index)
            .unwrap();
        let mut changes = Vec::new();
        renumber_list(&item, &doc, &mut changes, offset);
        let set = ChangeSet::new(changes, doc.len()).unwrap();
        doc.apply(&set).text().to_string()
    }

    #[test]
    fn test_shift_up_for_inserted_item() {
        assert_eq!(renumber("1. a\n2. b\n3. c", 0, 0), "1. a\n3. b\n4. c");
    }

    #[test]
    fn test_shift_down_after_removed_item() {
        assert_eq!(renumber("1. a\n2. \n3. b\n4. c", 1, -2), "1. a\n2. \n2. b\n3. c");
    }

    #[test]
    fn test_stops_at_numbering_gap() {
        assert_eq!(renumber("1. a\n2. b\n7. c", 0, 0), "1. a\n3. b\n7. c");
    }

    #[test]
    fn test_single_item_is_untouched() {
        assert_eq!(renumber("1. only", 0, 0), "1. only");
    }

    #[test]
    fn test_paren_delimiters() {
        assert_eq!(renumber("1) a\n2) b", 0, 0), "1) a\n3) b");
    }
}

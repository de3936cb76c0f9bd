use thiserror::Error;
use xi_rope::delta::Builder;
use xi_rope::{Delta, Rope, RopeInfo};

use crate::editing::Selection;

/// Replace `from..to` of the original document with `insert`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSpec {
    pub from: usize,
    pub to: usize,
    pub insert: String,
}

impl ChangeSpec {
    pub fn replace(from: usize, to: usize, insert: impl Into<String>) -> Self {
        Self {
            from,
            to,
            insert: insert.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::replace(at, at, text)
    }

    pub fn delete(from: usize, to: usize) -> Self {
        Self::replace(from, to, "")
    }

    fn is_noop(&self) -> bool {
        self.from == self.to && self.insert.is_empty()
    }

    /// Change in document length caused by this change.
    fn len_delta(&self) -> isize {
        self.insert.len() as isize - (self.to - self.from) as isize
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error("change {from}..{to} overlaps an earlier change ending at {prev_to}")]
    Overlap {
        from: usize,
        to: usize,
        prev_to: usize,
    },

    #[error("change {from}..{to} is outside the document (length {len})")]
    OutOfBounds { from: usize, to: usize, len: usize },
}

/// Which side of an insertion a mapped position ends up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Before,
    After,
}

/// A validated batch of changes, all expressed against the same document.
///
/// Changes are sorted by position and never overlap, so they can be compiled
/// into a single xi-rope Delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    changes: Vec<ChangeSpec>,
    doc_len: usize,
}

impl ChangeSet {
    /// Validate and sort `changes`. No-op changes and exact duplicates are
    /// dropped.
    pub fn new(changes: Vec<ChangeSpec>, doc_len: usize) -> Result<Self, TransactionError> {
        let mut changes: Vec<ChangeSpec> = changes.into_iter().filter(|c| !c.is_noop()).collect();
        changes.sort_by_key(|c| (c.from, c.to));
        changes.dedup();

        for change in &changes {
            if change.from > change.to || change.to > doc_len {
                return Err(TransactionError::OutOfBounds {
                    from: change.from,
                    to: change.to,
                    len: doc_len,
                });
            }
        }
        for pair in changes.windows(2) {
            if pair[1].from < pair[0].to {
                return Err(TransactionError::Overlap {
                    from: pair[1].from,
                    to: pair[1].to,
                    prev_to: pair[0].to,
                });
            }
        }

        Ok(Self { changes, doc_len })
    }

    pub fn empty(doc_len: usize) -> Self {
        Self {
            changes: Vec::new(),
            doc_len,
        }
    }

    pub fn changes(&self) -> &[ChangeSpec] {
        &self.changes
    }

    pub fn into_changes(self) -> Vec<ChangeSpec> {
        self.changes
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Length of the document these changes apply to
    pub fn doc_len(&self) -> usize {
        self.doc_len
    }

    /// Length of the document after applying the changes
    pub fn new_len(&self) -> usize {
        let delta: isize = self.changes.iter().map(ChangeSpec::len_delta).sum();
        (self.doc_len as isize + delta) as usize
    }

    /// Map a position in the original document to the edited one.
    ///
    /// Positions inside a replaced span move to its start, or to its end
    /// with `Assoc::After`. A span's own start always maps to the start of
    /// its replacement.
    pub fn map_pos(&self, pos: usize, assoc: Assoc) -> usize {
        let mut shift: isize = 0;
        for change in &self.changes {
            let insertion_here = change.from == change.to && change.to == pos;
            if change.to > pos || (insertion_here && assoc == Assoc::Before) {
                if change.from > pos {
                    break;
                }
                let start = (change.from as isize + shift) as usize;
                return if pos == change.from || assoc == Assoc::Before {
                    start
                } else {
                    start + change.insert.len()
                };
            }
            shift += change.len_delta();
        }
        (pos as isize + shift) as usize
    }

    /// Ranges of the edited document covered by inserted text. Deletions
    /// show up as empty ranges at the deletion point.
    pub fn changed_ranges(&self) -> Vec<std::ops::Range<usize>> {
        let mut shift: isize = 0;
        self.changes
            .iter()
            .map(|change| {
                let start = (change.from as isize + shift) as usize;
                shift += change.len_delta();
                start..start + change.insert.len()
            })
            .collect()
    }

    /// Compile the changes into a Delta over the original rope.
    pub(crate) fn to_delta(&self) -> Delta<RopeInfo> {
        let mut builder = Builder::new(self.doc_len);
        for change in &self.changes {
            builder.replace(change.from..change.to, Rope::from(change.insert.as_str()));
        }
        builder.build()
    }
}

/// The result of a command: changes plus the selection to use afterwards.
/// Without an explicit selection the old one is mapped through the changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub changes: ChangeSet,
    pub selection: Option<Selection>,
}

impl Transaction {
    pub fn new(changes: ChangeSet, selection: Option<Selection>) -> Self {
        Self { changes, selection }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

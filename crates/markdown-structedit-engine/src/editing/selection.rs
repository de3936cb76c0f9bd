use crate::editing::transaction::{Assoc, ChangeSet};

/// A caret (`anchor == head`) or a selected span. The head is the end that
/// moves; it may sit before the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionRange {
    pub anchor: usize,
    pub head: usize,
}

impl SelectionRange {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    pub fn cursor(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    pub fn from(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn to(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    /// Map the range through a change set. A caret sticks to text before an
    /// insertion at its position; a span keeps insertions at its edges
    /// outside.
    pub fn map(&self, changes: &ChangeSet) -> Self {
        if self.is_empty() {
            return Self::cursor(changes.map_pos(self.head, Assoc::Before));
        }
        let from = changes.map_pos(self.from(), Assoc::After);
        let to = changes.map_pos(self.to(), Assoc::Before).max(from);
        if self.anchor <= self.head {
            Self::new(from, to)
        } else {
            Self::new(to, from)
        }
    }

    fn clamp(&self, len: usize) -> Self {
        Self::new(self.anchor.min(len), self.head.min(len))
    }
}

/// One or more ranges, kept sorted and non-overlapping, with one of them
/// marked as the main range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    ranges: Vec<SelectionRange>,
    main: usize,
}

impl Selection {
    /// Build a selection, sorting the ranges and merging any that overlap.
    /// An empty list becomes a caret at 0.
    pub fn new(ranges: Vec<SelectionRange>, main: usize) -> Self {
        if ranges.is_empty() {
            return Self::cursor(0);
        }
        let main_range = ranges[main.min(ranges.len() - 1)];

        let mut sorted = ranges;
        sorted.sort_by_key(|r| (r.from(), r.to()));

        let mut merged: Vec<SelectionRange> = Vec::with_capacity(sorted.len());
        let mut main = 0;
        for range in sorted {
            let overlaps = merged.last().is_some_and(|last| {
                range.from() < last.to() || (range.from() == last.to() && range.is_empty())
            });
            if overlaps {
                let last = merged.len() - 1;
                let from = merged[last].from();
                let to = merged[last].to().max(range.to());
                merged[last] = SelectionRange::new(from, to);
            } else {
                merged.push(range);
            }
            if range == main_range {
                main = merged.len() - 1;
            }
        }

        Self {
            ranges: merged,
            main,
        }
    }

    pub fn single(anchor: usize, head: usize) -> Self {
        Self {
            ranges: vec![SelectionRange::new(anchor, head)],
            main: 0,
        }
    }

    pub fn cursor(pos: usize) -> Self {
        Self::single(pos, pos)
    }

    pub fn ranges(&self) -> &[SelectionRange] {
        &self.ranges
    }

    pub fn main(&self) -> SelectionRange {
        self.ranges[self.main]
    }

    pub fn main_index(&self) -> usize {
        self.main
    }

    pub fn map(&self, changes: &ChangeSet) -> Self {
        Self::new(
            self.ranges.iter().map(|r| r.map(changes)).collect(),
            self.main,
        )
    }

    pub(crate) fn clamp(&self, len: usize) -> Self {
        Self::new(self.ranges.iter().map(|r| r.clamp(len)).collect(), self.main)
    }
}

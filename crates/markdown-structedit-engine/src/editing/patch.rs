use std::ops::Range;

/// Result of applying a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Byte ranges of the new text covered by inserted text; deletions show
    /// up as empty ranges
    pub changed: Vec<Range<usize>>,
    /// The main selection range after the edit
    pub new_selection: Range<usize>,
    pub version: u64,
}

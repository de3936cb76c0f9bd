//! Formatting toggles: inline mark pairs, leading line marks and list styles.
//!
//! Toggles never decline; a toggle that finds nothing to do returns an empty
//! transaction.

pub mod leading;
pub mod list_style;
pub mod marks;

pub use leading::{LeadingMark, toggle_line_leading_mark};
pub use list_style::{ListKind, toggle_list_style};
pub use marks::{MarkPair, toggle_block_with_marks};

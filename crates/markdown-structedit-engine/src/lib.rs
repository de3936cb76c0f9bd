pub mod editing;
pub mod markup;
pub mod toggle;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use editing::{commands::*, document::*, editor::*, patch::*, selection::*, state::*, transaction::*};
pub use markup::{delete_markup_backward, insert_newline_continue_markup};
pub use toggle::{LeadingMark, ListKind, MarkPair};

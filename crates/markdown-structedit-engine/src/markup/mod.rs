//! Container markup around the caret: lists, list items and block quotes.
//!
//! - **`tree`**: position lookups over the syntax tree
//! - **`context`**: the stack of markup frames enclosing a position
//! - **`continuation`**: Enter
//! - **`deletion`**: Backspace
//! - **`renumber`**: keeping ordered lists counting after an edit

pub mod context;
pub mod continuation;
pub mod deletion;
pub mod renumber;
pub mod tree;

pub use context::{ContextFrame, get_context};
pub use continuation::insert_newline_continue_markup;
pub use deletion::delete_markup_backward;
pub use renumber::renumber_list;

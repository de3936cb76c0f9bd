/*!
 * # Editing Core Module
 *
 * The document model and edit pipeline every structural command runs on.
 *
 * ## Architecture Overview
 *
 * ### 1. Single Source of Truth: xi-rope Buffer
 * - The document text lives in an **`xi_rope::Rope`** buffer
 * - Edits are compiled into a single **Delta** and applied in one step
 * - **Lossless round-trip**: bytes go in and come out untouched, including
 *   CRLF line endings
 *
 * ### 2. Immutable States, Transactions
 * - An **`EditorState`** bundles the document, its syntax tree, the selection
 *   and the editor settings, and is never mutated
 * - Commands read one state and produce a **`Transaction`**: a validated
 *   `ChangeSet` plus an optional new selection
 * - `EditorState::apply` builds the next state; the **`Editor`** wrapper holds
 *   the current one and hands out a **`Patch`** per edit
 *
 * ### 3. Multiple Selection Ranges
 * - A **`Selection`** holds sorted, non-overlapping ranges; any of them can be
 *   a caret
 * - `change_by_range` runs a command once per range against the same state,
 *   combines the changes and maps each resulting range through the others
 * - One declining range declines the whole command
 *
 * ## Module Structure
 *
 * - **`document`**: `Document` with the rope buffer and line addressing
 * - **`selection`**: `SelectionRange` and `Selection`
 * - **`transaction`**: `ChangeSpec`, `ChangeSet` and `Transaction`
 * - **`state`**: `EditorState`
 * - **`commands`**: `Cmd` enum, declines and command compilation
 * - **`editor`**: `Editor`, the mutable host wrapper
 * - **`patch`**: Edit result metadata including changed ranges and new selection
 *
 * ## Usage Pattern
 *
 * ```rust
 * use markdown_structedit_config::EditorConfig;
 * use markdown_structedit_engine::editing::*;
 *
 * // 1. Create an editor from bytes (lossless)
 * let mut editor = Editor::from_bytes(b"- Item 1", EditorConfig::default()).unwrap();
 *
 * // 2. Put the caret at the end of the item
 * editor.set_selection(Selection::cursor(8));
 *
 * // 3. Enter continues the list
 * let patch = editor.insert_newline_continue_markup().unwrap();
 * assert_eq!(editor.text(), "- Item 1\n- ");
 * assert_eq!(patch.new_selection, 11..11);
 *
 * // 4. Round-trip: save exact bytes
 * let saved_bytes = editor.to_bytes();
 * ```
 */

// Module exports
pub mod commands;
pub mod document;
pub mod editor;
pub mod patch;
pub mod selection;
pub mod state;
pub mod transaction;

// Public API re-exports
pub use commands::{Cmd, DeclineReason, Declined};
pub use document::{Document, Line, count_column};
pub use editor::Editor;
pub use patch::Patch;
pub use selection::{Selection, SelectionRange};
pub use state::EditorState;
pub use transaction::{Assoc, ChangeSet, ChangeSpec, Transaction, TransactionError};

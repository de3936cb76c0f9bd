use markdown_structedit_config::EditorConfig;

use crate::editing::commands::{Cmd, compile};
use crate::editing::{EditorState, Patch, Selection, Transaction};

/// The mutable side of the engine: holds the current state and replaces it
/// as commands run.
///
/// ## Edit Pipeline
///
/// 1. **Command Compilation**: the `Cmd` is compiled against the current
///    [`EditorState`] into a [`Transaction`], or declines
/// 2. **Buffer Application**: the transaction's changes are applied to the
///    rope as one Delta and the text is reparsed
/// 3. **Selection Update**: the transaction's selection, or the old one
///    mapped through the changes
/// 4. **Version Increment**: for change detection by the host
///
/// A declined command leaves everything untouched and returns `None`; the
/// host then performs its default action (plain newline, plain backspace).
#[derive(Debug, Clone)]
pub struct Editor {
    state: EditorState,
    version: u64,
}

impl Editor {
    /// Create an editor with the caret at the start of `text`
    pub fn new(text: &str, config: EditorConfig) -> Self {
        Self::with_state(EditorState::new(text, Selection::cursor(0), config))
    }

    pub fn with_state(state: EditorState) -> Self {
        Self { state, version: 0 }
    }

    /// Create an editor from raw bytes
    pub fn from_bytes(bytes: &[u8], config: EditorConfig) -> anyhow::Result<Self> {
        Ok(Self::with_state(EditorState::from_bytes(bytes, config)?))
    }

    /// Get the document's content as raw bytes (exact round-trip)
    pub fn to_bytes(&self) -> Vec<u8> {
        self.state.doc().to_bytes()
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn text(&self) -> &str {
        self.state.text()
    }

    pub fn selection(&self) -> &Selection {
        self.state.selection()
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.state = self.state.with_selection(selection);
    }

    /// Get the current version
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Apply a transaction computed against the current state
    pub fn dispatch(&mut self, tr: &Transaction) -> Patch {
        self.state = self.state.apply(tr);
        self.version += 1;

        let main = self.state.selection().main();
        log::debug!(
            "dispatched {} changes, version {}",
            tr.changes.changes().len(),
            self.version
        );
        Patch {
            changed: tr.changes.changed_ranges(),
            new_selection: main.from()..main.to(),
            version: self.version,
        }
    }

    /// Compile and apply a command. `None` when the command declined.
    pub fn run(&mut self, cmd: Cmd) -> Option<Patch> {
        match compile(&self.state, &cmd) {
            Ok(tr) => Some(self.dispatch(&tr)),
            Err(declined) => {
                log::debug!("{cmd:?} {declined}");
                None
            }
        }
    }

    pub fn insert_newline_continue_markup(&mut self) -> Option<Patch> {
        self.run(Cmd::InsertNewlineContinueMarkup)
    }

    pub fn delete_markup_backward(&mut self) -> Option<Patch> {
        self.run(Cmd::DeleteMarkupBackward)
    }

    pub fn toggle_bold(&mut self) -> Option<Patch> {
        self.run(Cmd::ToggleBold)
    }

    pub fn toggle_italic(&mut self) -> Option<Patch> {
        self.run(Cmd::ToggleItalic)
    }

    pub fn toggle_strikethrough(&mut self) -> Option<Patch> {
        self.run(Cmd::ToggleStrikethrough)
    }

    pub fn toggle_inline_code(&mut self) -> Option<Patch> {
        self.run(Cmd::ToggleInlineCode)
    }

    pub fn toggle_inline_math(&mut self) -> Option<Patch> {
        self.run(Cmd::ToggleInlineMath)
    }

    pub fn toggle_heading(&mut self, level: usize) -> Option<Patch> {
        self.run(Cmd::ToggleHeading { level })
    }

    pub fn toggle_blockquote(&mut self) -> Option<Patch> {
        self.run(Cmd::ToggleBlockquote)
    }

    pub fn toggle_bullet(&mut self) -> Option<Patch> {
        self.run(Cmd::ToggleBullet)
    }

    pub fn toggle_numbering(&mut self) -> Option<Patch> {
        self.run(Cmd::ToggleNumbering)
    }

    pub fn toggle_todo(&mut self) -> Option<Patch> {
        self.run(Cmd::ToggleTodo)
    }

    pub fn replace_selections(&mut self, text: &str, caret_offset: Option<usize>) -> Option<Patch> {
        self.run(Cmd::ReplaceSelections {
            text: text.to_string(),
            caret_offset,
        })
    }

    pub fn insert_horizontal_rule(&mut self) -> Option<Patch> {
        self.run(Cmd::InsertHorizontalRule)
    }

    pub fn insert_code_block(&mut self) -> Option<Patch> {
        self.run(Cmd::InsertCodeBlock)
    }

    pub fn insert_math_block(&mut self) -> Option<Patch> {
        self.run(Cmd::InsertMathBlock)
    }

    pub fn format_content(&mut self, user_initiated: bool) -> Option<Patch> {
        self.run(Cmd::FormatContent { user_initiated })
    }
}

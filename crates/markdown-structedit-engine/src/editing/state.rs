use markdown_structedit_config::EditorConfig;
use markdown_structedit_syntax::{SyntaxNode, parse};

use crate::editing::{Document, Selection, Transaction};
use crate::markup::tree;

/// An immutable snapshot of everything a command reads: the text, its
/// syntax tree, the selection and the editor settings.
///
/// Commands compute a [`Transaction`] against one state; [`EditorState::apply`]
/// turns that into the next state.
#[derive(Debug, Clone)]
pub struct EditorState {
    doc: Document,
    tree: SyntaxNode,
    selection: Selection,
    config: EditorConfig,
}

impl EditorState {
    /// Create a state, clamping the selection to the text.
    pub fn new(text: &str, selection: Selection, config: EditorConfig) -> Self {
        let doc = Document::with_line_break(text, config.line_break.as_str());
        let tree = parse(text);
        let selection = selection.clamp(doc.len());
        Self {
            doc,
            tree,
            selection,
            config,
        }
    }

    /// Create a state from raw file bytes with the caret at the start
    pub fn from_bytes(bytes: &[u8], config: EditorConfig) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::new(text, Selection::cursor(0), config))
    }

    pub fn with_selection(&self, selection: Selection) -> Self {
        Self {
            selection: selection.clamp(self.doc.len()),
            ..self.clone()
        }
    }

    /// Replace the settings; the document picks up the new line break.
    pub fn with_config(&self, config: EditorConfig) -> Self {
        Self::new(self.doc.text(), self.selection.clone(), config)
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn tree(&self) -> &SyntaxNode {
        &self.tree
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn text(&self) -> &str {
        self.doc.text()
    }

    /// Whether Markdown commands apply at `pos`, i.e. it is not inside a
    /// fenced block of another language.
    pub fn is_markdown_at(&self, pos: usize) -> bool {
        tree::is_markdown_at(&self.tree, &self.doc, pos)
    }

    /// Apply a transaction computed against this state.
    ///
    /// The selection is the transaction's own, or the current one mapped
    /// through the changes. A transaction built for a different document is
    /// ignored.
    pub fn apply(&self, tr: &Transaction) -> EditorState {
        if tr.changes.doc_len() != self.doc.len() {
            log::warn!(
                "ignoring transaction for a {} byte document, document is {} bytes",
                tr.changes.doc_len(),
                self.doc.len()
            );
            return self.clone();
        }

        let doc = self.doc.apply(&tr.changes);
        let tree = if tr.changes.is_empty() {
            self.tree.clone()
        } else {
            parse(doc.text())
        };
        let selection = match &tr.selection {
            Some(selection) => selection.clone(),
            None => self.selection.map(&tr.changes),
        }
        .clamp(doc.len());

        Self {
            doc,
            tree,
            selection,
            config: self.config.clone(),
        }
    }
}

//! Editor state container.
//!
//! The source text lives in an immutable [`EditorSnapshot`]. Every change goes through
//! [`EditorStore::dispatch`], which swaps in a new snapshot with a bumped revision. Downstream
//! consumers compare revisions to decide whether to re-render.

use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorAction {
    /// Overwrites the whole source text. No validation, no length limit.
    ReplaceText(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditorSnapshot {
    text: Arc<str>,
    revision: u64,
}

impl EditorSnapshot {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self {
            text: text.into(),
            revision: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns the snapshot that results from applying `action`.
    pub fn reduce(&self, action: EditorAction) -> Self {
        match action {
            EditorAction::ReplaceText(text) => Self {
                text: text.into(),
                revision: self.revision.wrapping_add(1),
            },
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct EditorStore {
    current: EditorSnapshot,
}

impl EditorStore {
    pub fn new(initial: impl Into<Arc<str>>) -> Self {
        Self {
            current: EditorSnapshot::new(initial),
        }
    }

    pub fn snapshot(&self) -> &EditorSnapshot {
        &self.current
    }

    pub fn text(&self) -> &str {
        self.current.text()
    }

    pub fn dispatch(&mut self, action: EditorAction) -> &EditorSnapshot {
        self.current = self.current.reduce(action);
        tracing::trace!(
            revision = self.current.revision(),
            len = self.current.text().len(),
            "editor text replaced"
        );
        &self.current
    }

    pub fn replace_text(&mut self, text: impl Into<String>) -> &EditorSnapshot {
        self.dispatch(EditorAction::ReplaceText(text.into()))
    }
}

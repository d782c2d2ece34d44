//! Keeps a visual tree in step with the editor text.

use std::sync::Arc;
use std::time::Instant;

use mdlive_core::store::EditorSnapshot;
use mdlive_core::store::EditorStore;

use crate::content::MarkdownOptions;
use crate::project::Projector;
use crate::project::VisualTree;

/// Every text replacement re-projects the whole document before returning.
#[derive(Debug)]
pub struct LivePreview {
    store: EditorStore,
    projector: Projector,
    tree: Arc<VisualTree>,
}

impl LivePreview {
    pub fn new(projector: Projector, initial: &str) -> Self {
        let store = EditorStore::new(initial);
        let tree = Arc::new(projector.project(store.text()));
        Self {
            store,
            projector,
            tree,
        }
    }

    pub fn text(&self) -> &str {
        self.store.text()
    }

    pub fn snapshot(&self) -> &EditorSnapshot {
        self.store.snapshot()
    }

    pub fn tree(&self) -> Arc<VisualTree> {
        Arc::clone(&self.tree)
    }

    pub fn options(&self) -> &MarkdownOptions {
        self.projector.options()
    }

    pub fn replace_text(&mut self, text: impl Into<String>) -> Arc<VisualTree> {
        self.store.replace_text(text);
        self.reproject();
        self.tree()
    }

    /// Switches extensions and re-projects the current text.
    pub fn set_options(&mut self, options: MarkdownOptions) {
        self.projector.set_options(options);
        self.reproject();
    }

    fn reproject(&mut self) {
        let started = Instant::now();
        self.tree = Arc::new(self.projector.project(self.store.text()));
        tracing::debug!(
            revision = self.store.snapshot().revision(),
            nodes = self.tree.nodes().len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "preview re-projected"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replacement_reprojects_synchronously() {
        let mut live = LivePreview::new(Projector::default(), "# a");
        assert_eq!(live.tree().to_html(), "<h1>a</h1>");
        let tree = live.replace_text("*b*");
        assert_eq!(tree.to_html(), "<p><em>b</em></p>");
        assert_eq!(live.snapshot().revision(), 1);
        assert_eq!(live.text(), "*b*");
    }

    #[test]
    fn toggling_passthrough_reprojects_current_text() {
        let mut live = LivePreview::new(Projector::default(), "<b>x</b>");
        assert_eq!(live.tree().to_html(), "<p><b>x</b></p>");
        live.set_options(MarkdownOptions {
            raw_html: false,
            ..MarkdownOptions::default()
        });
        assert_eq!(live.tree().to_html(), "<p>&lt;b&gt;x&lt;/b&gt;</p>");
    }
}

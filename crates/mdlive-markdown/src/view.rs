//! Scrollable preview pane for a [`VisualTree`].

use std::sync::Arc;

use mdlive_core::input::InputEvent;
use mdlive_core::input::MouseEvent;
use mdlive_core::input::MouseEventKind;
use mdlive_core::render;
use mdlive_core::scroll::ScrollBindings;
use mdlive_core::theme::Theme;
use mdlive_core::viewport::ViewportState;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use crate::layout;
use crate::layout::PreviewLine;
use crate::project::VisualTree;

#[derive(Clone, Debug)]
pub struct PreviewViewOptions {
    pub show_scrollbar: bool,
    pub padding_left: u16,
    /// Widest laid-out line. The pane is narrower when the area is.
    pub max_columns: Option<u16>,
    pub scroll: ScrollBindings,
}

impl Default for PreviewViewOptions {
    fn default() -> Self {
        Self {
            show_scrollbar: true,
            padding_left: 1,
            max_columns: None,
            scroll: ScrollBindings::default(),
        }
    }
}

/// Lays out the visual tree lazily, caching rows per width.
#[derive(Clone, Debug, Default)]
pub struct PreviewView {
    tree: Arc<VisualTree>,
    rendered: Vec<PreviewLine>,
    cached_width: Option<u16>,
    pub state: ViewportState,
    options: PreviewViewOptions,
}

impl PreviewView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: PreviewViewOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Replaces the displayed tree. The scroll position is kept and clamped on the next layout.
    pub fn set_tree(&mut self, tree: Arc<VisualTree>) {
        self.tree = tree;
        self.cached_width = None;
        self.rendered.clear();
    }

    pub fn tree(&self) -> &VisualTree {
        &self.tree
    }

    pub fn set_max_columns(&mut self, max_columns: Option<u16>) {
        if self.options.max_columns != max_columns {
            self.options.max_columns = max_columns;
            self.cached_width = None;
        }
    }

    fn content_area(&self, area: Rect) -> Rect {
        let area = if self.options.show_scrollbar && area.width >= 2 {
            Rect::new(area.x, area.y, area.width - 1, area.height)
        } else {
            area
        };
        let pad = self.options.padding_left.min(area.width);
        let width = area.width - pad;
        let width = match self.options.max_columns {
            Some(max) => width.min(max),
            None => width,
        };
        Rect::new(area.x + pad, area.y, width, area.height)
    }

    pub fn set_viewport(&mut self, area: Rect) {
        let content = self.content_area(area);
        self.state.set_viewport(content.width, content.height);
    }

    /// Handles keys (scroll bindings) and mouse wheel over `area`. Returns `true` when the view
    /// needs a redraw.
    pub fn handle_event_in_area(&mut self, area: Rect, event: InputEvent) -> bool {
        match event {
            InputEvent::Key(key) => {
                let Some(action) = self.options.scroll.action_for(&key) else {
                    return false;
                };
                self.options.scroll.apply(&mut self.state, action);
                true
            }
            InputEvent::Mouse(m) => self.handle_mouse_event(area, m),
            InputEvent::Paste(_) | InputEvent::Resize { .. } => false,
        }
    }

    pub fn handle_mouse_event(&mut self, area: Rect, event: MouseEvent) -> bool {
        let inside = event.x >= area.x
            && event.x < area.x.saturating_add(area.width)
            && event.y >= area.y
            && event.y < area.y.saturating_add(area.height);
        if !inside {
            return false;
        }
        let step = self.options.scroll.wheel_step;
        match event.kind {
            MouseEventKind::ScrollUp => {
                self.state.scroll_y_by(-step);
                true
            }
            MouseEventKind::ScrollDown => {
                self.state.scroll_y_by(step);
                true
            }
            _ => false,
        }
    }

    pub fn render_ref(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        buf.set_style(area, theme.text_primary);
        let content = self.content_area(area);
        self.set_viewport(area);
        self.ensure_layout(content.width, theme);

        for row in 0..content.height {
            let idx = (self.state.y as usize).saturating_add(row as usize);
            let Some(line) = self.rendered.get(idx) else {
                break;
            };
            render::render_spans_clipped(
                content.x,
                content.y + row,
                0,
                content.width,
                buf,
                &line.spans,
                theme.text_primary,
            );
        }

        if self.options.show_scrollbar && area.width >= 2 {
            render::render_scrollbar(
                Rect::new(area.x + area.width - 1, area.y, 1, area.height),
                buf,
                &self.state,
                theme.text_muted,
            );
        }
    }

    /// Plain text of each laid-out row for a pane of `width` columns.
    pub fn plain_lines(&mut self, width: u16, theme: &Theme) -> Vec<String> {
        self.ensure_layout(width, theme);
        self.rendered.iter().map(|l| l.plain.clone()).collect()
    }

    fn ensure_layout(&mut self, width: u16, theme: &Theme) {
        if self.cached_width == Some(width) {
            return;
        }
        self.cached_width = Some(width);
        self.rendered = layout::layout_tree(&self.tree, width, theme);
        let content_w = self
            .rendered
            .iter()
            .map(|l| l.width() as u32)
            .max()
            .unwrap_or(0);
        self.state
            .set_content(content_w, self.rendered.len() as u32);
        tracing::trace!(width, rows = self.rendered.len(), "preview laid out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::MarkdownOptions;
    use crate::project;
    use mdlive_core::input::KeyCode;
    use mdlive_core::input::KeyEvent;

    fn view_for(md: &str) -> PreviewView {
        let mut view = PreviewView::new();
        view.set_tree(Arc::new(project::project(md, &MarkdownOptions::default())));
        view
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf.cell((x, y)).map(|c| c.symbol()).unwrap_or("").to_string())
            .collect()
    }

    #[test]
    fn renders_rows_after_padding() {
        let mut view = view_for("# Hi\n\ntext");
        let area = Rect::new(0, 0, 12, 4);
        let mut buf = Buffer::empty(area);
        view.render_ref(area, &mut buf, &Theme::default());
        assert!(row(&buf, 0).starts_with(" # Hi"));
        assert!(row(&buf, 2).starts_with(" text"));
    }

    #[test]
    fn max_columns_narrows_layout() {
        let mut view = view_for("aaa bbb ccc");
        view.set_max_columns(Some(4));
        let area = Rect::new(0, 0, 40, 5);
        let mut buf = Buffer::empty(area);
        view.render_ref(area, &mut buf, &Theme::default());
        assert!(row(&buf, 0).starts_with(" aaa "));
        assert!(row(&buf, 1).starts_with(" bbb "));
    }

    #[test]
    fn wheel_and_keys_scroll_within_bounds() {
        let md = (0..20).map(|i| format!("line {i}\n\n")).collect::<String>();
        let mut view = view_for(&md);
        let area = Rect::new(0, 0, 20, 5);
        let mut buf = Buffer::empty(area);
        view.render_ref(area, &mut buf, &Theme::default());

        let wheel = InputEvent::Mouse(MouseEvent::new(1, 1, MouseEventKind::ScrollDown));
        assert!(view.handle_event_in_area(area, wheel));
        assert_eq!(view.state.y, 3);

        let outside = InputEvent::Mouse(MouseEvent::new(30, 1, MouseEventKind::ScrollDown));
        assert!(!view.handle_event_in_area(area, outside));

        assert!(view.handle_event_in_area(area, InputEvent::Key(KeyEvent::new(KeyCode::End))));
        assert_eq!(view.state.y, view.state.content_h - 5);
    }

    #[test]
    fn replacing_tree_relays_out() {
        let mut view = view_for("one");
        let theme = Theme::default();
        assert_eq!(view.plain_lines(10, &theme), vec!["one"]);
        view.set_tree(Arc::new(project::project("two", &MarkdownOptions::default())));
        assert_eq!(view.plain_lines(10, &theme), vec!["two"]);
    }
}

use crate::keymap::Binding;
use crate::render;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use unicode_width::UnicodeWidthStr;

#[derive(Clone, Debug)]
pub struct HelpBarOptions {
    pub style: Style,
    pub key_style: Style,
    pub status_style: Style,
    pub separator: String,
    pub space: String,
}

impl Default for HelpBarOptions {
    fn default() -> Self {
        Self {
            style: Style::default(),
            key_style: Style::default(),
            status_style: Style::default(),
            separator: " • ".to_string(),
            space: " ".to_string(),
        }
    }
}

/// One-line key hints on the left and an optional status message on the right.
///
/// The status wins when both do not fit: hints are clipped first.
#[derive(Clone, Debug, Default)]
pub struct HelpBar {
    bindings: Vec<Binding>,
    status: Option<(String, Style)>,
    options: HelpBarOptions,
}

impl HelpBar {
    pub fn new(bindings: Vec<Binding>) -> Self {
        Self {
            bindings,
            status: None,
            options: HelpBarOptions::default(),
        }
    }

    pub fn with_options(bindings: Vec<Binding>, options: HelpBarOptions) -> Self {
        Self {
            bindings,
            status: None,
            options,
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>, style: Option<Style>) {
        let style = style.unwrap_or(self.options.status_style);
        self.status = Some((text.into(), style));
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_ref().map(|(s, _)| s.as_str())
    }

    pub fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        buf.set_style(area, self.options.style);

        let status_w = self
            .status
            .as_ref()
            .map(|(s, _)| (UnicodeWidthStr::width(s.as_str()) as u16).min(area.width))
            .unwrap_or(0);
        let hints_w = area.width.saturating_sub(status_w).saturating_sub(1);

        let spans = self.hint_spans();
        render::render_spans_clipped(
            area.x,
            area.y,
            0,
            hints_w,
            buf,
            &spans,
            self.options.style,
        );

        if let Some((text, style)) = &self.status {
            let x = area.x + area.width - status_w;
            render::render_str_clipped(x, area.y, 0, status_w, buf, text, *style);
        }
    }

    fn hint_spans(&self) -> Vec<Span<'static>> {
        let mut spans: Vec<Span<'static>> = Vec::new();
        for (i, b) in self.bindings.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(
                    self.options.separator.clone(),
                    self.options.style,
                ));
            }
            spans.push(Span::styled(b.help_key.clone(), self.options.key_style));
            spans.push(Span::styled(self.options.space.clone(), self.options.style));
            spans.push(Span::styled(b.help_desc.clone(), self.options.style));
        }
        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap;

    fn row(buf: &Buffer) -> String {
        (0..buf.area.width)
            .map(|x| buf.cell((x, 0)).map(|c| c.symbol()).unwrap_or("").to_string())
            .collect()
    }

    #[test]
    fn renders_narrow_width_without_panicking() {
        let hb = HelpBar::new(vec![keymap::Binding::new(
            "q",
            "quit",
            vec![keymap::key_char('q')],
        )]);
        let mut buf = Buffer::empty(Rect::new(0, 0, 3, 1));
        hb.render_ref(Rect::new(0, 0, 3, 1), &mut buf);
    }

    #[test]
    fn status_is_right_aligned() {
        let mut hb = HelpBar::new(vec![keymap::Binding::new(
            "^q",
            "quit",
            vec![keymap::key_ctrl('q')],
        )]);
        hb.set_status("ok", None);
        let mut buf = Buffer::empty(Rect::new(0, 0, 12, 1));
        hb.render_ref(Rect::new(0, 0, 12, 1), &mut buf);
        let text = row(&buf);
        assert!(text.starts_with("^q quit"));
        assert!(text.ends_with("ok"));
    }
}

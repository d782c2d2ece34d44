use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use unicode_width::UnicodeWidthChar;

use crate::viewport::ViewportState;

const TAB_WIDTH: usize = 4;

pub fn render_scrollbar(area: Rect, buf: &mut Buffer, state: &ViewportState, style: Style) {
    buf.set_style(area, style);
    if area.height == 0 {
        return;
    }
    if state.content_h == 0 || state.content_h <= state.viewport_h as u32 {
        for dy in 0..area.height {
            buf.set_stringn(area.x, area.y + dy, " ", 1, style);
        }
        return;
    }

    let track_h = area.height as f64;
    let thumb_h = ((state.viewport_h as f64 / state.content_h as f64) * track_h)
        .round()
        .clamp(1.0, track_h) as u16;
    let max_y = state
        .content_h
        .saturating_sub(state.viewport_h as u32)
        .max(1) as f64;
    let free = (track_h - thumb_h as f64).max(0.0);
    let thumb_top = ((state.y as f64 / max_y) * free).round().clamp(0.0, free) as u16;

    for dy in 0..area.height {
        let ch = if dy >= thumb_top && dy < thumb_top + thumb_h {
            "█"
        } else {
            " "
        };
        buf.set_stringn(area.x, area.y + dy, ch, 1, style);
    }
}

/// Writes characters into one buffer row, skipping the first `start_col` display columns and
/// stopping after `max_cols`. Wide characters straddling either edge are dropped.
struct RowWriter<'b> {
    buf: &'b mut Buffer,
    x: u16,
    y: u16,
    start_col: usize,
    max_cols: usize,
    col: usize,
    out_cols: usize,
}

impl<'b> RowWriter<'b> {
    fn new(buf: &'b mut Buffer, x: u16, y: u16, start_col: u32, max_cols: u16) -> Self {
        Self {
            buf,
            x,
            y,
            start_col: start_col as usize,
            max_cols: max_cols as usize,
            col: 0,
            out_cols: 0,
        }
    }

    fn full(&self) -> bool {
        self.out_cols >= self.max_cols
    }

    /// Returns `false` once the row is full.
    fn push(&mut self, ch: char, style: Style) -> bool {
        if ch == '\t' {
            for _ in 0..TAB_WIDTH {
                if !self.push(' ', style) {
                    return false;
                }
            }
            return true;
        }

        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if w == 0 {
            return true;
        }
        if self.col < self.start_col {
            self.col += w;
            return true;
        }
        if self.out_cols + w > self.max_cols {
            self.out_cols = self.max_cols;
            return false;
        }

        let mut tmp = [0u8; 4];
        let cell_x = self.x + self.out_cols as u16;
        if let Some(cell) = self.buf.cell_mut((cell_x, self.y)) {
            cell.set_style(style);
            cell.set_symbol(ch.encode_utf8(&mut tmp));
        }
        if w == 2
            && let Some(cell) = self.buf.cell_mut((cell_x + 1, self.y))
        {
            cell.set_style(style);
            cell.set_symbol("");
        }
        self.out_cols += w;
        self.col += w;
        !self.full()
    }
}

pub fn render_str_clipped(
    x: u16,
    y: u16,
    start_col: u32,
    max_cols: u16,
    buf: &mut Buffer,
    input: &str,
    style: Style,
) {
    if max_cols == 0 {
        return;
    }
    let mut w = RowWriter::new(buf, x, y, start_col, max_cols);
    for ch in input.chars() {
        if !w.push(ch, style) {
            return;
        }
    }
}

/// Like [`render_str_clipped`], but each span keeps its own style patched over `base`.
pub fn render_spans_clipped(
    x: u16,
    y: u16,
    start_col: u32,
    max_cols: u16,
    buf: &mut Buffer,
    spans: &[Span<'static>],
    base: Style,
) {
    if max_cols == 0 {
        return;
    }
    let mut w = RowWriter::new(buf, x, y, start_col, max_cols);
    for span in spans {
        let style = base.patch(span.style);
        for ch in span.content.chars() {
            if !w.push(ch, style) {
                return;
            }
        }
    }
}

//! Screen layout: header with frame toggles and print control, editor | divider | preview, help
//! bar.

use mdlive_core::render;
use mdlive_markdown::document::FrameSize;
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::app::Focus;
use crate::app::HitMap;

pub const APP_TITLE: &str = " mdlive ";
pub const EDITOR_TITLE: &str = "Markdown Editor";
pub const PREVIEW_TITLE: &str = "Preview";
pub const PRINT_LABEL: &str = " Download PDF (Ctrl+P) ";

const DIVIDER_WIDTH: u16 = 1;

pub fn draw(f: &mut Frame<'_>, app: &mut App) -> Option<(u16, u16)> {
    let area = f.area();
    let [header, main, footer] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

    let (frame_buttons, print_button) = draw_header(f.buffer_mut(), header, app);

    let divider_w = DIVIDER_WIDTH.min(main.width);
    let (left_w, right_w) = app.split.pane_widths(main.width, divider_w);
    let editor_area = Rect::new(main.x, main.y, left_w, main.height);
    let divider = Rect::new(main.x + left_w, main.y, divider_w, main.height);
    let preview_area = Rect::new(divider.x + divider_w, main.y, right_w, main.height);

    let editor_block = pane_block(EDITOR_TITLE.to_string(), app.focus == Focus::Editor, app);
    let preview_title = format!("{PREVIEW_TITLE} ({})", app.frame.label());
    let preview_block = pane_block(preview_title, app.focus == Focus::Preview, app);
    let editor_inner = editor_block.inner(editor_area);
    let preview_inner = preview_block.inner(preview_area);
    f.render_widget(editor_block, editor_area);
    f.render_widget(preview_block, preview_area);

    let buf = f.buffer_mut();
    let divider_style = if app.split.is_dragging() {
        app.theme.divider_active
    } else {
        app.theme.divider
    };
    draw_divider(buf, divider, divider_style);
    app.editor.render_ref(editor_inner, buf);
    app.preview.render_ref(preview_inner, buf, &app.theme);
    app.help.render_ref(footer, buf);

    app.hits = HitMap {
        main,
        editor: editor_inner,
        divider: grab_area(divider, main),
        preview: preview_inner,
        frame_buttons,
        print_button,
    };

    if app.focus == Focus::Editor {
        app.editor.cursor_pos(editor_inner)
    } else {
        None
    }
}

fn pane_block(title: String, focused: bool, app: &App) -> Block<'static> {
    let (title_style, border_style) = if focused {
        (app.theme.title, app.theme.accent)
    } else {
        (app.theme.text_muted, app.theme.divider)
    };
    Block::default()
        .title(Span::styled(title, title_style))
        .borders(Borders::ALL)
        .border_style(border_style)
}

fn draw_divider(buf: &mut Buffer, divider: Rect, style: Style) {
    for y in divider.top()..divider.bottom() {
        for x in divider.left()..divider.right() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_symbol("┃").set_style(style);
            }
        }
    }
}

/// The divider column plus the pane borders on either side.
fn grab_area(divider: Rect, main: Rect) -> Rect {
    if divider.width == 0 {
        return Rect::default();
    }
    let x = divider.x.saturating_sub(1).max(main.x);
    Rect::new(x, divider.y, divider.width + 2, divider.height).intersection(main)
}

fn draw_header(buf: &mut Buffer, area: Rect, app: &App) -> (Vec<(FrameSize, Rect)>, Rect) {
    let mut buttons = Vec::new();
    if area.width == 0 || area.height == 0 {
        return (buttons, Rect::default());
    }
    buf.set_style(area, app.theme.text_primary);
    let right = area.right();
    let y = area.y;

    let print_w = UnicodeWidthStr::width(PRINT_LABEL) as u16;
    let print_button = if print_w <= area.width {
        let r = Rect::new(right - print_w, y, print_w, 1);
        render::render_str_clipped(r.x, y, 0, r.width, buf, PRINT_LABEL, app.theme.button_active);
        r
    } else {
        Rect::default()
    };
    let limit = if print_button.width > 0 {
        print_button.x.saturating_sub(1)
    } else {
        right
    };

    let mut x = put(buf, area.x, y, limit, APP_TITLE, app.theme.title);
    if app.frame_selector {
        for frame in FrameSize::ALL {
            x = x.saturating_add(1).min(limit);
            let label = format!(" {} ", frame.label());
            let style = if frame == app.frame {
                app.theme.button_active
            } else {
                app.theme.button
            };
            let start = x;
            x = put(buf, x, y, limit, &label, style);
            if x > start {
                buttons.push((frame, Rect::new(start, y, x - start, 1)));
            }
        }
    }
    (buttons, print_button)
}

/// Draws `text` from `x` without passing `limit`; returns the column after it.
fn put(buf: &mut Buffer, x: u16, y: u16, limit: u16, text: &str, style: Style) -> u16 {
    let max = limit.saturating_sub(x);
    let w = (UnicodeWidthStr::width(text) as u16).min(max);
    render::render_str_clipped(x, y, 0, max, buf, text, style);
    x + w
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grab_area_spans_neighbours() {
        let main = Rect::new(0, 1, 100, 20);
        assert_eq!(
            grab_area(Rect::new(50, 1, 1, 20), main),
            Rect::new(49, 1, 3, 20)
        );
        assert_eq!(grab_area(Rect::new(0, 1, 1, 20), main), Rect::new(0, 1, 3, 20));
        assert_eq!(grab_area(Rect::new(0, 1, 0, 20), main), Rect::default());
    }
}

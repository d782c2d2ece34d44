//! Multi-line plain-text editing surface.
//!
//! The text area owns the cursor and the line buffer used for editing. It reports
//! [`TextAreaAction::Changed`] after every mutation so the caller can push the full text into an
//! [`crate::store::EditorStore`].

use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::MouseButton;
use crate::input::MouseEvent;
use crate::input::MouseEventKind;
use crate::render;
use crate::viewport::ViewportState;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

#[derive(Clone, Debug)]
pub struct TextAreaOptions {
    pub show_scrollbar: bool,
    pub style: Style,
    /// Shown in `placeholder_style` while the buffer is empty.
    pub placeholder: Option<String>,
    pub placeholder_style: Style,
}

impl Default for TextAreaOptions {
    fn default() -> Self {
        Self {
            show_scrollbar: true,
            style: Style::default(),
            placeholder: None,
            placeholder_style: Style::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    pub row: usize,
    pub col: usize, // char index within line
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAreaAction {
    None,
    /// Cursor or scroll moved; needs a redraw but the text is unchanged.
    Moved,
    Changed,
}

#[derive(Clone, Debug)]
pub struct TextArea {
    lines: Vec<String>,
    cursor: Cursor,
    preferred_x: Option<usize>, // display columns
    pub state: ViewportState,
    options: TextAreaOptions,
}

impl Default for TextArea {
    fn default() -> Self {
        Self::new()
    }
}

impl TextArea {
    pub fn new() -> Self {
        Self::with_options(TextAreaOptions::default())
    }

    pub fn with_options(options: TextAreaOptions) -> Self {
        Self {
            lines: vec![String::new()],
            cursor: Cursor::default(),
            preferred_x: None,
            state: ViewportState::default(),
            options,
        }
    }

    /// Replaces the buffer and moves the cursor to the start.
    pub fn set_text(&mut self, text: &str) {
        let text = normalize_newlines(text);
        self.lines = text.split('\n').map(str::to_string).collect();
        self.cursor = Cursor::default();
        self.preferred_x = None;
        self.after_edit();
        self.state.to_top();
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    fn content_area(&self, area: Rect) -> Rect {
        if self.options.show_scrollbar && area.width >= 2 {
            Rect::new(area.x, area.y, area.width - 1, area.height)
        } else {
            area
        }
    }

    pub fn set_viewport(&mut self, area: Rect) {
        let content = self.content_area(area);
        self.state.set_viewport(content.width, content.height);
        self.recompute_content_size();
        self.ensure_cursor_visible();
    }

    /// Screen position of the cursor inside `area`, or `None` when it is scrolled out of view.
    pub fn cursor_pos(&self, area: Rect) -> Option<(u16, u16)> {
        if area.width == 0 || area.height == 0 {
            return None;
        }
        let content = self.content_area(area);
        let (cx, cy) = self.cursor_screen_pos();
        let x = cx.checked_sub(self.state.x)?;
        let y = cy.checked_sub(self.state.y)?;
        if x >= content.width as u32 || y >= content.height as u32 {
            return None;
        }
        Some((content.x + x as u16, content.y + y as u16))
    }

    pub fn input(&mut self, event: InputEvent) -> TextAreaAction {
        match event {
            InputEvent::Paste(s) => {
                self.insert_str(&s);
                self.after_edit();
                TextAreaAction::Changed
            }
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Mouse(_) | InputEvent::Resize { .. } => TextAreaAction::None,
        }
    }

    /// Handles mouse input for a text area drawn at `area`: click to place the cursor, wheel to
    /// scroll.
    pub fn input_in_area(&mut self, area: Rect, event: InputEvent) -> TextAreaAction {
        match event {
            InputEvent::Mouse(m) => self.handle_mouse(area, m),
            other => self.input(other),
        }
    }

    fn handle_mouse(&mut self, area: Rect, m: MouseEvent) -> TextAreaAction {
        let content = self.content_area(area);
        let inside = m.x >= content.x
            && m.x < content.x.saturating_add(content.width)
            && m.y >= content.y
            && m.y < content.y.saturating_add(content.height);
        match m.kind {
            MouseEventKind::ScrollUp if inside => {
                self.state.scroll_y_by(-3);
                TextAreaAction::Moved
            }
            MouseEventKind::ScrollDown if inside => {
                self.state.scroll_y_by(3);
                TextAreaAction::Moved
            }
            MouseEventKind::Down(MouseButton::Left) if inside => {
                let row = self.state.y as usize + (m.y - content.y) as usize;
                let target_x = self.state.x as usize + (m.x - content.x) as usize;
                self.cursor.row = row.min(self.lines.len() - 1);
                self.cursor.col = col_from_display_x(self.current_line(), target_x);
                self.preferred_x = Some(target_x);
                TextAreaAction::Moved
            }
            _ => TextAreaAction::None,
        }
    }

    pub fn render_ref(&mut self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        self.set_viewport(area);
        let content = self.content_area(area);

        for row in 0..content.height {
            let y = content.y + row;
            buf.set_style(
                Rect::new(content.x, y, content.width, 1),
                self.options.style,
            );
            let idx = (self.state.y as usize).saturating_add(row as usize);
            if let Some(line) = self.lines.get(idx) {
                render::render_str_clipped(
                    content.x,
                    y,
                    self.state.x,
                    content.width,
                    buf,
                    line,
                    self.options.style,
                );
            }
        }

        if self.is_empty()
            && let Some(placeholder) = &self.options.placeholder
        {
            render::render_str_clipped(
                content.x,
                content.y,
                0,
                content.width,
                buf,
                placeholder,
                self.options.placeholder_style,
            );
        }

        if content.width < area.width {
            render::render_scrollbar(
                Rect::new(content.x + content.width, area.y, 1, area.height),
                buf,
                &self.state,
                self.options.style,
            );
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> TextAreaAction {
        let edited = match key.code {
            KeyCode::Char(c) => {
                if key.modifiers.is_chord() {
                    return TextAreaAction::None;
                }
                self.insert_char(c);
                true
            }
            KeyCode::Enter => {
                self.insert_newline();
                true
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Esc => return TextAreaAction::None,
            _ => {
                self.move_cursor(&key.code);
                self.ensure_cursor_visible();
                return TextAreaAction::Moved;
            }
        };

        if edited {
            self.after_edit();
            TextAreaAction::Changed
        } else {
            TextAreaAction::None
        }
    }

    fn move_cursor(&mut self, code: &KeyCode) {
        match code {
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Up => self.move_vertical(-1),
            KeyCode::Down => self.move_vertical(1),
            KeyCode::PageUp => {
                self.move_vertical(-(self.state.viewport_h.max(1) as isize));
            }
            KeyCode::PageDown => {
                self.move_vertical(self.state.viewport_h.max(1) as isize);
            }
            KeyCode::Home => {
                self.cursor.col = 0;
                self.preferred_x = Some(0);
            }
            KeyCode::End => {
                self.cursor.col = self.current_line_char_len();
                self.preferred_x = Some(self.cursor_display_x());
            }
            _ => {}
        }
    }

    fn after_edit(&mut self) {
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.preferred_x = None;
        self.recompute_content_size();
        self.ensure_cursor_visible();
    }

    fn recompute_content_size(&mut self) {
        let content_h = self.lines.len() as u32;
        let content_w = self
            .lines
            .iter()
            .map(|l| UnicodeWidthStr::width(l.as_str()) as u32)
            .max()
            .unwrap_or(0)
            // Room for the cursor after the last character.
            .saturating_add(1);
        self.state.set_content(content_w, content_h);
    }

    fn ensure_cursor_visible(&mut self) {
        let (cx, cy) = self.cursor_screen_pos();
        self.state.ensure_visible(cx, cy);
    }

    fn cursor_screen_pos(&self) -> (u32, u32) {
        let y = self.cursor.row.min(self.lines.len().saturating_sub(1)) as u32;
        (self.cursor_display_x() as u32, y)
    }

    fn cursor_display_x(&self) -> usize {
        self.current_line()
            .chars()
            .take(self.cursor.col)
            .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
            .sum()
    }

    fn current_line(&self) -> &str {
        self.lines
            .get(self.cursor.row)
            .map(String::as_str)
            .unwrap_or("")
    }

    fn current_line_char_len(&self) -> usize {
        self.current_line().chars().count()
    }

    fn move_left(&mut self) {
        if self.cursor.col > 0 {
            self.cursor.col -= 1;
        } else if self.cursor.row > 0 {
            self.cursor.row -= 1;
            self.cursor.col = self.current_line_char_len();
        }
        self.preferred_x = Some(self.cursor_display_x());
    }

    fn move_right(&mut self) {
        if self.cursor.col < self.current_line_char_len() {
            self.cursor.col += 1;
        } else if self.cursor.row + 1 < self.lines.len() {
            self.cursor.row += 1;
            self.cursor.col = 0;
        }
        self.preferred_x = Some(self.cursor_display_x());
    }

    fn move_vertical(&mut self, delta: isize) {
        let last = self.lines.len() - 1;
        let target_row = self.cursor.row.saturating_add_signed(delta).min(last);
        if target_row == self.cursor.row {
            return;
        }
        let target_x = self.preferred_x.unwrap_or_else(|| self.cursor_display_x());
        self.cursor.row = target_row;
        self.cursor.col = col_from_display_x(self.current_line(), target_x);
        self.preferred_x = Some(target_x);
    }

    fn insert_char(&mut self, ch: char) {
        let row = self.cursor.row.min(self.lines.len() - 1);
        let line = &mut self.lines[row];
        let byte_idx = byte_index_from_char_index(line, self.cursor.col);
        line.insert(byte_idx, ch);
        self.cursor.row = row;
        self.cursor.col += 1;
    }

    fn insert_newline(&mut self) {
        let row = self.cursor.row.min(self.lines.len() - 1);
        let byte_idx = byte_index_from_char_index(&self.lines[row], self.cursor.col);
        let tail = self.lines[row].split_off(byte_idx);
        self.lines.insert(row + 1, tail);
        self.cursor.row = row + 1;
        self.cursor.col = 0;
    }

    fn insert_str(&mut self, s: &str) {
        let s = normalize_newlines(s);
        let mut parts = s.split('\n');
        let Some(first) = parts.next() else {
            return;
        };

        let row = self.cursor.row.min(self.lines.len() - 1);
        let byte_idx = byte_index_from_char_index(&self.lines[row], self.cursor.col);
        let tail = self.lines[row].split_off(byte_idx);
        self.lines[row].push_str(first);
        self.cursor.row = row;
        self.cursor.col += first.chars().count();

        for part in parts {
            self.cursor.row += 1;
            self.lines.insert(self.cursor.row, part.to_string());
            self.cursor.col = part.chars().count();
        }
        self.lines[self.cursor.row].push_str(&tail);
    }

    fn backspace(&mut self) -> bool {
        if self.cursor.col > 0 {
            let row = self.cursor.row.min(self.lines.len() - 1);
            let line = &mut self.lines[row];
            let start = byte_index_from_char_index(line, self.cursor.col - 1);
            let end = byte_index_from_char_index(line, self.cursor.col);
            line.replace_range(start..end, "");
            self.cursor.row = row;
            self.cursor.col -= 1;
            return true;
        }
        if self.cursor.row > 0 && self.cursor.row < self.lines.len() {
            let cur = self.lines.remove(self.cursor.row);
            self.cursor.row -= 1;
            let prev = &mut self.lines[self.cursor.row];
            self.cursor.col = prev.chars().count();
            prev.push_str(&cur);
            return true;
        }
        false
    }

    fn delete(&mut self) -> bool {
        let row = self.cursor.row.min(self.lines.len() - 1);
        if self.cursor.col < self.lines[row].chars().count() {
            let line = &mut self.lines[row];
            let start = byte_index_from_char_index(line, self.cursor.col);
            let end = byte_index_from_char_index(line, self.cursor.col + 1);
            line.replace_range(start..end, "");
            return true;
        }
        if row + 1 < self.lines.len() {
            let next = self.lines.remove(row + 1);
            self.lines[row].push_str(&next);
            return true;
        }
        false
    }
}

fn col_from_display_x(line: &str, target_x: usize) -> usize {
    let mut cols = 0usize;
    let mut col = 0usize;
    for ch in line.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if cols + w > target_x {
            break;
        }
        cols += w;
        col += 1;
    }
    col
}

fn byte_index_from_char_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn normalize_newlines(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyModifiers;

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::Key(KeyEvent::new(code))
    }

    #[test]
    fn inserts_and_moves_cursor() {
        let mut ta = TextArea::new();
        assert_eq!(ta.input(key(KeyCode::Char('a'))), TextAreaAction::Changed);
        assert_eq!(ta.text(), "a");
        assert_eq!(ta.cursor(), Cursor { row: 0, col: 1 });
        assert_eq!(ta.input(key(KeyCode::Left)), TextAreaAction::Moved);
        assert_eq!(ta.cursor(), Cursor { row: 0, col: 0 });
        ta.input(key(KeyCode::Char('b')));
        assert_eq!(ta.text(), "ba");
    }

    #[test]
    fn enter_always_inserts_newline() {
        let mut ta = TextArea::new();
        ta.input(key(KeyCode::Char('x')));
        assert_eq!(ta.input(key(KeyCode::Enter)), TextAreaAction::Changed);
        assert_eq!(ta.text(), "x\n");
        assert_eq!(ta.cursor(), Cursor { row: 1, col: 0 });
    }

    #[test]
    fn chorded_chars_are_left_to_the_caller() {
        let mut ta = TextArea::new();
        let ev =
            InputEvent::Key(KeyEvent::new(KeyCode::Char('p')).with_modifiers(KeyModifiers::ctrl()));
        assert_eq!(ta.input(ev), TextAreaAction::None);
        assert!(ta.is_empty());
    }

    #[test]
    fn backspace_joins_lines() {
        let mut ta = TextArea::new();
        ta.set_text("a\nb");
        ta.cursor = Cursor { row: 1, col: 0 };
        assert_eq!(ta.input(key(KeyCode::Backspace)), TextAreaAction::Changed);
        assert_eq!(ta.text(), "ab");
        assert_eq!(ta.cursor(), Cursor { row: 0, col: 1 });
    }

    #[test]
    fn backspace_on_empty_buffer_is_noop() {
        let mut ta = TextArea::new();
        assert_eq!(ta.input(key(KeyCode::Backspace)), TextAreaAction::None);
        assert_eq!(ta.input(key(KeyCode::Delete)), TextAreaAction::None);
    }

    #[test]
    fn paste_multiline_inserts_in_the_middle() {
        let mut ta = TextArea::new();
        ta.set_text("[]");
        ta.input(key(KeyCode::Right));
        ta.input(InputEvent::Paste("a\r\nb\nc".to_string()));
        assert_eq!(ta.text(), "[a\nb\nc]");
        assert_eq!(ta.cursor(), Cursor { row: 2, col: 1 });
    }

    #[test]
    fn vertical_moves_keep_preferred_column() {
        let mut ta = TextArea::new();
        ta.set_text("abcd\nx\nabcd");
        ta.input(key(KeyCode::End));
        ta.input(key(KeyCode::Down));
        assert_eq!(ta.cursor(), Cursor { row: 1, col: 1 });
        ta.input(key(KeyCode::Down));
        assert_eq!(ta.cursor(), Cursor { row: 2, col: 4 });
    }

    #[test]
    fn click_places_cursor() {
        let mut ta = TextArea::new();
        ta.set_text("hello\nworld");
        let area = Rect::new(0, 0, 20, 5);
        ta.set_viewport(area);
        let click = InputEvent::Mouse(MouseEvent::new(
            3,
            1,
            MouseEventKind::Down(MouseButton::Left),
        ));
        assert_eq!(ta.input_in_area(area, click), TextAreaAction::Moved);
        assert_eq!(ta.cursor(), Cursor { row: 1, col: 3 });
    }

    #[test]
    fn renders_placeholder_when_empty() {
        let mut ta = TextArea::with_options(TextAreaOptions {
            placeholder: Some("Type here".to_string()),
            ..TextAreaOptions::default()
        });
        let area = Rect::new(0, 0, 12, 2);
        let mut buf = Buffer::empty(area);
        ta.render_ref(area, &mut buf);
        let first: String = (0..9)
            .map(|x| buf.cell((x, 0)).map(|c| c.symbol()).unwrap_or("").to_string())
            .collect();
        assert_eq!(first, "Type here");
    }
}

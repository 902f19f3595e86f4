//! Multi-line editing surface for the edit pane.
//!
//! Holds its own lines and cursor; the caller reads the full text back after
//! every change. Editing is deliberately plain (no undo, no selection):
//! this is a markdown scratch surface, not a code editor.

use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::render;
use crate::theme::Theme;
use crate::viewport::ViewportState;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    pub row: usize,
    /// Char index within the row, not a display column.
    pub col: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditAction {
    None,
    /// The text changed; the caller should re-read [`TextArea::text`].
    Edited,
}

#[derive(Clone, Debug)]
pub struct TextArea {
    lines: Vec<String>,
    cursor: Cursor,
    /// Sticky display column for vertical movement.
    sticky_x: Option<usize>,
    pub state: ViewportState,
}

impl Default for TextArea {
    fn default() -> Self {
        Self::new()
    }
}

impl TextArea {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor: Cursor::default(),
            sticky_x: None,
            state: ViewportState::default(),
        }
    }

    /// Replaces the whole buffer and homes the cursor. Used when edit mode is
    /// entered and the surface is seeded with the document's text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = normalize_newlines(&text.into());
        self.lines = text.split('\n').map(str::to_string).collect();
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.cursor = Cursor::default();
        self.sticky_x = None;
        self.refresh_content_size();
        self.state.to_top();
        self.state.clamp();
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Inserts `snippet` at the cursor and leaves the cursor after it.
    /// Used by the syntax guide panel.
    pub fn insert_snippet(&mut self, snippet: &str) {
        self.insert_text(snippet);
        self.sticky_x = None;
        self.refresh_content_size();
        self.keep_cursor_visible();
    }

    pub fn input(&mut self, event: InputEvent) -> EditAction {
        match event {
            InputEvent::Paste(s) => {
                self.insert_text(&s);
                self.after_edit()
            }
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Mouse(_) => EditAction::None,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> EditAction {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.ctrl && !key.modifiers.alt => {
                self.insert_char(c);
                self.after_edit()
            }
            KeyCode::Enter => {
                self.split_line();
                self.after_edit()
            }
            KeyCode::Backspace => {
                if self.delete_before() {
                    self.after_edit()
                } else {
                    EditAction::None
                }
            }
            KeyCode::Delete => {
                if self.delete_after() {
                    self.after_edit()
                } else {
                    EditAction::None
                }
            }
            KeyCode::Left => self.moved(|ta| ta.move_left()),
            KeyCode::Right => self.moved(|ta| ta.move_right()),
            KeyCode::Up => self.moved(|ta| ta.move_vertical(-1)),
            KeyCode::Down => self.moved(|ta| ta.move_vertical(1)),
            KeyCode::Home => self.moved(|ta| {
                ta.cursor.col = 0;
                ta.sticky_x = Some(0);
            }),
            KeyCode::End => self.moved(|ta| {
                ta.cursor.col = ta.line_char_len(ta.cursor.row);
                ta.sticky_x = Some(ta.cursor_display_x());
            }),
            KeyCode::PageUp => {
                self.state.page_up();
                EditAction::None
            }
            KeyCode::PageDown => {
                self.state.page_down();
                EditAction::None
            }
            _ => EditAction::None,
        }
    }

    pub fn render_ref(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let (text_area, scrollbar_x) = split_scrollbar(area);
        self.state.set_viewport(text_area.width, text_area.height);
        self.refresh_content_size();
        self.keep_cursor_visible();

        for row in 0..text_area.height {
            let y = text_area.y + row;
            let idx = (self.state.y as usize).saturating_add(row as usize);
            buf.set_style(Rect::new(text_area.x, y, text_area.width, 1), theme.text);
            if let Some(line) = self.lines.get(idx) {
                render::render_str_clipped(
                    text_area.x,
                    y,
                    self.state.x,
                    text_area.width,
                    buf,
                    line,
                    theme.text,
                );
            }
        }

        if let Some(x) = scrollbar_x {
            render::render_scrollbar(
                Rect::new(x, area.y, 1, area.height),
                buf,
                &self.state,
                theme.muted,
            );
        }
    }

    /// Screen position for the terminal cursor, if it is inside `area`.
    pub fn cursor_pos(&self, area: Rect) -> Option<(u16, u16)> {
        if area.width == 0 || area.height == 0 {
            return None;
        }
        let (text_area, _) = split_scrollbar(area);
        let cx = (self.cursor_display_x() as u32).checked_sub(self.state.x)?;
        let cy = (self.cursor.row as u32).checked_sub(self.state.y)?;
        if cx >= text_area.width as u32 || cy >= text_area.height as u32 {
            return None;
        }
        Some((text_area.x + cx as u16, text_area.y + cy as u16))
    }

    fn after_edit(&mut self) -> EditAction {
        self.sticky_x = None;
        self.refresh_content_size();
        self.keep_cursor_visible();
        EditAction::Edited
    }

    fn moved(&mut self, f: impl FnOnce(&mut Self)) -> EditAction {
        f(self);
        self.keep_cursor_visible();
        EditAction::None
    }

    fn insert_char(&mut self, ch: char) {
        let row = self.cursor.row.min(self.lines.len() - 1);
        let at = byte_index(&self.lines[row], self.cursor.col);
        self.lines[row].insert(at, ch);
        self.cursor.row = row;
        self.cursor.col += 1;
    }

    fn insert_text(&mut self, text: &str) {
        let text = normalize_newlines(text);
        let mut first = true;
        for part in text.split('\n') {
            if !first {
                self.split_line();
            }
            for ch in part.chars() {
                self.insert_char(ch);
            }
            first = false;
        }
    }

    fn split_line(&mut self) {
        let row = self.cursor.row.min(self.lines.len() - 1);
        let at = byte_index(&self.lines[row], self.cursor.col);
        let tail = self.lines[row].split_off(at);
        self.lines.insert(row + 1, tail);
        self.cursor.row = row + 1;
        self.cursor.col = 0;
    }

    fn delete_before(&mut self) -> bool {
        if self.cursor.col > 0 {
            let row = self.cursor.row.min(self.lines.len() - 1);
            let start = byte_index(&self.lines[row], self.cursor.col - 1);
            let end = byte_index(&self.lines[row], self.cursor.col);
            self.lines[row].replace_range(start..end, "");
            self.cursor.row = row;
            self.cursor.col -= 1;
            return true;
        }
        if self.cursor.row > 0 {
            let tail = self.lines.remove(self.cursor.row);
            self.cursor.row -= 1;
            self.cursor.col = self.line_char_len(self.cursor.row);
            self.lines[self.cursor.row].push_str(&tail);
            return true;
        }
        false
    }

    fn delete_after(&mut self) -> bool {
        let row = self.cursor.row.min(self.lines.len() - 1);
        if self.cursor.col < self.line_char_len(row) {
            let start = byte_index(&self.lines[row], self.cursor.col);
            let end = byte_index(&self.lines[row], self.cursor.col + 1);
            self.lines[row].replace_range(start..end, "");
            return true;
        }
        if row + 1 < self.lines.len() {
            let next = self.lines.remove(row + 1);
            self.lines[row].push_str(&next);
            return true;
        }
        false
    }

    fn move_left(&mut self) {
        if self.cursor.col > 0 {
            self.cursor.col -= 1;
        } else if self.cursor.row > 0 {
            self.cursor.row -= 1;
            self.cursor.col = self.line_char_len(self.cursor.row);
        }
        self.sticky_x = Some(self.cursor_display_x());
    }

    fn move_right(&mut self) {
        if self.cursor.col < self.line_char_len(self.cursor.row) {
            self.cursor.col += 1;
        } else if self.cursor.row + 1 < self.lines.len() {
            self.cursor.row += 1;
            self.cursor.col = 0;
        }
        self.sticky_x = Some(self.cursor_display_x());
    }

    fn move_vertical(&mut self, delta: i32) {
        let target = self.sticky_x.unwrap_or_else(|| self.cursor_display_x());
        let next = self.cursor.row as i64 + delta as i64;
        if next < 0 || next as usize >= self.lines.len() {
            return;
        }
        self.cursor.row = next as usize;
        self.cursor.col = char_col_at_display_x(&self.lines[self.cursor.row], target);
        self.sticky_x = Some(target);
    }

    fn refresh_content_size(&mut self) {
        let w = self
            .lines
            .iter()
            .map(|l| UnicodeWidthStr::width(l.as_str()) as u32)
            .max()
            .unwrap_or(0);
        self.state.set_content(w, self.lines.len() as u32);
    }

    fn keep_cursor_visible(&mut self) {
        let cy = self.cursor.row as u32;
        let cx = self.cursor_display_x() as u32;
        if cy < self.state.y {
            self.state.y = cy;
        } else if cy >= self.state.y + self.state.viewport_h.max(1) as u32 {
            self.state.y = cy - self.state.viewport_h.max(1) as u32 + 1;
        }
        if cx < self.state.x {
            self.state.x = cx;
        } else if cx >= self.state.x + self.state.viewport_w.max(1) as u32 {
            self.state.x = cx - self.state.viewport_w.max(1) as u32 + 1;
        }
        self.state.clamp();
    }

    fn cursor_display_x(&self) -> usize {
        let line = self.lines.get(self.cursor.row).map(String::as_str).unwrap_or("");
        line.chars()
            .take(self.cursor.col)
            .map(|c| UnicodeWidthChar::width(c).unwrap_or(0))
            .sum()
    }

    fn line_char_len(&self, row: usize) -> usize {
        self.lines.get(row).map(|l| l.chars().count()).unwrap_or(0)
    }
}

fn split_scrollbar(area: Rect) -> (Rect, Option<u16>) {
    if area.width >= 2 {
        (
            Rect::new(area.x, area.y, area.width - 1, area.height),
            Some(area.x + area.width - 1),
        )
    } else {
        (area, None)
    }
}

fn byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn char_col_at_display_x(line: &str, target_x: usize) -> usize {
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

fn normalize_newlines(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputEvent;
    use crate::input::KeyCode;
    use crate::input::KeyEvent;

    fn key(ta: &mut TextArea, code: KeyCode) -> EditAction {
        ta.input(InputEvent::Key(KeyEvent::plain(code)))
    }

    #[test]
    fn typing_edits_and_moves_cursor() {
        let mut ta = TextArea::new();
        assert_eq!(key(&mut ta, KeyCode::Char('a')), EditAction::Edited);
        assert_eq!(ta.text(), "a");
        key(&mut ta, KeyCode::Left);
        key(&mut ta, KeyCode::Char('b'));
        assert_eq!(ta.text(), "ba");
        assert_eq!(ta.cursor(), Cursor { row: 0, col: 1 });
    }

    #[test]
    fn enter_always_splits_the_line() {
        let mut ta = TextArea::new();
        ta.set_text("ab");
        key(&mut ta, KeyCode::Right);
        assert_eq!(key(&mut ta, KeyCode::Enter), EditAction::Edited);
        assert_eq!(ta.text(), "a\nb");
    }

    #[test]
    fn backspace_at_line_start_joins() {
        let mut ta = TextArea::new();
        ta.set_text("a\nb");
        ta.cursor = Cursor { row: 1, col: 0 };
        assert_eq!(key(&mut ta, KeyCode::Backspace), EditAction::Edited);
        assert_eq!(ta.text(), "ab");
        assert_eq!(ta.cursor(), Cursor { row: 0, col: 1 });
    }

    #[test]
    fn backspace_on_empty_buffer_is_a_noop() {
        let mut ta = TextArea::new();
        assert_eq!(key(&mut ta, KeyCode::Backspace), EditAction::None);
    }

    #[test]
    fn paste_inserts_multiline_text() {
        let mut ta = TextArea::new();
        ta.input(InputEvent::Paste("x\ny\nz".to_string()));
        assert_eq!(ta.text(), "x\ny\nz");
        assert_eq!(ta.cursor().row, 2);
    }

    #[test]
    fn snippet_lands_at_cursor_and_cursor_follows() {
        let mut ta = TextArea::new();
        ta.set_text("before after");
        for _ in 0..7 {
            key(&mut ta, KeyCode::Right);
        }
        ta.insert_snippet("**bold**");
        assert_eq!(ta.text(), "before **bold**after");
        assert_eq!(ta.cursor().col, 15);
    }

    #[test]
    fn vertical_moves_keep_the_display_column() {
        let mut ta = TextArea::new();
        ta.set_text("long line here\nx\nanother long line");
        key(&mut ta, KeyCode::End);
        key(&mut ta, KeyCode::Down);
        assert_eq!(ta.cursor().col, 1);
        key(&mut ta, KeyCode::Down);
        assert_eq!(ta.cursor().col, 14);
    }
}

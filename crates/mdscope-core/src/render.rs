//! Low-level buffer painting helpers shared by every widget.
//!
//! All text goes through [`render_spans_clipped`], which handles horizontal
//! clipping in display columns, tab expansion (4 cells) and wide characters.
//! A wide character that straddles the left clip edge is skipped whole rather
//! than painted half.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use unicode_width::UnicodeWidthChar;

use crate::viewport::ViewportState;

const TAB_CELLS: usize = 4;

pub fn render_str_clipped(
    x: u16,
    y: u16,
    start_col: u32,
    max_cols: u16,
    buf: &mut Buffer,
    input: &str,
    style: Style,
) {
    let span = Span::styled(input.to_string(), style);
    render_spans_clipped(x, y, start_col, max_cols, buf, std::slice::from_ref(&span), style);
}

pub fn render_spans_clipped(
    x: u16,
    y: u16,
    start_col: u32,
    max_cols: u16,
    buf: &mut Buffer,
    spans: &[Span<'static>],
    fallback_style: Style,
) {
    if max_cols == 0 {
        return;
    }

    let mut clip = Clip {
        skip: start_col as usize,
        budget: max_cols as usize,
        col: 0,
        dx: 0,
    };

    for span in spans {
        let style = if span.style == Style::default() {
            fallback_style
        } else {
            span.style
        };
        for ch in span.content.chars() {
            if ch == '\t' {
                for _ in 0..TAB_CELLS {
                    if !clip.put(x, y, buf, ' ', 1, style) {
                        return;
                    }
                }
                continue;
            }
            let w = UnicodeWidthChar::width(ch).unwrap_or(0);
            if w == 0 {
                continue;
            }
            if !clip.put(x, y, buf, ch, w, style) {
                return;
            }
        }
    }
}

struct Clip {
    skip: usize,
    budget: usize,
    col: usize,
    dx: u16,
}

impl Clip {
    /// Paints one character of display width `w`; returns `false` once the
    /// column budget is spent.
    fn put(&mut self, x: u16, y: u16, buf: &mut Buffer, ch: char, w: usize, style: Style) -> bool {
        // Left of the clip edge, including a wide char straddling it.
        if self.col < self.skip {
            self.col += w;
            return true;
        }
        let used = (self.dx as usize).saturating_add(w);
        if used > self.budget {
            return false;
        }

        let mut tmp = [0u8; 4];
        if let Some(cell) = buf.cell_mut((x + self.dx, y)) {
            cell.set_style(style);
            cell.set_symbol(ch.encode_utf8(&mut tmp));
        }
        self.dx += 1;
        if w == 2 {
            // Second cell of a wide char: blank continuation.
            if let Some(cell) = buf.cell_mut((x + self.dx, y)) {
                cell.set_style(style);
                cell.set_symbol("");
            }
            self.dx += 1;
        }
        self.col += w;
        true
    }
}

pub fn render_scrollbar(area: Rect, buf: &mut Buffer, state: &ViewportState, style: Style) {
    if area.height == 0 {
        return;
    }
    buf.set_style(area, style);
    if state.content_h == 0 || state.content_h <= state.viewport_h as u32 {
        for dy in 0..area.height {
            buf.set_stringn(area.x, area.y + dy, " ", 1, style);
        }
        return;
    }

    let track = area.height as f64;
    let thumb = ((state.viewport_h as f64 / state.content_h as f64) * track)
        .round()
        .clamp(1.0, track) as u16;
    let max_y = state.max_y().max(1) as f64;
    let top = ((state.y as f64 / max_y) * (track - thumb as f64))
        .round()
        .clamp(0.0, (track - thumb as f64).max(0.0)) as u16;

    for dy in 0..area.height {
        let ch = if dy >= top && dy < top + thumb {
            "█"
        } else {
            " "
        };
        buf.set_stringn(area.x, area.y + dy, ch, 1, style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Buffer;

    fn row_text(buf: &Buffer, width: u16) -> String {
        (0..width)
            .map(|x| buf.cell((x, 0)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn clips_from_start_column() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 3, 1));
        render_str_clipped(0, 0, 2, 3, &mut buf, "abcdef", Style::default());
        assert_eq!(row_text(&buf, 3), "cde");
    }

    #[test]
    fn expands_tabs_to_four_cells() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 6, 1));
        render_str_clipped(0, 0, 0, 6, &mut buf, "\t1", Style::default());
        assert!(row_text(&buf, 6).starts_with("    1"));
    }

    #[test]
    fn skips_wide_char_straddling_clip_edge() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 1));
        render_str_clipped(0, 0, 1, 4, &mut buf, "你好", Style::default());
        // "你" overlaps the clip edge and is dropped whole; "好" renders.
        assert!(row_text(&buf, 4).starts_with("好"));
    }

    #[test]
    fn scrollbar_renders_without_panicking_on_short_tracks() {
        let mut state = ViewportState::default();
        state.set_viewport(10, 2);
        state.set_content(10, 500);
        let mut buf = Buffer::empty(Rect::new(0, 0, 1, 2));
        render_scrollbar(Rect::new(0, 0, 1, 2), &mut buf, &state, Style::default());
    }
}

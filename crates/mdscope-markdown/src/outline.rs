//! Outline extraction and the navigation panel widget.
//!
//! The outline is derived from the anchor set of the latest layout and is
//! replaced wholesale whenever the document re-renders, so it can never go
//! stale relative to the preview.

use mdscope_core::render;
use mdscope_core::theme::Theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Span;

use crate::anchor::HeadingAnchor;

/// One navigable heading entry. `active` marks the section currently being
/// read; at most one entry is active at a time.
#[derive(Clone, Debug)]
pub struct OutlineEntry {
    pub anchor: HeadingAnchor,
    pub active: bool,
}

/// Builds outline entries from the laid-out anchor set, keeping document
/// order and only levels 1 through 3.
pub fn extract_outline(anchors: &[HeadingAnchor]) -> Vec<OutlineEntry> {
    anchors
        .iter()
        .filter(|a| (1..=3).contains(&a.level))
        .map(|a| OutlineEntry {
            anchor: a.clone(),
            active: false,
        })
        .collect()
}

const EMPTY_PLACEHOLDER: &str = "No headings";

/// Sidebar list of outline entries with keyboard selection and a single
/// active highlight.
#[derive(Clone, Debug, Default)]
pub struct OutlinePanel {
    entries: Vec<OutlineEntry>,
    selected: usize,
    scroll_top: usize,
}

impl OutlinePanel {
    pub fn set_entries(&mut self, entries: Vec<OutlineEntry>) {
        self.entries = entries;
        self.selected = self.selected.min(self.entries.len().saturating_sub(1));
        self.scroll_top = 0;
    }

    pub fn entries(&self) -> &[OutlineEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Marks `index` active and clears every other entry.
    pub fn activate(&mut self, index: usize) {
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.active = i == index;
        }
    }

    pub fn active_index(&self) -> Option<usize> {
        self.entries.iter().position(|e| e.active)
    }

    pub fn select(&mut self, index: usize) {
        if index < self.entries.len() {
            self.selected = index;
        }
    }

    pub fn select_next(&mut self) {
        if !self.entries.is_empty() {
            self.selected = (self.selected + 1).min(self.entries.len() - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Scroll target (content row) of the currently selected entry.
    pub fn selected_target(&self) -> Option<usize> {
        self.entries.get(self.selected).map(|e| e.anchor.line)
    }

    /// Maps a click at buffer row `y` within `area` to an entry index.
    pub fn hit_test(&self, area: Rect, y: u16) -> Option<usize> {
        if y < area.y || y >= area.y + area.height {
            return None;
        }
        let index = self.scroll_top + (y - area.y) as usize;
        (index < self.entries.len()).then_some(index)
    }

    pub fn render_ref(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        if self.entries.is_empty() {
            render::render_str_clipped(
                area.x,
                area.y,
                0,
                area.width,
                buf,
                EMPTY_PLACEHOLDER,
                theme.faint,
            );
            return;
        }

        // Keep the selected row visible.
        let visible = area.height as usize;
        if self.selected < self.scroll_top {
            self.scroll_top = self.selected;
        } else if self.selected >= self.scroll_top + visible {
            self.scroll_top = self.selected + 1 - visible;
        }

        for (row, index) in (self.scroll_top..self.entries.len()).take(visible).enumerate() {
            let entry = &self.entries[index];
            let indent = "  ".repeat(entry.anchor.level.saturating_sub(1) as usize);
            let marker = if entry.active { "▌ " } else { "  " };

            let mut style = if entry.active {
                theme.outline_active
            } else {
                theme.muted
            };
            if index == self.selected {
                style = style.patch(theme.selection);
            }

            let spans = vec![
                Span::styled(marker.to_string(), style),
                Span::styled(format!("{indent}{}", entry.anchor.text), style),
            ];
            let y = area.y + row as u16;
            buf.set_style(Rect::new(area.x, y, area.width, 1), style);
            render::render_spans_clipped(area.x, y, 0, area.width, buf, &spans, style);
        }
    }
}

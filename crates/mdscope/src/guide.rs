//! Markdown syntax quick-reference panel.
//!
//! Each entry carries the snippet it stands for. Activating an entry inserts
//! the snippet at the editor cursor in edit mode; in preview mode it goes to
//! the clipboard instead.

use mdscope_core::render;
use mdscope_core::theme::Theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Span;

pub struct GuideItem {
    pub syntax: &'static str,
    pub desc: &'static str,
    pub insert: &'static str,
}

pub struct GuideSection {
    pub title: &'static str,
    pub items: &'static [GuideItem],
}

pub const GUIDE: &[GuideSection] = &[
    GuideSection {
        title: "Headings",
        items: &[
            GuideItem { syntax: "# Title", desc: "H1", insert: "# Title\n" },
            GuideItem { syntax: "## Title", desc: "H2", insert: "## Title\n" },
            GuideItem { syntax: "### Title", desc: "H3", insert: "### Title\n" },
        ],
    },
    GuideSection {
        title: "Emphasis",
        items: &[
            GuideItem { syntax: "**bold**", desc: "bold", insert: "**bold**" },
            GuideItem { syntax: "*italic*", desc: "italic", insert: "*italic*" },
            GuideItem { syntax: "~~strike~~", desc: "strikethrough", insert: "~~strike~~" },
            GuideItem { syntax: "`code`", desc: "inline code", insert: "`code`" },
        ],
    },
    GuideSection {
        title: "Lists",
        items: &[
            GuideItem { syntax: "- item", desc: "bullet list", insert: "- item\n- item\n" },
            GuideItem { syntax: "1. item", desc: "numbered list", insert: "1. first\n2. second\n" },
            GuideItem { syntax: "- [x] done", desc: "task list", insert: "- [x] done\n- [ ] todo\n" },
        ],
    },
    GuideSection {
        title: "Links & media",
        items: &[
            GuideItem {
                syntax: "[text](url)",
                desc: "link",
                insert: "[link text](https://example.com)",
            },
            GuideItem {
                syntax: "![alt](url)",
                desc: "image",
                insert: "![description](image.png)",
            },
        ],
    },
    GuideSection {
        title: "Blocks",
        items: &[
            GuideItem {
                syntax: "```lang",
                desc: "code block",
                insert: "```rust\n// code\n```\n",
            },
            GuideItem { syntax: "> quote", desc: "blockquote", insert: "> quote\n" },
            GuideItem { syntax: "---", desc: "rule", insert: "\n---\n" },
            GuideItem {
                syntax: "| a | b |",
                desc: "table",
                insert: "| col | col |\n|-----|-----|\n| a   | b   |\n",
            },
        ],
    },
];

enum Row {
    Section(&'static str),
    Item(&'static GuideItem),
}

/// Flat, selectable rendering of [`GUIDE`]. Section headers are skipped by
/// selection movement.
pub struct GuidePanel {
    rows: Vec<Row>,
    selected: usize,
    scroll_top: usize,
}

impl Default for GuidePanel {
    fn default() -> Self {
        Self::new()
    }
}

impl GuidePanel {
    pub fn new() -> Self {
        let mut rows = Vec::new();
        for section in GUIDE {
            rows.push(Row::Section(section.title));
            for item in section.items {
                rows.push(Row::Item(item));
            }
        }
        let selected = rows
            .iter()
            .position(|r| matches!(r, Row::Item(_)))
            .unwrap_or(0);
        Self {
            rows,
            selected,
            scroll_top: 0,
        }
    }

    pub fn select_next(&mut self) {
        let mut i = self.selected;
        while i + 1 < self.rows.len() {
            i += 1;
            if matches!(self.rows[i], Row::Item(_)) {
                self.selected = i;
                return;
            }
        }
    }

    pub fn select_prev(&mut self) {
        let mut i = self.selected;
        while i > 0 {
            i -= 1;
            if matches!(self.rows[i], Row::Item(_)) {
                self.selected = i;
                return;
            }
        }
    }

    pub fn selected_item(&self) -> Option<&'static GuideItem> {
        match self.rows.get(self.selected) {
            Some(Row::Item(item)) => Some(item),
            _ => None,
        }
    }

    pub fn render_ref(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let visible = area.height as usize;
        if self.selected < self.scroll_top {
            self.scroll_top = self.selected;
        } else if self.selected >= self.scroll_top + visible {
            self.scroll_top = self.selected + 1 - visible;
        }

        for (row, index) in (self.scroll_top..self.rows.len()).take(visible).enumerate() {
            let y = area.y + row as u16;
            match self.rows[index] {
                Row::Section(title) => {
                    render::render_str_clipped(
                        area.x,
                        y,
                        0,
                        area.width,
                        buf,
                        title,
                        theme.accent,
                    );
                }
                Row::Item(item) => {
                    let style = if index == self.selected {
                        theme.selection
                    } else {
                        theme.text
                    };
                    buf.set_style(Rect::new(area.x, y, area.width, 1), style);
                    let spans = vec![
                        Span::styled(format!("  {:<14}", item.syntax), theme.code_inline.patch(style)),
                        Span::styled(item.desc.to_string(), theme.muted.patch(style)),
                    ];
                    render::render_spans_clipped(area.x, y, 0, area.width, buf, &spans, style);
                }
            }
        }
    }
}

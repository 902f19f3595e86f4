use crate::keymap::Binding;
use crate::render;
use crate::theme::Theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Span;

/// Single-row hint bar listing the bindings that apply right now.
///
/// The bar truncates from the right on narrow terminals; callers put the
/// most important bindings first.
#[derive(Clone, Debug, Default)]
pub struct HelpBar {
    bindings: Vec<Binding>,
}

impl HelpBar {
    pub fn new(bindings: Vec<Binding>) -> Self {
        Self { bindings }
    }

    pub fn set_bindings(&mut self, bindings: Vec<Binding>) {
        self.bindings = bindings;
    }

    pub fn render_ref(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let mut spans: Vec<Span<'static>> = Vec::new();
        for (i, b) in self.bindings.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ".to_string(), theme.muted));
            }
            spans.push(Span::styled(b.label.clone(), theme.accent));
            spans.push(Span::styled(format!(" {}", b.desc), theme.muted));
        }

        buf.set_style(area, theme.muted);
        render::render_spans_clipped(area.x, area.y, 0, area.width, buf, &spans, theme.muted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyEvent;
    use ratatui::buffer::Buffer;

    #[test]
    fn renders_into_narrow_area_without_panicking() {
        let bar = HelpBar::new(vec![Binding::new("q", "quit", vec![KeyEvent::char('q')])]);
        let mut buf = Buffer::empty(Rect::new(0, 0, 3, 1));
        bar.render_ref(Rect::new(0, 0, 3, 1), &mut buf, &Theme::dark());
    }
}

//! Scrollable preview of the rendered document.
//!
//! Owns the parsed [`MarkdownDocument`] and its current layout. Layout is
//! cached per width and replaced in place whenever the source, width, theme
//! or highlighter changes; every replacement bumps `layout_epoch`, which the
//! application watches to rebuild the outline and resubscribe the
//! active-section tracker (outline state is derived from the latest layout,
//! never from a stale one).

use mdscope_core::input::InputEvent;
use mdscope_core::input::MouseKind;
use mdscope_core::render;
use mdscope_core::scroll::ScrollBindings;
use mdscope_core::text::CodeHighlighter;
use mdscope_core::theme::Theme;
use mdscope_core::viewport::ViewportState;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use std::sync::Arc;

use crate::anchor::HeadingAnchor;
use crate::document::CodeRegion;
use crate::document::LaidOutDocument;
use crate::document::MarkdownDocument;

const WHEEL_STEP: i32 = 3;

#[derive(Clone, Debug)]
pub struct PreviewOptions {
    pub show_scrollbar: bool,
    pub padding_left: u16,
    pub padding_right: u16,
    pub scroll: ScrollBindings,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            show_scrollbar: true,
            padding_left: 1,
            padding_right: 1,
            scroll: ScrollBindings::default(),
        }
    }
}

#[derive(Default)]
pub struct PreviewView {
    doc: MarkdownDocument,
    laid: LaidOutDocument,
    cached_width: Option<u16>,
    layout_epoch: u64,
    pub state: ViewportState,
    scroll_target: Option<u32>,
    highlighter: Option<Arc<dyn CodeHighlighter>>,
    options: PreviewOptions,
}

impl PreviewView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: PreviewOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Replaces the document source and schedules a fresh layout. The old
    /// rendered tree is discarded wholesale; nothing is diffed.
    pub fn set_markdown(&mut self, source: &str) {
        self.doc = MarkdownDocument::parse(source);
        self.invalidate();
    }

    pub fn source(&self) -> &str {
        self.doc.source()
    }

    pub fn set_highlighter(&mut self, highlighter: Option<Arc<dyn CodeHighlighter>>) {
        self.highlighter = highlighter;
        self.invalidate();
    }

    /// Forces a relayout on the next render (used on theme changes, which
    /// restyle every span).
    pub fn invalidate(&mut self) {
        self.cached_width = None;
    }

    /// Bumped every time the layout is rebuilt; the app compares this
    /// against the epoch its outline was built from.
    pub fn layout_epoch(&self) -> u64 {
        self.layout_epoch
    }

    pub fn anchors(&self) -> &[HeadingAnchor] {
        &self.laid.anchors
    }

    /// Starts an animated scroll that puts `row` at the top of the viewport.
    pub fn scroll_to_row(&mut self, row: usize) {
        self.scroll_target = Some((row as u32).min(self.state.max_y()));
    }

    /// Advances the scroll animation one step; returns true while moving.
    pub fn tick(&mut self) -> bool {
        let Some(target) = self.scroll_target else {
            return false;
        };
        let delta = target as i64 - self.state.y as i64;
        if delta == 0 {
            self.scroll_target = None;
            return false;
        }
        // Ease out: cover a third of the remaining distance per tick.
        let step = (delta.abs() / 3).max(1) * delta.signum();
        self.state.scroll_y_by(step as i32);
        if self.state.y == target {
            self.scroll_target = None;
        }
        true
    }

    /// First code region intersecting the current viewport, if any: the
    /// target of the copy affordance.
    pub fn code_region_in_view(&self) -> Option<&CodeRegion> {
        let top = self.state.y as usize;
        let bottom = top + self.state.viewport_h as usize;
        self.laid
            .code_regions
            .iter()
            .find(|r| r.start_line < bottom && r.start_line + r.line_count > top)
    }

    /// Handles scroll keys and the mouse wheel; returns true when the view
    /// moved. Any manual scroll cancels an in-flight animated scroll.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Key(key) => {
                let Some(action) = self.options.scroll.action_for(key) else {
                    return false;
                };
                self.scroll_target = None;
                self.options.scroll.apply(&mut self.state, action);
                true
            }
            InputEvent::Mouse(m) => match m.kind {
                MouseKind::ScrollUp => {
                    self.scroll_target = None;
                    self.state.scroll_y_by(-WHEEL_STEP);
                    true
                }
                MouseKind::ScrollDown => {
                    self.scroll_target = None;
                    self.state.scroll_y_by(WHEEL_STEP);
                    true
                }
                _ => false,
            },
            InputEvent::Paste(_) => false,
        }
    }

    pub fn render_ref(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let (content_area, scrollbar_x) = if self.options.show_scrollbar && area.width >= 2 {
            (
                Rect::new(area.x, area.y, area.width - 1, area.height),
                Some(area.x + area.width - 1),
            )
        } else {
            (area, None)
        };
        let inner = inset_h(content_area, self.options.padding_left, self.options.padding_right);

        self.ensure_layout(inner.width, theme);
        self.state.set_viewport(inner.width, inner.height);

        for row in 0..inner.height {
            let y = inner.y + row;
            let idx = (self.state.y as usize).saturating_add(row as usize);
            buf.set_style(Rect::new(inner.x, y, inner.width, 1), theme.text);
            if let Some(line) = self.laid.lines.get(idx) {
                render::render_spans_clipped(
                    inner.x,
                    y,
                    self.state.x,
                    inner.width,
                    buf,
                    &line.spans,
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

    /// Relayouts for `width` if the cache is stale and syncs content size.
    pub fn ensure_layout(&mut self, width: u16, theme: &Theme) {
        if self.cached_width == Some(width) {
            return;
        }
        self.laid = self.doc.layout(width, theme, self.highlighter.as_deref());
        self.cached_width = Some(width);
        self.layout_epoch += 1;
        self.state
            .set_content(self.laid.content_width, self.laid.lines.len() as u32);
    }
}

fn inset_h(area: Rect, left: u16, right: u16) -> Rect {
    let trim = (left + right).min(area.width);
    Rect::new(area.x + left.min(area.width), area.y, area.width - trim, area.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "# Title\n\nbody text\n\n## Section\n\n```rust\nfn main() {}\n```\n";

    fn laid_preview(width: u16, height: u16) -> PreviewView {
        let mut view = PreviewView::with_options(PreviewOptions {
            show_scrollbar: false,
            padding_left: 0,
            padding_right: 0,
            ..PreviewOptions::default()
        });
        view.set_markdown(SAMPLE);
        view.ensure_layout(width, &Theme::dark());
        view.state.set_viewport(width, height);
        view
    }

    #[test]
    fn layout_epoch_advances_only_on_rebuild() {
        let mut view = laid_preview(40, 10);
        let epoch = view.layout_epoch();
        view.ensure_layout(40, &Theme::dark());
        assert_eq!(view.layout_epoch(), epoch);
        view.ensure_layout(60, &Theme::dark());
        assert_eq!(view.layout_epoch(), epoch + 1);
        view.set_markdown("changed");
        view.ensure_layout(60, &Theme::dark());
        assert_eq!(view.layout_epoch(), epoch + 2);
    }

    #[test]
    fn animated_scroll_converges_and_stops() {
        let mut view = laid_preview(40, 3);
        view.state.set_content(40, 100);
        view.scroll_to_row(30);
        let mut guard = 0;
        while view.tick() {
            guard += 1;
            assert!(guard < 100, "animation did not converge");
        }
        assert_eq!(view.state.y, 30);
        assert!(!view.tick());
    }

    #[test]
    fn manual_scroll_cancels_animation() {
        let mut view = laid_preview(40, 3);
        view.state.set_content(40, 100);
        view.scroll_to_row(50);
        assert!(view.tick());
        let key = InputEvent::Key(mdscope_core::input::KeyEvent::char('j'));
        assert!(view.handle_event(&key));
        assert!(!view.tick());
    }

    #[test]
    fn code_region_lookup_respects_viewport() {
        let mut view = laid_preview(40, 4);
        // The sample's only code block sits at the bottom of the document,
        // out of reach of the top viewport.
        view.state.to_top();
        assert!(view.code_region_in_view().is_none());
        view.state.to_bottom();
        assert!(view.code_region_in_view().is_some());
    }

    #[test]
    fn renders_into_buffer_without_panicking() {
        let mut view = laid_preview(30, 5);
        let mut buf = Buffer::empty(Rect::new(0, 0, 30, 5));
        view.render_ref(Rect::new(0, 0, 30, 5), &mut buf, &Theme::dark());
        let first: String = (0..30)
            .map(|x| buf.cell((x, 0)).unwrap().symbol().to_string())
            .collect();
        assert!(first.trim_end().ends_with("Title"));
    }
}

//! Frame layout and drawing.
//!
//! Pure function of the [`App`] state; also records the pane rects back into
//! `app.areas` so mouse events can be routed on the next input.

use mdscope_core::help::HelpBar;
use mdscope_core::render;
use ratatui::Frame;
use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::style::Stylize;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Clear;

use crate::app::App;
use crate::app::Focus;
use crate::app::ScreenAreas;
use crate::notice::NoticeLevel;

const SIDEBAR_WIDTH: u16 = 30;
const GUIDE_WIDTH: u16 = 36;

pub fn draw(f: &mut Frame<'_>, app: &mut App) {
    let mut areas = ScreenAreas::default();
    let [title_row, main, status_row] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(f.area());

    draw_title(f, app, title_row);

    let mut zones: Vec<Constraint> = Vec::new();
    let sidebar = app.sidebar_visible && main.width > SIDEBAR_WIDTH + 20;
    let guide = app.guide_visible && main.width > GUIDE_WIDTH + 20;
    if sidebar {
        zones.push(Constraint::Length(SIDEBAR_WIDTH));
    }
    zones.push(Constraint::Min(1));
    if guide {
        zones.push(Constraint::Length(GUIDE_WIDTH));
    }
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(zones)
        .split(main);

    let mut chunk = chunks.iter();
    if sidebar {
        draw_sidebar(f, app, *chunk.next().unwrap(), &mut areas);
    }
    let content = *chunk.next().unwrap();
    draw_content(f, app, content, &mut areas);
    if guide {
        draw_guide(f, app, *chunk.next().unwrap(), &mut areas);
    }

    draw_status(f, app, status_row);
    draw_overlays(f, app);

    app.areas = areas;
}

fn pane_block<'a>(title: &'a str, focused: bool, app: &App) -> Block<'a> {
    let title_span = if focused {
        Span::styled(title, app.theme.accent.bold())
    } else {
        Span::styled(title, app.theme.muted)
    };
    Block::default()
        .title(title_span)
        .borders(Borders::ALL)
        .border_style(if focused {
            app.theme.accent
        } else {
            app.theme.border
        })
}

fn draw_title(f: &mut Frame<'_>, app: &App, area: Rect) {
    let buf = f.buffer_mut();
    buf.set_style(area, app.theme.muted);

    let mut spans: Vec<Span<'static>> = Vec::new();
    if app.session.has_document() {
        spans.push(Span::styled(
            format!(" {}.md", app.session.doc().name),
            app.theme.text,
        ));
        if app.session.is_dirty() {
            spans.push(Span::styled(" ●", app.theme.warning));
        }
        if app.session.edit_mode() {
            spans.push(Span::styled("  editing", app.theme.accent));
        }
    } else {
        spans.push(Span::styled(" mdscope", app.theme.accent.bold()));
    }
    render::render_spans_clipped(area.x, area.y, 0, area.width, buf, &spans, app.theme.muted);

    if let Some(pct) = app.preview.state.percent_y() {
        let label = format!("{pct}% ");
        let w = label.len() as u16;
        if area.width > w {
            render::render_str_clipped(
                area.x + area.width - w,
                area.y,
                0,
                w,
                buf,
                &label,
                app.theme.muted,
            );
        }
    }
}

fn draw_sidebar(f: &mut Frame<'_>, app: &mut App, area: Rect, areas: &mut ScreenAreas) {
    let recent_rows = (app.recent_entries.len() as u16).clamp(1, 10) + 2;
    let [outline_area, recent_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(recent_rows)])
        .areas(area);

    let outline_block = pane_block("Outline", app.focus == Focus::Outline, app);
    let outline_inner = outline_block.inner(outline_area);
    f.render_widget(outline_block, outline_area);
    app.outline
        .render_ref(outline_inner, f.buffer_mut(), &app.theme);
    areas.outline = outline_inner;

    let recent_block = pane_block("Recent", app.focus == Focus::Recents, app);
    let recent_inner = recent_block.inner(recent_area);
    f.render_widget(recent_block, recent_area);
    draw_recents(f, app, recent_inner);
    areas.recents = recent_inner;
}

fn draw_recents(f: &mut Frame<'_>, app: &App, area: Rect) {
    let buf = f.buffer_mut();
    if app.recent_entries.is_empty() {
        render::render_str_clipped(
            area.x,
            area.y,
            0,
            area.width,
            buf,
            "No recent files",
            app.theme.faint,
        );
        return;
    }
    for (row, entry) in app.recent_entries.iter().enumerate() {
        if row as u16 >= area.height {
            break;
        }
        let y = area.y + row as u16;
        let selected = app.focus == Focus::Recents && row == app.recent_selected;
        let style = if selected {
            app.theme.muted.patch(app.theme.selection)
        } else {
            app.theme.muted
        };
        buf.set_style(Rect::new(area.x, y, area.width, 1), style);
        render::render_str_clipped(
            area.x,
            y,
            0,
            area.width,
            buf,
            &format!("{}.md", entry.name),
            style,
        );
    }
}

fn draw_content(f: &mut Frame<'_>, app: &mut App, area: Rect, areas: &mut ScreenAreas) {
    if !app.session.has_document() {
        draw_welcome(f, app, area);
        return;
    }

    let (editor_area, preview_area) = if app.session.edit_mode() {
        let [left, right] = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(area);
        (Some(left), right)
    } else {
        (None, area)
    };

    if let Some(editor_area) = editor_area {
        let block = pane_block("Editor", app.focus == Focus::Editor, app);
        let inner = block.inner(editor_area);
        f.render_widget(block, editor_area);
        app.editor.render_ref(inner, f.buffer_mut(), &app.theme);
        areas.editor = inner;
        if app.focus == Focus::Editor && app.prompt.is_none() && app.confirm.is_none() {
            if let Some((x, y)) = app.editor.cursor_pos(inner) {
                f.set_cursor_position((x, y));
            }
        }
    }

    let block = pane_block("Preview", app.focus == Focus::Preview, app);
    let inner = block.inner(preview_area);
    f.render_widget(block, preview_area);
    if app.session.doc().raw_text.trim().is_empty() {
        // Live-edited down to nothing: placeholder instead of stale output.
        // The layout still refreshes so the outline empties with it.
        app.preview.ensure_layout(inner.width, &app.theme);
        let message = if app.session.edit_mode() {
            "Write markdown on the left; it renders here live."
        } else {
            "Nothing to preview."
        };
        render::render_str_clipped(
            inner.x,
            inner.y,
            0,
            inner.width,
            f.buffer_mut(),
            message,
            app.theme.faint,
        );
    } else {
        app.preview.render_ref(inner, f.buffer_mut(), &app.theme);
    }
    areas.preview = inner;
}

fn draw_welcome(f: &mut Frame<'_>, app: &App, area: Rect) {
    let lines = [
        ("mdscope", app.theme.accent.bold()),
        ("", Style::default()),
        ("Open a markdown file to get started.", app.theme.text),
        ("", Style::default()),
        ("^o open a file    ^n new document", app.theme.muted),
        ("^b panel  ^t theme  ^g guide  q quit", app.theme.faint),
    ];
    let top = area.y + area.height.saturating_sub(lines.len() as u16) / 2;
    let buf = f.buffer_mut();
    for (i, (text, style)) in lines.iter().enumerate() {
        let y = top + i as u16;
        if y >= area.y + area.height {
            break;
        }
        let w = text.len() as u16;
        let x = area.x + area.width.saturating_sub(w) / 2;
        let max = area.width.saturating_sub(x - area.x);
        render::render_str_clipped(x, y, 0, max, buf, text, *style);
    }
}

fn draw_guide(f: &mut Frame<'_>, app: &mut App, area: Rect, areas: &mut ScreenAreas) {
    let block = pane_block("Markdown guide", app.focus == Focus::Guide, app);
    let inner = block.inner(area);
    f.render_widget(block, area);
    app.guide.render_ref(inner, f.buffer_mut(), &app.theme);
    areas.guide = inner;
}

fn draw_status(f: &mut Frame<'_>, app: &App, area: Rect) {
    let buf = f.buffer_mut();
    if let Some((text, level)) = app.notices.current() {
        let style = match level {
            NoticeLevel::Info => app.theme.accent,
            NoticeLevel::Success => app.theme.success,
            NoticeLevel::Warning => app.theme.warning,
            NoticeLevel::Error => app.theme.danger,
        };
        buf.set_style(area, style);
        render::render_str_clipped(
            area.x + 1,
            area.y,
            0,
            area.width.saturating_sub(1),
            buf,
            text,
            style,
        );
        return;
    }
    HelpBar::new(app.help_bindings()).render_ref(area, buf, &app.theme);
}

fn draw_overlays(f: &mut Frame<'_>, app: &App) {
    if let Some(confirm) = &app.confirm {
        let width = (confirm.message.len() as u16 + 4).min(f.area().width);
        let area = centered(f.area(), width, 3);
        f.render_widget(Clear, area);
        let block = Block::default()
            .title(Span::styled("Discard changes?", app.theme.danger.bold()))
            .borders(Borders::ALL)
            .border_style(app.theme.danger);
        let inner = block.inner(area);
        f.render_widget(block, area);
        render::render_str_clipped(
            inner.x + 1,
            inner.y,
            0,
            inner.width.saturating_sub(1),
            f.buffer_mut(),
            confirm.message,
            app.theme.text,
        );
        return;
    }

    if let Some(prompt) = &app.prompt {
        let area = centered(f.area(), 56.min(f.area().width), 3);
        f.render_widget(Clear, area);
        let block = Block::default()
            .title(Span::styled(prompt.title, app.theme.accent.bold()))
            .borders(Borders::ALL)
            .border_style(app.theme.accent);
        let inner = block.inner(area);
        f.render_widget(block, area);
        render::render_str_clipped(
            inner.x + 1,
            inner.y,
            0,
            inner.width.saturating_sub(1),
            f.buffer_mut(),
            prompt.text(),
            app.theme.text,
        );
        let cursor_x =
            inner.x + 1 + prompt.cursor().min(inner.width.saturating_sub(2) as usize) as u16;
        f.set_cursor_position((cursor_x, inner.y));
    }
}

fn centered(outer: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(outer.width);
    let height = height.min(outer.height);
    Rect::new(
        outer.x + (outer.width - width) / 2,
        outer.y + (outer.height - height) / 2,
        width,
        height,
    )
}

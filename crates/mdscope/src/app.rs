//! Application state and event handling.
//!
//! `App` owns the single live session, the preview and its navigation
//! (outline + active-section tracker), the recent-document store and all
//! transient UI state (prompts, confirm gate, notices, focus). The main loop
//! feeds it input events and ticks; `ui::draw` renders it.

use std::path::Path;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use mdscope_core::input::InputEvent;
use mdscope_core::input::KeyCode;
use mdscope_core::input::KeyEvent;
use mdscope_core::input::MouseButton;
use mdscope_core::input::MouseEvent;
use mdscope_core::input::MouseKind;
use mdscope_core::text::CodeHighlighter;
use mdscope_core::textarea::EditAction;
use mdscope_core::textarea::TextArea;
use mdscope_core::theme::Theme;
use mdscope_core::theme::ThemeMode;
use mdscope_markdown::outline::OutlinePanel;
use mdscope_markdown::outline::extract_outline;
use mdscope_markdown::preview::PreviewView;
use mdscope_markdown::tracker::ActiveSectionTracker;
use mdscope_markdown::tracker::BandOptions;
use mdscope_syntax::SyntectHighlighter;
use ratatui::layout::Rect;

use crate::clipboard::Clipboard;
use crate::commands::Action;
use crate::commands::CommandSet;
use crate::docfile;
use crate::guide::GuidePanel;
use crate::notice::NoticeBoard;
use crate::notice::NoticeLevel;
use crate::prompt::ConfirmGate;
use crate::prompt::ConfirmOutcome;
use crate::prompt::PromptKind;
use crate::prompt::PromptOutcome;
use crate::prompt::TextPrompt;
use crate::prompt::confirm_outcome;
use crate::recent::RecentEntry;
use crate::recent::RecentStore;
use crate::session::DebouncedEdit;
use crate::session::DocumentSession;
use crate::storage::Storage;

const THEME_KEY: &str = "theme";
const DISCARD_MESSAGE: &str = "Unsaved changes will be lost. Continue? (y/n)";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Preview,
    Outline,
    Recents,
    Editor,
    Guide,
}

/// Destructive actions parked behind the discard-confirmation gate.
#[derive(Clone, Debug)]
pub enum PendingAction {
    Open(PathBuf),
    LoadDocument { name: String, raw: String },
    New,
    Quit,
}

/// Rects of the panes from the last draw, for mouse routing.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScreenAreas {
    pub outline: Rect,
    pub recents: Rect,
    pub preview: Rect,
    pub editor: Rect,
    pub guide: Rect,
}

#[derive(Clone, Copy, Debug)]
pub struct AppOptions {
    pub highlight: bool,
    pub theme_override: Option<ThemeMode>,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            highlight: true,
            theme_override: None,
        }
    }
}

pub struct App {
    pub session: DocumentSession,
    pub preview: PreviewView,
    pub outline: OutlinePanel,
    tracker: Option<ActiveSectionTracker>,
    outline_epoch: u64,
    pub editor: TextArea,
    pub recents: RecentStore,
    pub recent_entries: Vec<RecentEntry>,
    pub recent_selected: usize,
    storage: Rc<dyn Storage>,
    pub theme_mode: ThemeMode,
    pub theme: Theme,
    highlight_enabled: bool,
    pub notices: NoticeBoard,
    pub prompt: Option<TextPrompt>,
    pub confirm: Option<ConfirmGate<PendingAction>>,
    pub sidebar_visible: bool,
    pub guide: GuidePanel,
    pub guide_visible: bool,
    pub focus: Focus,
    commands: CommandSet,
    clipboard: Box<dyn Clipboard>,
    pub areas: ScreenAreas,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        storage: Rc<dyn Storage>,
        clipboard: Box<dyn Clipboard>,
        options: AppOptions,
    ) -> Self {
        let theme_mode = options
            .theme_override
            .or_else(|| storage.get(THEME_KEY).as_deref().and_then(ThemeMode::parse))
            .unwrap_or_default();

        let recents = RecentStore::new(storage.clone());
        let recent_entries = recents.list();

        let mut app = Self {
            session: DocumentSession::new(),
            preview: PreviewView::new(),
            outline: OutlinePanel::default(),
            tracker: None,
            outline_epoch: 0,
            editor: TextArea::new(),
            recents,
            recent_entries,
            recent_selected: 0,
            storage,
            theme_mode,
            theme: Theme::for_mode(theme_mode),
            highlight_enabled: options.highlight,
            notices: NoticeBoard::default(),
            prompt: None,
            confirm: None,
            sidebar_visible: true,
            guide: GuidePanel::new(),
            guide_visible: false,
            focus: Focus::Preview,
            commands: CommandSet::default(),
            clipboard,
            areas: ScreenAreas::default(),
            should_quit: false,
        };
        app.apply_highlighter();
        app
    }

    pub fn help_bindings(&self) -> Vec<mdscope_core::keymap::Binding> {
        self.commands.help_bindings()
    }

    /// Opens the CLI-provided file; the session is still clean, so no gate.
    pub fn open_initial(&mut self, path: &Path, now: Instant) {
        self.try_open(path, now);
    }

    pub fn handle_input(&mut self, event: InputEvent, now: Instant) {
        // Prompts and the confirm gate are modal: only keys reach them.
        if (self.confirm.is_some() || self.prompt.is_some())
            && !matches!(event, InputEvent::Key(_))
        {
            return;
        }
        if let InputEvent::Key(key) = &event {
            if self.confirm.is_some() {
                self.handle_confirm_key(*key, now);
                return;
            }
            if self.prompt.is_some() {
                self.handle_prompt_key(*key, now);
                return;
            }
            let editing = self.focus == Focus::Editor && self.session.edit_mode();
            if let Some(action) = self.commands.action_for(key, editing) {
                self.dispatch(action, now);
                return;
            }
        }

        match event {
            InputEvent::Mouse(m) => self.handle_mouse(m, now),
            InputEvent::Key(key) => match self.focus {
                Focus::Editor => self.editor_input(InputEvent::Key(key), now),
                Focus::Outline => self.outline_key(key),
                Focus::Recents => self.recents_key(key, now),
                Focus::Guide => self.guide_key(key, now),
                Focus::Preview => {
                    self.preview.handle_event(&InputEvent::Key(key));
                }
            },
            ev @ InputEvent::Paste(_) => {
                if self.focus == Focus::Editor {
                    self.editor_input(ev, now);
                }
            }
        }
    }

    /// Timer work: notice expiry, the edit debounce and scroll animation.
    /// Returns true when something visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut redraw = self.notices.tick(now);
        if let Some(edit) = self.session.poll_edit(now) {
            match edit {
                DebouncedEdit::Render(text) => self.preview.set_markdown(&text),
                DebouncedEdit::Clear => self.preview.set_markdown(""),
            }
            redraw = true;
        }
        if self.preview.tick() {
            redraw = true;
        }
        redraw
    }

    /// Runs after every draw (layout happens there): rebuilds the outline
    /// when the preview re-laid itself, and feeds the scroll position to the
    /// active-section tracker. Returns true when navigation state changed.
    pub fn sync_navigation(&mut self) -> bool {
        let mut changed = false;

        if self.preview.layout_epoch() != self.outline_epoch {
            // Tear down the stale subscription before binding the new anchor
            // set; a disposed tracker can never mark entries active.
            if let Some(tracker) = self.tracker.as_mut() {
                tracker.dispose();
            }
            let entries = extract_outline(self.preview.anchors());
            let rows: Vec<usize> = entries.iter().map(|e| e.anchor.line).collect();
            self.outline.set_entries(entries);
            self.tracker = Some(ActiveSectionTracker::subscribe(rows, BandOptions::default()));
            self.outline_epoch = self.preview.layout_epoch();
            changed = true;
        }

        if let Some(tracker) = self.tracker.as_mut() {
            if let Some(index) = tracker.observe(&self.preview.state) {
                self.outline.activate(index);
                changed = true;
            }
        }
        changed
    }

    /* ---------------- key routing ---------------- */

    fn handle_confirm_key(&mut self, key: KeyEvent, now: Instant) {
        match confirm_outcome(key) {
            ConfirmOutcome::Pending => {}
            ConfirmOutcome::Proceed => {
                if let Some(gate) = self.confirm.take() {
                    self.run_pending(gate.pending, now);
                }
            }
            // Declining is a full no-op: the pending action is dropped.
            ConfirmOutcome::Decline => self.confirm = None,
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent, now: Instant) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };
        match prompt.handle_key(key) {
            PromptOutcome::Pending => {}
            // A cancelled save dialog is not an error; nothing changes,
            // including the dirty flag.
            PromptOutcome::Cancel => self.prompt = None,
            PromptOutcome::Submit(text) => {
                let kind = prompt.kind;
                self.prompt = None;
                match kind {
                    PromptKind::OpenPath => {
                        self.request(PendingAction::Open(PathBuf::from(text)), now)
                    }
                    PromptKind::SaveAs => self.finish_save(&text, now),
                }
            }
        }
    }

    fn editor_input(&mut self, event: InputEvent, now: Instant) {
        if self.editor.input(event) == EditAction::Edited {
            self.session.note_keystroke(self.editor.text(), now);
        }
    }

    fn outline_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.outline.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.outline.select_prev(),
            KeyCode::Enter => self.activate_outline_entry(self.outline.selected()),
            _ => {}
        }
    }

    /// Outline activation scrolls the heading's row to the viewport top with
    /// the animated scroll; it never re-renders or navigates.
    fn activate_outline_entry(&mut self, index: usize) {
        self.outline.select(index);
        if let Some(target) = self.outline.entries().get(index).map(|e| e.anchor.line) {
            self.preview.scroll_to_row(target);
        }
    }

    fn recents_key(&mut self, key: KeyEvent, now: Instant) {
        let count = self.recent_entries.len();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                if count > 0 {
                    self.recent_selected = (self.recent_selected + 1).min(count - 1);
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.recent_selected = self.recent_selected.saturating_sub(1);
            }
            KeyCode::Enter => self.load_recent(self.recent_selected, now),
            _ => {}
        }
    }

    fn load_recent(&mut self, index: usize, now: Instant) {
        if let Some(entry) = self.recent_entries.get(index) {
            self.request(
                PendingAction::LoadDocument {
                    name: entry.name.clone(),
                    raw: entry.raw.clone(),
                },
                now,
            );
        }
    }

    fn guide_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.guide.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.guide.select_prev(),
            KeyCode::Enter => self.guide_activate(now),
            _ => {}
        }
    }

    fn guide_activate(&mut self, now: Instant) {
        let Some(item) = self.guide.selected_item() else {
            return;
        };
        if self.session.edit_mode() {
            self.editor.insert_snippet(item.insert);
            self.session.note_keystroke(self.editor.text(), now);
            self.notices.show(NoticeLevel::Info, "Inserted", now);
        } else {
            match self.clipboard.copy(item.insert) {
                Ok(()) => self.notices.show(
                    NoticeLevel::Info,
                    format!("Copied: {}", item.syntax),
                    now,
                ),
                Err(err) => self
                    .notices
                    .show(NoticeLevel::Error, format!("Copy failed: {err}"), now),
            }
        }
    }

    fn handle_mouse(&mut self, m: MouseEvent, now: Instant) {
        match m.kind {
            MouseKind::ScrollUp | MouseKind::ScrollDown => {
                if contains(self.areas.preview, m.x, m.y) {
                    self.preview.handle_event(&InputEvent::Mouse(m));
                } else if contains(self.areas.editor, m.x, m.y) {
                    let delta = if m.kind == MouseKind::ScrollUp { -3 } else { 3 };
                    self.editor.state.scroll_y_by(delta);
                }
            }
            MouseKind::Down(MouseButton::Left) => {
                if contains(self.areas.outline, m.x, m.y) {
                    if let Some(index) = self.outline.hit_test(self.areas.outline, m.y) {
                        self.focus = Focus::Outline;
                        self.activate_outline_entry(index);
                    }
                } else if contains(self.areas.recents, m.x, m.y) {
                    let index = (m.y - self.areas.recents.y) as usize;
                    if index < self.recent_entries.len() {
                        self.focus = Focus::Recents;
                        self.recent_selected = index;
                        self.load_recent(index, now);
                    }
                }
            }
            _ => {}
        }
    }

    /* ---------------- actions ---------------- */

    fn dispatch(&mut self, action: Action, now: Instant) {
        match action {
            Action::Open => self.prompt = Some(TextPrompt::open_path()),
            Action::Save => self.begin_save(now),
            Action::NewDocument => self.request(PendingAction::New, now),
            Action::ToggleEdit => self.toggle_edit(!self.session.edit_mode()),
            Action::ToggleSidebar => {
                self.sidebar_visible = !self.sidebar_visible;
                if !self.sidebar_visible
                    && matches!(self.focus, Focus::Outline | Focus::Recents)
                {
                    self.focus = Focus::Preview;
                }
            }
            Action::ToggleTheme => self.toggle_theme(),
            Action::ToggleGuide => {
                self.guide_visible = !self.guide_visible;
                self.focus = if self.guide_visible {
                    Focus::Guide
                } else if self.session.edit_mode() {
                    Focus::Editor
                } else {
                    Focus::Preview
                };
            }
            Action::CopyCode => self.copy_code(now),
            Action::FocusNext => self.cycle_focus(),
            Action::Quit => self.request(PendingAction::Quit, now),
        }
    }

    /// Routes a destructive action through the discard gate when dirty.
    fn request(&mut self, pending: PendingAction, now: Instant) {
        if self.session.is_dirty() {
            self.confirm = Some(ConfirmGate {
                message: DISCARD_MESSAGE,
                pending,
            });
        } else {
            self.run_pending(pending, now);
        }
    }

    fn run_pending(&mut self, pending: PendingAction, now: Instant) {
        match pending {
            PendingAction::Open(path) => self.try_open(&path, now),
            PendingAction::LoadDocument { name, raw } => self.load_document(&name, &raw),
            PendingAction::New => self.new_document(now),
            PendingAction::Quit => self.should_quit = true,
        }
    }

    fn try_open(&mut self, path: &Path, now: Instant) {
        match docfile::document_stem(path) {
            None => {
                self.notices.show(
                    NoticeLevel::Warning,
                    "Only .md, .markdown or .txt files can be opened",
                    now,
                );
            }
            Some(name) => match docfile::read_document(path) {
                Ok(raw) => self.load_document(&name, &raw),
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "open failed");
                    self.notices
                        .show(NoticeLevel::Warning, format!("Could not read {name}"), now);
                }
            },
        }
    }

    fn load_document(&mut self, name: &str, raw: &str) {
        tracing::info!(name, bytes = raw.len(), "document loaded");
        self.session.load(raw, name);
        if self.session.edit_mode() {
            self.editor.set_text(raw);
        }
        self.preview.set_markdown(raw);
        self.preview.state.to_top();
        self.recents.record(name, raw);
        self.recent_entries = self.recents.list();
        self.recent_selected = 0;
    }

    fn new_document(&mut self, now: Instant) {
        self.session.new_document();
        self.editor.set_text("");
        self.preview.set_markdown("");
        self.focus = Focus::Editor;
        self.notices
            .show(NoticeLevel::Info, "New document: start typing on the left", now);
    }

    fn toggle_edit(&mut self, on: bool) {
        if on {
            if let Some(seed) = self.session.set_edit_mode(true) {
                self.editor.set_text(seed);
            }
            self.focus = Focus::Editor;
        } else {
            // Leaving edit mode loses nothing: the last edited text becomes
            // the document text.
            self.session.commit_text(self.editor.text());
            self.session.set_edit_mode(false);
            self.preview.set_markdown(&self.session.doc().raw_text);
            self.focus = Focus::Preview;
        }
    }

    fn begin_save(&mut self, _now: Instant) {
        if self.session.edit_mode() {
            self.session.commit_text(self.editor.text());
        }
        if !self.session.can_save() {
            return;
        }
        let suggested = format!("{}.md", self.session.doc().name);
        self.prompt = Some(TextPrompt::save_as(suggested));
    }

    fn finish_save(&mut self, target: &str, now: Instant) {
        let path = docfile::normalize_save_target(target);
        let content = self.session.doc().raw_text.clone();

        match docfile::write_document(&path, &content) {
            Ok(()) => {
                self.session.mark_saved();
                tracing::info!(path = %path.display(), "document saved");
                self.notices
                    .show(NoticeLevel::Success, format!("Saved {}", path.display()), now);
            }
            Err(err) => {
                // Interactive tier failed for a non-cancellation reason:
                // retry through the fallback location.
                tracing::warn!(path = %path.display(), %err, "save failed, using fallback");
                let name = self.session.doc().name.clone();
                match docfile::fallback_write(&name, &content) {
                    Ok(fallback) => {
                        self.session.mark_saved();
                        self.notices.show(
                            NoticeLevel::Success,
                            format!("Saved {}", fallback.display()),
                            now,
                        );
                    }
                    Err(err) => {
                        self.notices
                            .show(NoticeLevel::Error, format!("Save failed: {err}"), now);
                    }
                }
            }
        }
    }

    fn toggle_theme(&mut self) {
        self.theme_mode = self.theme_mode.toggled();
        self.theme = Theme::for_mode(self.theme_mode);
        self.apply_highlighter();
        self.preview.invalidate();
        self.storage.set(THEME_KEY, self.theme_mode.as_str());
    }

    fn apply_highlighter(&mut self) {
        let highlighter = self.highlight_enabled.then(|| {
            Arc::new(SyntectHighlighter::for_mode(self.theme_mode)) as Arc<dyn CodeHighlighter>
        });
        self.preview.set_highlighter(highlighter);
    }

    fn copy_code(&mut self, now: Instant) {
        let text = match self.preview.code_region_in_view() {
            Some(region) => region.text.clone(),
            None => {
                self.notices
                    .show(NoticeLevel::Info, "No code block in view", now);
                return;
            }
        };
        match self.clipboard.copy(&text) {
            Ok(()) => self
                .notices
                .show(NoticeLevel::Success, "Code block copied", now),
            Err(err) => self
                .notices
                .show(NoticeLevel::Error, format!("Copy failed: {err}"), now),
        }
    }

    fn cycle_focus(&mut self) {
        let mut order = vec![Focus::Preview];
        if self.sidebar_visible {
            order.push(Focus::Outline);
            order.push(Focus::Recents);
        }
        if self.session.edit_mode() {
            order.push(Focus::Editor);
        }
        if self.guide_visible {
            order.push(Focus::Guide);
        }
        let at = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(at + 1) % order.len()];
    }
}

fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}

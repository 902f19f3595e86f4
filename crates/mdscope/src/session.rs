//! The single live document and its edit/dirty lifecycle.
//!
//! Exactly one [`Document`] exists at a time; `load` and `new_document`
//! replace it wholesale. Live-edit keystrokes mark it dirty immediately and
//! schedule a debounced re-render through [`Debouncer`]; the event loop
//! polls the deadline on tick, and each new keystroke implicitly cancels the
//! previously scheduled one.

use std::time::Duration;
use std::time::Instant;

pub const UNTITLED: &str = "untitled";
pub const EDIT_DEBOUNCE: Duration = Duration::from_millis(120);

#[derive(Clone, Debug)]
pub struct Document {
    pub name: String,
    pub raw_text: String,
    pub dirty: bool,
}

/// Cancellable deferred task: only the last scheduled deadline fires.
#[derive(Clone, Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Schedules (or reschedules, cancelling the pending deadline).
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once, when `now` passes the scheduled deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// What the debounced edit resolved to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DebouncedEdit {
    /// Non-empty text: re-render the preview content.
    Render(String),
    /// Text edited down to nothing: clear the preview, show the placeholder.
    Clear,
}

pub struct DocumentSession {
    doc: Document,
    edit_mode: bool,
    /// False until the first load/new; the UI shows the welcome pane.
    has_document: bool,
    debounce: Debouncer,
    pending_edit: Option<String>,
}

impl Default for DocumentSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentSession {
    pub fn new() -> Self {
        Self {
            doc: Document {
                name: UNTITLED.to_string(),
                raw_text: String::new(),
                dirty: false,
            },
            edit_mode: false,
            has_document: false,
            debounce: Debouncer::new(EDIT_DEBOUNCE),
            pending_edit: None,
        }
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn is_dirty(&self) -> bool {
        self.doc.dirty
    }

    pub fn has_document(&self) -> bool {
        self.has_document
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// Replaces the document. Callers run the discard gate first.
    pub fn load(&mut self, raw: &str, name: &str) {
        self.doc = Document {
            name: name.to_string(),
            raw_text: raw.to_string(),
            dirty: false,
        };
        self.has_document = true;
        self.pending_edit = None;
        self.debounce.cancel();
    }

    /// Resets to an empty untitled document and forces edit mode.
    pub fn new_document(&mut self) {
        self.load("", UNTITLED);
        self.edit_mode = true;
    }

    /// Toggles edit mode. Returns the text to seed the editor with when
    /// entering; leaving commits nothing here, the caller pushes the final
    /// editor text through [`Self::commit_text`] so no content is lost.
    pub fn set_edit_mode(&mut self, on: bool) -> Option<String> {
        self.edit_mode = on;
        on.then(|| self.doc.raw_text.clone())
    }

    /// Folds the editor's current text into the document without touching
    /// the dirty flag (edit mode is a view toggle, not a commit boundary).
    pub fn commit_text(&mut self, text: String) {
        self.doc.raw_text = text;
    }

    /// One edit keystroke: dirty immediately, re-render later.
    pub fn note_keystroke(&mut self, text: String, now: Instant) {
        self.doc.dirty = true;
        self.pending_edit = Some(text);
        self.debounce.schedule(now);
    }

    /// Resolves the debounced edit once its window elapses.
    pub fn poll_edit(&mut self, now: Instant) -> Option<DebouncedEdit> {
        if !self.debounce.poll(now) {
            return None;
        }
        let text = self.pending_edit.take()?;
        self.doc.raw_text = text.clone();
        if text.trim().is_empty() {
            Some(DebouncedEdit::Clear)
        } else {
            Some(DebouncedEdit::Render(text))
        }
    }

    /// Save is possible once there is something to write.
    pub fn can_save(&self) -> bool {
        self.has_document && !self.doc.raw_text.trim().is_empty()
    }

    pub fn mark_saved(&mut self) {
        self.doc.dirty = false;
    }
}

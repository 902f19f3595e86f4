//! Modal overlays: single-line text prompts and the discard-confirmation
//! gate.
//!
//! The save prompt stands in for the platform save dialog; Esc is the
//! user-cancelled outcome and is distinguished from write failures, which
//! the caller handles through the fallback save tier.

use mdscope_core::input::KeyCode;
use mdscope_core::input::KeyEvent;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptKind {
    OpenPath,
    SaveAs,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PromptOutcome {
    Pending,
    Submit(String),
    Cancel,
}

#[derive(Clone, Debug)]
pub struct TextPrompt {
    pub kind: PromptKind,
    pub title: &'static str,
    input: String,
    /// Char index into `input`.
    cursor: usize,
}

impl TextPrompt {
    pub fn open_path() -> Self {
        Self {
            kind: PromptKind::OpenPath,
            title: "Open file (.md, .markdown, .txt)",
            input: String::new(),
            cursor: 0,
        }
    }

    pub fn save_as(suggested: String) -> Self {
        let cursor = suggested.chars().count();
        Self {
            kind: PromptKind::SaveAs,
            title: "Save as",
            input: suggested,
            cursor,
        }
    }

    pub fn text(&self) -> &str {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PromptOutcome {
        match key.code {
            KeyCode::Esc => return PromptOutcome::Cancel,
            KeyCode::Enter => {
                let trimmed = self.input.trim();
                if trimmed.is_empty() {
                    return PromptOutcome::Cancel;
                }
                return PromptOutcome::Submit(trimmed.to_string());
            }
            KeyCode::Char(c) if !key.modifiers.ctrl && !key.modifiers.alt => {
                let at = byte_index(&self.input, self.cursor);
                self.input.insert(at, c);
                self.cursor += 1;
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    let start = byte_index(&self.input, self.cursor - 1);
                    let end = byte_index(&self.input, self.cursor);
                    self.input.replace_range(start..end, "");
                    self.cursor -= 1;
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.input.chars().count() {
                    let start = byte_index(&self.input, self.cursor);
                    let end = byte_index(&self.input, self.cursor + 1);
                    self.input.replace_range(start..end, "");
                }
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.input.chars().count()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.input.chars().count(),
            _ => {}
        }
        PromptOutcome::Pending
    }
}

fn byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Blocking yes/no gate in front of a destructive action. "No" must be a
/// complete no-op, so the pending action is simply dropped on decline.
#[derive(Clone, Debug)]
pub struct ConfirmGate<T> {
    pub message: &'static str,
    pub pending: T,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Pending,
    Proceed,
    Decline,
}

pub fn confirm_outcome(key: KeyEvent) -> ConfirmOutcome {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => ConfirmOutcome::Proceed,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => ConfirmOutcome::Decline,
        _ => ConfirmOutcome::Pending,
    }
}

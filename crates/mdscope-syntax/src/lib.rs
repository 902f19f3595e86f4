//! `syntect` implementation of the [`CodeHighlighter`] seam.
//!
//! Fence info strings are resolved first as file extensions (` ```rs `),
//! then as syntax names (` ```rust `); anything unknown falls back to plain
//! text. The syntect theme follows the UI theme mode so code blocks do not
//! glare in light mode.

use mdscope_core::text::CodeHighlighter;
use mdscope_core::theme::ThemeMode;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Span;
use syntect::easy::HighlightLines;
use syntect::highlighting::FontStyle;
use syntect::highlighting::Style as SynStyle;
use syntect::highlighting::Theme;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxReference;
use syntect::parsing::SyntaxSet;

const DARK_THEME: &str = "base16-ocean.dark";
const LIGHT_THEME: &str = "InspiredGitHub";

pub struct SyntectHighlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl SyntectHighlighter {
    pub fn for_mode(mode: ThemeMode) -> Self {
        let name = match mode {
            ThemeMode::Dark => DARK_THEME,
            ThemeMode::Light => LIGHT_THEME,
        };
        Self::with_theme_name(name)
    }

    pub fn with_theme_name(name: &str) -> Self {
        let theme_set = ThemeSet::load_defaults();
        let theme = theme_set
            .themes
            .get(name)
            .or_else(|| theme_set.themes.values().next())
            .cloned()
            .unwrap_or_default();
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
        }
    }

    fn resolve(&self, language: Option<&str>) -> &SyntaxReference {
        language
            .and_then(|lang| {
                self.syntax_set
                    .find_syntax_by_extension(lang)
                    .or_else(|| self.syntax_set.find_syntax_by_token(lang))
            })
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::for_mode(ThemeMode::Dark)
    }
}

impl CodeHighlighter for SyntectHighlighter {
    fn highlight_lines(&self, language: Option<&str>, lines: &[&str]) -> Vec<Vec<Span<'static>>> {
        let syntax = self.resolve(language);
        let mut hl = HighlightLines::new(syntax, &self.theme);

        lines
            .iter()
            .map(|line| {
                let regions = hl.highlight_line(line, &self.syntax_set).unwrap_or_default();
                let mut spans: Vec<Span<'static>> = regions
                    .into_iter()
                    .filter(|(_, s)| !s.is_empty())
                    .map(|(style, s)| Span::styled(s.to_string(), convert(style)))
                    .collect();
                if spans.is_empty() {
                    spans.push(Span::raw((*line).to_string()));
                }
                spans
            })
            .collect()
    }
}

fn convert(s: SynStyle) -> Style {
    let mut out = Style::default().fg(Color::Rgb(s.foreground.r, s.foreground.g, s.foreground.b));
    if s.font_style.contains(FontStyle::BOLD) {
        out = out.add_modifier(Modifier::BOLD);
    }
    if s.font_style.contains(FontStyle::ITALIC) {
        out = out.add_modifier(Modifier::ITALIC);
    }
    if s.font_style.contains(FontStyle::UNDERLINE) {
        out = out.add_modifier(Modifier::UNDERLINED);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlights_rust_by_extension_and_token() {
        let h = SyntectHighlighter::default();
        for lang in ["rs", "rust"] {
            let lines = h.highlight_lines(Some(lang), &["fn main() {}"]);
            assert_eq!(lines.len(), 1);
            assert!(!lines[0].is_empty());
        }
    }

    #[test]
    fn unknown_language_falls_back_to_plain_text() {
        let h = SyntectHighlighter::default();
        let lines = h.highlight_lines(Some("nosuchlang"), &["hello", ""]);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn both_theme_modes_resolve_a_theme() {
        let _ = SyntectHighlighter::for_mode(ThemeMode::Dark);
        let _ = SyntectHighlighter::for_mode(ThemeMode::Light);
    }
}

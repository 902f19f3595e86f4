use ratatui::style::Style;
use ratatui::text::Span;

/// Seam for syntax colorization of fenced code regions.
///
/// The markdown layout calls this once per code block; backends live in
/// separate crates so this one stays free of heavyweight dependencies.
pub trait CodeHighlighter {
    fn highlight_lines(&self, language: Option<&str>, lines: &[&str]) -> Vec<Vec<Span<'static>>>;
}

/// Pass-through backend: every line becomes a single unstyled span.
pub struct NoHighlight;

impl CodeHighlighter for NoHighlight {
    fn highlight_lines(&self, _language: Option<&str>, lines: &[&str]) -> Vec<Vec<Span<'static>>> {
        lines
            .iter()
            .map(|l| vec![Span::styled((*l).to_string(), Style::default())])
            .collect()
    }
}

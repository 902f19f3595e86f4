//! Markdown conversion and layout.
//!
//! [`MarkdownDocument::parse`] turns raw text into a flat block list via
//! `pulldown-cmark` (tables, strikethrough and task lists enabled; soft
//! breaks render as hard line breaks). [`MarkdownDocument::layout`] then
//! materializes the blocks into styled terminal lines for a given width,
//! assigning a [`HeadingAnchor`] to every level 1–3 heading and registering
//! one copy region per fenced code block.
//!
//! A laid-out document is rebuilt wholesale on every source or width change;
//! there is no incremental diffing.

use mdscope_core::text::CodeHighlighter;
use mdscope_core::theme::Theme;
use pulldown_cmark::Alignment;
use pulldown_cmark::CodeBlockKind;
use pulldown_cmark::Event;
use pulldown_cmark::HeadingLevel;
use pulldown_cmark::Options;
use pulldown_cmark::Parser;
use pulldown_cmark::Tag;
use pulldown_cmark::TagEnd;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Span;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

use crate::anchor::HeadingAnchor;
use crate::anchor::slugify;

const CODE_INDENT: usize = 4;
const QUOTE_PREFIX: &str = "| ";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct InlineFlags {
    strong: bool,
    emphasis: bool,
    strike: bool,
}

#[derive(Clone, Debug)]
struct Segment {
    text: String,
    flags: InlineFlags,
    inline_code: bool,
    link: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ProseKind {
    Paragraph,
    Heading(u8),
    ListItem,
}

#[derive(Clone, Debug)]
struct ProseBlock {
    kind: ProseKind,
    /// Hard-broken logical lines; wrapping happens at layout time.
    lines: Vec<Vec<Segment>>,
    heading_text: String,
    first_prefix: String,
    rest_prefix: String,
    quote_depth: usize,
}

#[derive(Clone, Debug)]
struct CodeBlock {
    language: Option<String>,
    lines: Vec<String>,
    quote_depth: usize,
}

#[derive(Clone, Debug)]
struct TableBlock {
    aligns: Vec<Alignment>,
    head: Vec<String>,
    rows: Vec<Vec<String>>,
}

#[derive(Clone, Debug)]
enum Block {
    Prose(ProseBlock),
    Code(CodeBlock),
    Table(TableBlock),
    Rule,
}

/// One styled terminal row of the laid-out document.
#[derive(Clone, Debug)]
pub struct LayoutLine {
    pub spans: Vec<Span<'static>>,
    pub plain: String,
}

/// A fenced code block's position in the laid-out document, the target of the
/// copy affordance. Regions are keyed by block index and rebuilt wholesale on
/// every layout, so a re-render can never duplicate an affordance.
#[derive(Clone, Debug)]
pub struct CodeRegion {
    pub index: usize,
    pub start_line: usize,
    pub line_count: usize,
    pub language: Option<String>,
    pub text: String,
}

#[derive(Clone, Debug, Default)]
pub struct LaidOutDocument {
    pub lines: Vec<LayoutLine>,
    pub anchors: Vec<HeadingAnchor>,
    pub code_regions: Vec<CodeRegion>,
    pub content_width: u32,
}

#[derive(Clone, Debug, Default)]
pub struct MarkdownDocument {
    source: String,
    blocks: Vec<Block>,
}

impl MarkdownDocument {
    pub fn parse(source: impl Into<String>) -> Self {
        let source = source.into();
        let blocks = parse_blocks(&source);
        Self { source, blocks }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Lays the document out for `width` columns.
    pub fn layout(
        &self,
        width: u16,
        theme: &Theme,
        highlighter: Option<&dyn CodeHighlighter>,
    ) -> LaidOutDocument {
        if width == 0 {
            return LaidOutDocument::default();
        }

        let mut out = LaidOutDocument::default();
        let mut prev: Option<&Block> = None;
        for (index, block) in self.blocks.iter().enumerate() {
            // Blank row between blocks, except inside a run of list items.
            if !out.lines.is_empty() && !(is_list_item(prev) && is_list_item(Some(block))) {
                out.lines.push(LayoutLine {
                    spans: Vec::new(),
                    plain: String::new(),
                });
            }
            prev = Some(block);
            match block {
                Block::Prose(p) => layout_prose(p, width, theme, &mut out),
                Block::Code(c) => layout_code(c, index, theme, highlighter, &mut out),
                Block::Table(t) => layout_table(t, theme, &mut out),
                Block::Rule => {
                    let bar = "─".repeat(width as usize);
                    out.lines.push(LayoutLine {
                        spans: vec![Span::styled(bar.clone(), theme.muted)],
                        plain: bar,
                    });
                }
            }
        }

        out.content_width = out
            .lines
            .iter()
            .map(|l| UnicodeWidthStr::width(l.plain.as_str()) as u32)
            .max()
            .unwrap_or(0);
        out
    }
}

/* ---------------- parsing ---------------- */

#[derive(Default)]
struct ListLevel {
    next_ordinal: Option<u64>,
}

#[derive(Default)]
struct Builder {
    blocks: Vec<Block>,
    kind: Option<ProseKind>,
    lines: Vec<Vec<Segment>>,
    current: Vec<Segment>,
    flags: InlineFlags,
    link_depth: usize,
    quote_depth: usize,
    lists: Vec<ListLevel>,
    heading_text: String,
    first_prefix: String,
    rest_prefix: String,
    code: Option<CodeBlock>,
    code_text: String,
    table: Option<TableBlock>,
    cell: Option<String>,
    in_table_head: bool,
}

impl Builder {
    fn open_prose(&mut self, kind: ProseKind) {
        self.flush_prose();
        self.kind = Some(kind);
        self.heading_text.clear();
        let quote = QUOTE_PREFIX.repeat(self.quote_depth);
        match kind {
            ProseKind::ListItem => {
                let depth = self.lists.len().saturating_sub(1);
                let indent = "  ".repeat(depth);
                let marker = match self.lists.last_mut().and_then(|l| l.next_ordinal.as_mut()) {
                    Some(n) => {
                        let m = format!("{n}. ");
                        *n += 1;
                        m
                    }
                    None => "- ".to_string(),
                };
                self.rest_prefix = format!("{quote}{indent}{}", " ".repeat(marker.len()));
                self.first_prefix = format!("{quote}{indent}{marker}");
            }
            _ => {
                self.first_prefix = quote.clone();
                self.rest_prefix = quote;
            }
        }
    }

    fn ensure_prose(&mut self) {
        if self.kind.is_none() {
            self.open_prose(ProseKind::Paragraph);
        }
    }

    fn push_segment(&mut self, text: &str, inline_code: bool) {
        if let Some(cell) = self.cell.as_mut() {
            cell.push_str(text);
            return;
        }
        if matches!(self.kind, Some(ProseKind::Heading(_))) {
            self.heading_text.push_str(text);
        }
        self.ensure_prose();
        self.current.push(Segment {
            text: text.to_string(),
            flags: self.flags,
            inline_code,
            link: self.link_depth > 0,
        });
    }

    fn break_line(&mut self) {
        if self.cell.is_some() {
            self.push_segment(" ", false);
            return;
        }
        if matches!(self.kind, Some(ProseKind::Heading(_))) {
            self.heading_text.push(' ');
        }
        self.ensure_prose();
        self.lines.push(std::mem::take(&mut self.current));
    }

    fn flush_prose(&mut self) {
        let Some(kind) = self.kind.take() else {
            self.current.clear();
            self.lines.clear();
            return;
        };
        if !self.current.is_empty() {
            self.lines.push(std::mem::take(&mut self.current));
        }
        let lines = std::mem::take(&mut self.lines);
        if lines.is_empty() {
            return;
        }
        self.blocks.push(Block::Prose(ProseBlock {
            kind,
            lines,
            heading_text: std::mem::take(&mut self.heading_text),
            first_prefix: std::mem::take(&mut self.first_prefix),
            rest_prefix: std::mem::take(&mut self.rest_prefix),
            quote_depth: self.quote_depth,
        }));
    }

    fn flush_code(&mut self) {
        let Some(mut code) = self.code.take() else {
            return;
        };
        let text = std::mem::take(&mut self.code_text);
        code.lines = text
            .strip_suffix('\n')
            .unwrap_or(&text)
            .split('\n')
            .map(str::to_string)
            .collect();
        self.blocks.push(Block::Code(code));
    }
}

fn parse_blocks(input: &str) -> Vec<Block> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    let parser = Parser::new_ext(input, options);

    let mut b = Builder::default();

    for ev in parser {
        match ev {
            Event::Start(tag) => match tag {
                Tag::Paragraph => {
                    // Inside a list item the paragraph continues the item
                    // block; elsewhere it opens a fresh one.
                    if matches!(b.kind, Some(ProseKind::ListItem)) {
                        if !b.current.is_empty() {
                            b.break_line();
                        }
                    } else {
                        b.open_prose(ProseKind::Paragraph);
                    }
                }
                Tag::Heading { level, .. } => {
                    b.open_prose(ProseKind::Heading(heading_level(level)));
                }
                Tag::BlockQuote(_) => {
                    b.flush_prose();
                    b.quote_depth += 1;
                }
                Tag::List(start) => {
                    b.flush_prose();
                    b.lists.push(ListLevel {
                        next_ordinal: start,
                    });
                }
                Tag::Item => b.open_prose(ProseKind::ListItem),
                Tag::Emphasis => b.flags.emphasis = true,
                Tag::Strong => b.flags.strong = true,
                Tag::Strikethrough => b.flags.strike = true,
                Tag::Link { .. } | Tag::Image { .. } => b.link_depth += 1,
                Tag::CodeBlock(kind) => {
                    b.flush_prose();
                    let language = match kind {
                        CodeBlockKind::Fenced(info) => {
                            let token = info.split_whitespace().next().unwrap_or("");
                            (!token.is_empty()).then(|| token.to_string())
                        }
                        CodeBlockKind::Indented => None,
                    };
                    b.code = Some(CodeBlock {
                        language,
                        lines: Vec::new(),
                        quote_depth: b.quote_depth,
                    });
                }
                Tag::Table(aligns) => {
                    b.flush_prose();
                    b.table = Some(TableBlock {
                        aligns,
                        head: Vec::new(),
                        rows: Vec::new(),
                    });
                }
                Tag::TableHead => b.in_table_head = true,
                Tag::TableRow => {
                    if let Some(t) = b.table.as_mut() {
                        t.rows.push(Vec::new());
                    }
                }
                Tag::TableCell => b.cell = Some(String::new()),
                _ => {}
            },
            Event::End(tag) => match tag {
                TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item => b.flush_prose(),
                TagEnd::BlockQuote(_) => {
                    b.flush_prose();
                    b.quote_depth = b.quote_depth.saturating_sub(1);
                }
                TagEnd::List(_) => {
                    b.flush_prose();
                    b.lists.pop();
                }
                TagEnd::Emphasis => b.flags.emphasis = false,
                TagEnd::Strong => b.flags.strong = false,
                TagEnd::Strikethrough => b.flags.strike = false,
                TagEnd::Link | TagEnd::Image => b.link_depth = b.link_depth.saturating_sub(1),
                TagEnd::CodeBlock => b.flush_code(),
                TagEnd::TableCell => {
                    let cell = b.cell.take().unwrap_or_default();
                    if let Some(t) = b.table.as_mut() {
                        if b.in_table_head {
                            t.head.push(cell);
                        } else if let Some(row) = t.rows.last_mut() {
                            row.push(cell);
                        }
                    }
                }
                TagEnd::TableHead => b.in_table_head = false,
                TagEnd::Table => {
                    if let Some(t) = b.table.take() {
                        b.blocks.push(Block::Table(t));
                    }
                }
                _ => {}
            },
            Event::Text(t) => {
                if b.code.is_some() {
                    b.code_text.push_str(&t);
                } else {
                    b.push_segment(&t, false);
                }
            }
            Event::Code(t) => b.push_segment(&t, true),
            // Line-break-as-break: soft breaks end the line too.
            Event::SoftBreak | Event::HardBreak => b.break_line(),
            Event::Rule => {
                b.flush_prose();
                b.blocks.push(Block::Rule);
            }
            Event::TaskListMarker(checked) => {
                b.push_segment(if checked { "[x] " } else { "[ ] " }, false);
            }
            // HTML passes through unstyled markdown; anchors strip tags anyway.
            Event::Html(_) | Event::InlineHtml(_) => {}
            _ => {}
        }
    }

    b.flush_prose();
    b.flush_code();
    b.blocks
}

fn is_list_item(block: Option<&Block>) -> bool {
    matches!(block, Some(Block::Prose(p)) if p.kind == ProseKind::ListItem)
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/* ---------------- layout ---------------- */

fn layout_prose(p: &ProseBlock, width: u16, theme: &Theme, out: &mut LaidOutDocument) {
    if let ProseKind::Heading(level) = p.kind {
        if (1..=3).contains(&level) {
            out.anchors.push(HeadingAnchor {
                id: slugify(&p.heading_text),
                level,
                text: p.heading_text.trim().to_string(),
                line: out.lines.len(),
            });
        }
    }

    let base = match p.kind {
        ProseKind::Heading(level) => theme.heading(level),
        _ if p.quote_depth > 0 => theme.muted,
        _ => theme.text,
    };
    let prefix_style = if p.quote_depth > 0 {
        theme.muted
    } else {
        theme.text
    };

    let mut first = true;
    for logical in &p.lines {
        let prefix = if first { &p.first_prefix } else { &p.rest_prefix };
        let avail = (width as usize).saturating_sub(prefix.len()).max(1);
        for chunk in wrap_segments(logical, avail) {
            let prefix = if first { &p.first_prefix } else { &p.rest_prefix };
            let mut spans = Vec::with_capacity(chunk.len() + 1);
            let mut plain = String::new();
            if !prefix.is_empty() {
                spans.push(Span::styled(prefix.clone(), prefix_style));
                plain.push_str(prefix);
            }
            for seg in chunk {
                let style = segment_style(&seg, base, theme);
                plain.push_str(&seg.text);
                spans.push(Span::styled(seg.text, style));
            }
            out.lines.push(LayoutLine { spans, plain });
            first = false;
        }
    }
}

fn segment_style(seg: &Segment, base: Style, theme: &Theme) -> Style {
    let mut style = if seg.inline_code {
        theme.code_inline
    } else if seg.link {
        theme.link
    } else {
        base
    };
    if seg.flags.strong {
        style = style.add_modifier(Modifier::BOLD);
    }
    if seg.flags.emphasis {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if seg.flags.strike {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    style
}

/// Greedy word wrap over a run of styled segments.
fn wrap_segments(segs: &[Segment], max_cols: usize) -> Vec<Vec<Segment>> {
    let mut lines: Vec<Vec<Segment>> = Vec::new();
    let mut line: Vec<Segment> = Vec::new();
    let mut cols = 0usize;

    let mut flush = |line: &mut Vec<Segment>, cols: &mut usize, lines: &mut Vec<Vec<Segment>>| {
        trim_line_end(line);
        lines.push(std::mem::take(line));
        *cols = 0;
    };

    for seg in segs {
        for token in tokenize(&seg.text) {
            let w = UnicodeWidthStr::width(token);
            let is_space = token.chars().all(char::is_whitespace);
            if cols + w > max_cols && cols > 0 {
                if is_space {
                    // Spaces at a wrap point vanish.
                    flush(&mut line, &mut cols, &mut lines);
                    continue;
                }
                flush(&mut line, &mut cols, &mut lines);
            }
            if is_space && cols == 0 && !lines.is_empty() {
                continue;
            }
            if w > max_cols {
                // A single token wider than the line gets hard-broken.
                for piece in hard_break(token, max_cols) {
                    if cols > 0 {
                        flush(&mut line, &mut cols, &mut lines);
                    }
                    let piece_w = UnicodeWidthStr::width(piece.as_str());
                    push_piece(&mut line, seg, piece);
                    cols = piece_w;
                }
                continue;
            }
            push_piece(&mut line, seg, token.to_string());
            cols += w;
        }
    }
    if !line.is_empty() || lines.is_empty() {
        trim_line_end(&mut line);
        lines.push(line);
    }
    lines
}

fn trim_line_end(line: &mut Vec<Segment>) {
    while let Some(last) = line.last_mut() {
        let trimmed = last.text.trim_end().len();
        if trimmed == last.text.len() && trimmed != 0 {
            break;
        }
        if trimmed == 0 {
            line.pop();
        } else {
            last.text.truncate(trimmed);
            break;
        }
    }
}

fn push_piece(line: &mut Vec<Segment>, proto: &Segment, text: String) {
    if let Some(last) = line.last_mut() {
        if last.flags == proto.flags
            && last.inline_code == proto.inline_code
            && last.link == proto.link
        {
            last.text.push_str(&text);
            return;
        }
    }
    line.push(Segment {
        text,
        flags: proto.flags,
        inline_code: proto.inline_code,
        link: proto.link,
    });
}

/// Splits into alternating whitespace / non-whitespace runs.
fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let first_ws = rest.chars().next().is_some_and(char::is_whitespace);
        let end = rest
            .char_indices()
            .find(|(_, c)| c.is_whitespace() != first_ws)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let (token, tail) = rest.split_at(end);
        rest = tail;
        Some(token)
    })
}

fn hard_break(token: &str, max_cols: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut cols = 0usize;
    for ch in token.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if cols + w > max_cols && !piece.is_empty() {
            pieces.push(std::mem::take(&mut piece));
            cols = 0;
        }
        piece.push(ch);
        cols += w;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

fn layout_code(
    c: &CodeBlock,
    index: usize,
    theme: &Theme,
    highlighter: Option<&dyn CodeHighlighter>,
    out: &mut LaidOutDocument,
) {
    let quote = QUOTE_PREFIX.repeat(c.quote_depth);
    let indent = if c.quote_depth > 0 {
        " ".repeat(2)
    } else {
        " ".repeat(CODE_INDENT)
    };
    let prefix = format!("{quote}{indent}");
    let start_line = out.lines.len();

    let refs: Vec<&str> = c.lines.iter().map(String::as_str).collect();
    let highlighted = highlighter.map(|h| h.highlight_lines(c.language.as_deref(), &refs));

    for (i, raw) in c.lines.iter().enumerate() {
        let mut spans = vec![Span::styled(prefix.clone(), theme.muted)];
        match highlighted.as_ref().and_then(|h| h.get(i)) {
            Some(colored) => spans.extend(colored.iter().cloned()),
            None => spans.push(Span::styled(raw.clone(), theme.code_inline)),
        }
        out.lines.push(LayoutLine {
            spans,
            plain: format!("{prefix}{raw}"),
        });
    }

    out.code_regions.push(CodeRegion {
        index,
        start_line,
        line_count: c.lines.len(),
        language: c.language.clone(),
        text: c.lines.join("\n"),
    });
}

fn layout_table(t: &TableBlock, theme: &Theme, out: &mut LaidOutDocument) {
    let columns = t.aligns.len().max(t.head.len());
    if columns == 0 {
        return;
    }
    let mut widths = vec![0usize; columns];
    for (i, cell) in t.head.iter().enumerate() {
        widths[i] = widths[i].max(UnicodeWidthStr::width(cell.as_str()));
    }
    for row in &t.rows {
        for (i, cell) in row.iter().enumerate().take(columns) {
            widths[i] = widths[i].max(UnicodeWidthStr::width(cell.as_str()));
        }
    }

    let render_row = |cells: &[String], style: Style, out: &mut LaidOutDocument| {
        let mut plain = String::new();
        for i in 0..columns {
            if i > 0 {
                plain.push_str("  ");
            }
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            let align = t.aligns.get(i).copied().unwrap_or(Alignment::None);
            plain.push_str(&pad_cell(cell, widths[i], align));
        }
        out.lines.push(LayoutLine {
            spans: vec![Span::styled(plain.clone(), style)],
            plain,
        });
    };

    if !t.head.is_empty() {
        render_row(&t.head, theme.text.add_modifier(Modifier::BOLD), out);
        let sep = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("  ");
        out.lines.push(LayoutLine {
            spans: vec![Span::styled(sep.clone(), theme.muted)],
            plain: sep,
        });
    }
    for row in &t.rows {
        render_row(row, theme.text, out);
    }
}

fn pad_cell(cell: &str, width: usize, align: Alignment) -> String {
    let w = UnicodeWidthStr::width(cell);
    let pad = width.saturating_sub(w);
    match align {
        Alignment::Right => format!("{}{}", " ".repeat(pad), cell),
        Alignment::Center => {
            let left = pad / 2;
            format!("{}{}{}", " ".repeat(left), cell, " ".repeat(pad - left))
        }
        _ => format!("{}{}", cell, " ".repeat(pad)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_lines(doc: &MarkdownDocument, width: u16) -> Vec<String> {
        doc.layout(width, &Theme::dark(), None)
            .lines
            .iter()
            .map(|l| l.plain.clone())
            .collect()
    }

    #[test]
    fn headings_one_through_three_get_anchors_in_order() {
        let doc = MarkdownDocument::parse("# One\n\ntext\n\n## Two\n\n#### Deep\n\n### Three\n");
        let laid = doc.layout(80, &Theme::dark(), None);
        let ids: Vec<&str> = laid.anchors.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["one", "two", "three"]);
        assert_eq!(
            laid.anchors.iter().map(|a| a.level).collect::<Vec<_>>(),
            [1, 2, 3]
        );
        // Anchor rows are strictly increasing document positions.
        assert!(laid.anchors.windows(2).all(|w| w[0].line < w[1].line));
    }

    #[test]
    fn soft_breaks_become_hard_lines() {
        let doc = MarkdownDocument::parse("first\nsecond\n");
        let lines = plain_lines(&doc, 80);
        assert_eq!(lines, ["first", "second"]);
    }

    #[test]
    fn paragraphs_word_wrap_to_width() {
        let doc = MarkdownDocument::parse("alpha beta gamma delta\n");
        let lines = plain_lines(&doc, 12);
        assert_eq!(lines, ["alpha beta", "gamma delta"]);
    }

    #[test]
    fn fenced_code_registers_one_region_with_raw_text() {
        let doc = MarkdownDocument::parse("```rust\nfn main() {}\nlet x = 1;\n```\n");
        let laid = doc.layout(80, &Theme::dark(), None);
        assert_eq!(laid.code_regions.len(), 1);
        let region = &laid.code_regions[0];
        assert_eq!(region.language.as_deref(), Some("rust"));
        assert_eq!(region.text, "fn main() {}\nlet x = 1;");
        assert_eq!(region.line_count, 2);
        assert!(laid.lines[region.start_line].plain.contains("fn main()"));
    }

    #[test]
    fn relayout_rebuilds_regions_without_duplicates() {
        let doc = MarkdownDocument::parse("```\nx\n```\n");
        let theme = Theme::dark();
        let a = doc.layout(80, &theme, None);
        let b = doc.layout(80, &theme, None);
        assert_eq!(a.code_regions.len(), 1);
        assert_eq!(b.code_regions.len(), 1);
        assert_eq!(a.code_regions[0].index, b.code_regions[0].index);
    }

    #[test]
    fn ordered_lists_count_and_indent() {
        let doc = MarkdownDocument::parse("1. first\n2. second\n   - nested\n");
        let lines = plain_lines(&doc, 80);
        let joined = lines.join("\n");
        assert!(joined.contains("1. first"));
        assert!(joined.contains("2. second"));
        assert!(joined.contains("  - nested"));
    }

    #[test]
    fn tight_lists_have_no_blank_rows_between_items() {
        let doc = MarkdownDocument::parse("intro\n\n- one\n- two\n- three\n");
        let lines = plain_lines(&doc, 80);
        assert_eq!(lines, ["intro", "", "- one", "- two", "- three"]);
    }

    #[test]
    fn task_list_markers_render() {
        let doc = MarkdownDocument::parse("- [x] done\n- [ ] open\n");
        let joined = plain_lines(&doc, 80).join("\n");
        assert!(joined.contains("[x] done"));
        assert!(joined.contains("[ ] open"));
    }

    #[test]
    fn blockquotes_carry_a_prefix() {
        let doc = MarkdownDocument::parse("> quoted text\n");
        let lines = plain_lines(&doc, 80);
        assert_eq!(lines[0], "| quoted text");
    }

    #[test]
    fn tables_align_columns() {
        let doc = MarkdownDocument::parse("| a | long |\n|---|-----:|\n| xx | 1 |\n");
        let lines = plain_lines(&doc, 80);
        assert_eq!(lines[0], "a   long");
        assert!(lines[1].starts_with("──"));
        assert_eq!(lines[2], "xx     1");
    }

    #[test]
    fn empty_source_lays_out_to_nothing() {
        let doc = MarkdownDocument::parse("");
        let laid = doc.layout(80, &Theme::dark(), None);
        assert!(laid.lines.is_empty());
        assert!(laid.anchors.is_empty());
    }

    #[test]
    fn heading_anchor_includes_inline_code_text() {
        let doc = MarkdownDocument::parse("## Using `cargo build`\n");
        let laid = doc.layout(80, &Theme::dark(), None);
        assert_eq!(laid.anchors[0].id, "using-cargo-build");
    }
}

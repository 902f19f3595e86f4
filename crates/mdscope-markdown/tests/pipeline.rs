//! End-to-end checks over the render → outline → tracker pipeline.

use mdscope_core::text::CodeHighlighter;
use mdscope_core::theme::Theme;
use mdscope_core::viewport::ViewportState;
use mdscope_markdown::document::MarkdownDocument;
use mdscope_markdown::outline::OutlinePanel;
use mdscope_markdown::outline::extract_outline;
use mdscope_markdown::preview::PreviewOptions;
use mdscope_markdown::preview::PreviewView;
use mdscope_markdown::tracker::ActiveSectionTracker;
use mdscope_markdown::tracker::BandOptions;

const DOC: &str = "\
# Intro

Some opening prose that talks about the document.

## Getting Started

More prose here, long enough to occupy a couple of rows once wrapped.

### Details

- a list item
- another list item

## Hello   World!!

Closing section.

#### Too Deep

This heading stays out of the outline.
";

fn viewport(y: u32, h: u16) -> ViewportState {
    let mut v = ViewportState::default();
    v.set_viewport(60, h);
    v.set_content(60, 500);
    v.y = y;
    v
}

#[test]
fn outline_order_matches_document_order_levels_one_to_three() {
    let doc = MarkdownDocument::parse(DOC);
    let laid = doc.layout(60, &Theme::dark(), None);
    let outline = extract_outline(&laid.anchors);

    let ids: Vec<&str> = outline.iter().map(|e| e.anchor.id.as_str()).collect();
    assert_eq!(ids, ["intro", "getting-started", "details", "hello-world"]);
    assert!(outline.iter().all(|e| e.anchor.level <= 3));
    assert!(outline.windows(2).all(|w| w[0].anchor.line < w[1].anchor.line));
}

#[test]
fn anchor_ids_use_only_the_slug_alphabet() {
    let doc = MarkdownDocument::parse(DOC);
    let laid = doc.layout(60, &Theme::dark(), None);
    for anchor in &laid.anchors {
        assert!(
            anchor
                .id
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
            "bad id: {}",
            anchor.id
        );
    }
}

#[test]
fn sequential_band_entries_keep_a_single_active_entry() {
    let doc = MarkdownDocument::parse(DOC);
    let laid = doc.layout(60, &Theme::dark(), None);

    let mut panel = OutlinePanel::default();
    panel.set_entries(extract_outline(&laid.anchors));

    let rows: Vec<usize> = panel.entries().iter().map(|e| e.anchor.line).collect();
    let mut tracker = ActiveSectionTracker::subscribe(rows.clone(), BandOptions::default());

    // Walk the viewport down the document; every transition must leave
    // exactly one active entry.
    let mut seen = vec![false; rows.len()];
    for y in 0..rows[rows.len() - 1] as u32 + 5 {
        if let Some(idx) = tracker.observe(&viewport(y, 20)) {
            panel.activate(idx);
            seen[idx] = true;
        }
        let active = panel.entries().iter().filter(|e| e.active).count();
        assert!(active <= 1, "multiple active entries at y={y}");
    }
    // Every section except a heading on the very first rows (which never
    // reaches the offset band, as in the browser original) activates.
    assert!(seen.iter().skip(1).all(|s| *s), "later sections should all activate");
    assert_eq!(panel.active_index(), Some(rows.len() - 1));
}

#[test]
fn code_blocks_pick_up_highlighting_when_a_backend_is_set() {
    let doc = MarkdownDocument::parse("```rust\nfn main() {}\n```\n");
    let theme = Theme::dark();
    let highlighter = mdscope_syntax::SyntectHighlighter::default();

    let plain = doc.layout(60, &theme, None);
    let colored = doc.layout(60, &theme, Some(&highlighter as &dyn CodeHighlighter));

    assert_eq!(plain.lines.len(), colored.lines.len());
    let row = colored.code_regions[0].start_line;
    // Highlighting splits the code line into more spans than the plain path.
    assert!(colored.lines[row].spans.len() > plain.lines[row].spans.len());
    assert_eq!(colored.lines[row].plain, plain.lines[row].plain);
}

#[test]
fn rerender_resubscribes_cleanly_after_disposal() {
    let theme = Theme::dark();
    let mut view = PreviewView::with_options(PreviewOptions {
        show_scrollbar: false,
        padding_left: 0,
        padding_right: 0,
        ..PreviewOptions::default()
    });
    view.set_markdown(DOC);
    view.ensure_layout(60, &theme);

    let rows: Vec<usize> = view.anchors().iter().map(|a| a.line).collect();
    let mut old = ActiveSectionTracker::subscribe(rows, BandOptions::default());
    let epoch = view.layout_epoch();

    // Live edit replaces the document; the old subscription is disposed
    // before the replacement tracker is built.
    view.set_markdown("# Only One\n\nbody\n");
    view.ensure_layout(60, &theme);
    assert_eq!(view.layout_epoch(), epoch + 1);

    old.dispose();
    assert_eq!(old.observe(&viewport(0, 20)), None);

    let rows: Vec<usize> = view.anchors().iter().map(|a| a.line).collect();
    assert_eq!(rows.len(), 1);
    let mut fresh = ActiveSectionTracker::subscribe(rows, BandOptions::default());
    assert_eq!(fresh.observe(&viewport(0, 20)), None);
    // "Only One" sits at row 0, above the band until we are at the top with
    // the band reaching it; with the default offsets row 0 is never inside,
    // matching "reading position" semantics for a heading at the very top.
}

//! Heading anchors: stable, fragment-addressable identifiers derived from
//! heading text.
//!
//! Anchors are regenerated wholesale on every render; no identity is carried
//! across renders. Duplicate ids within one render are allowed to coexist;
//! lookups take the last match, which is what wholesale regeneration makes
//! harmless.

/// A navigable heading in the laid-out document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeadingAnchor {
    /// Slug of the heading text; `[a-z0-9-]`, deterministic.
    pub id: String,
    /// Heading level, 1..=3.
    pub level: u8,
    /// Plain display text of the heading.
    pub text: String,
    /// Row of the heading in the laid-out content (the scroll target).
    pub line: usize,
}

/// Derives an anchor id from heading text.
///
/// Lowercase, HTML-like tags stripped, everything outside word characters /
/// whitespace / hyphens dropped, then whitespace and underscore runs become a
/// single hyphen and repeated hyphens collapse.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = strip_tags(&lowered);

    let mut kept = String::with_capacity(stripped.len());
    for ch in stripped.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' || ch.is_whitespace() {
            kept.push(ch);
        }
    }

    let mut out = String::with_capacity(kept.len());
    let mut pending_hyphen = false;
    for ch in kept.trim().chars() {
        if ch.is_whitespace() || ch == '_' || ch == '-' {
            pending_hyphen = true;
            continue;
        }
        if pending_hyphen && !out.is_empty() {
            out.push('-');
        }
        pending_hyphen = false;
        out.push(ch);
    }
    out
}

fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut depth = 0usize;
    for ch in s.chars() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_spaces_and_drops_punctuation() {
        assert_eq!(slugify("Hello   World!!"), "hello-world");
    }

    #[test]
    fn is_deterministic_and_idempotent() {
        let first = slugify("Some *Heading* Title");
        assert_eq!(slugify("Some *Heading* Title"), first);
        assert_eq!(slugify(&first), first);
    }

    #[test]
    fn strips_html_like_tags() {
        assert_eq!(slugify("Intro <em>note</em>"), "intro-note");
    }

    #[test]
    fn output_alphabet_is_bounded() {
        let slug = slugify("Ünïcode — punctuation: §§ and_more");
        assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
    }

    #[test]
    fn underscore_runs_become_single_hyphens() {
        assert_eq!(slugify("a__b  c"), "a-b-c");
    }

    #[test]
    fn empty_and_symbol_only_headings_slug_to_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!! ???"), "");
    }
}

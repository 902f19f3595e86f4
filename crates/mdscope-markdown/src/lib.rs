//! `mdscope-markdown` is the document rendering and navigation core of
//! mdscope.
//!
//! The pipeline: raw text is parsed once into a [`document::MarkdownDocument`]
//! (via `pulldown-cmark`), laid out per terminal width into styled lines with
//! a [`anchor::HeadingAnchor`] per level 1–3 heading, the anchor set feeds
//! [`outline::extract_outline`], and a [`tracker::ActiveSectionTracker`]
//! keeps exactly one outline entry highlighted as the viewport moves.
//!
//! Everything is rebuilt wholesale on re-render; nothing here carries state
//! across renders except the scroll position.

pub mod anchor;
pub mod document;
pub mod outline;
pub mod preview;
pub mod tracker;

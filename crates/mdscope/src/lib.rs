//! mdscope: a terminal markdown viewer/editor.
//!
//! One document at a time: open it, read it with an outline that follows
//! your scroll position, edit it with a live re-rendering preview, save it
//! back out. State that survives restarts (recent documents, theme
//! preference) is persisted best-effort through a JSON state file.

pub mod app;
pub mod clipboard;
pub mod commands;
pub mod docfile;
pub mod guide;
pub mod logging;
pub mod notice;
pub mod prompt;
pub mod recent;
pub mod session;
pub mod storage;
pub mod ui;

//! Clipboard integration via OSC 52.
//!
//! The terminal owns the real clipboard; we hand it base64-encoded text
//! through an escape sequence, wrapped for tmux passthrough when `$TMUX` is
//! set. Terminals cap OSC 52 payloads, so oversized copies fail loudly
//! instead of silently truncating.

use std::io;
use std::io::Write;

// Conservative; many terminals reject larger payloads.
pub const MAX_COPY_BYTES: usize = 100 * 1024;

const OSC_PREFIX: &str = "\x1b]52;c;";
const OSC_SUFFIX: &str = "\x07";
const TMUX_PREFIX: &str = "\x1bPtmux;\x1b\x1b]52;c;";
const TMUX_SUFFIX: &str = "\x07\x1b\\";

pub trait Clipboard {
    fn copy(&mut self, text: &str) -> Result<(), String>;
}

pub struct Osc52Clipboard {
    tmux: bool,
}

impl Osc52Clipboard {
    pub fn detect() -> Self {
        Self {
            tmux: std::env::var_os("TMUX").is_some(),
        }
    }
}

impl Clipboard for Osc52Clipboard {
    fn copy(&mut self, text: &str) -> Result<(), String> {
        let seq = encode_sequence(text, self.tmux)?;
        let mut out = io::stdout();
        out.write_all(seq.as_bytes())
            .and_then(|_| out.flush())
            .map_err(|e| e.to_string())
    }
}

/// Collects copies instead of emitting them; used in tests.
#[derive(Default)]
pub struct MemoryClipboard {
    pub copied: Vec<String>,
}

impl Clipboard for MemoryClipboard {
    fn copy(&mut self, text: &str) -> Result<(), String> {
        self.copied.push(text.to_string());
        Ok(())
    }
}

fn encode_sequence(text: &str, tmux: bool) -> Result<String, String> {
    let bytes = text.as_bytes();
    if bytes.len() > MAX_COPY_BYTES {
        return Err(format!(
            "text too large to copy ({} KB, limit {} KB)",
            bytes.len() / 1024,
            MAX_COPY_BYTES / 1024
        ));
    }
    let b64 = base64(bytes);
    Ok(if tmux {
        format!("{TMUX_PREFIX}{b64}{TMUX_SUFFIX}")
    } else {
        format!("{OSC_PREFIX}{b64}{OSC_SUFFIX}")
    })
}

fn base64(bytes: &[u8]) -> String {
    const TABLE: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

    let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);
    for chunk in bytes.chunks(3) {
        let n = (chunk[0] as u32) << 16
            | (chunk.get(1).copied().unwrap_or(0) as u32) << 8
            | chunk.get(2).copied().unwrap_or(0) as u32;
        out.push(TABLE[(n >> 18 & 0x3f) as usize] as char);
        out.push(TABLE[(n >> 12 & 0x3f) as usize] as char);
        out.push(if chunk.len() > 1 {
            TABLE[(n >> 6 & 0x3f) as usize] as char
        } else {
            '='
        });
        out.push(if chunk.len() > 2 {
            TABLE[(n & 0x3f) as usize] as char
        } else {
            '='
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequences_match_known_vectors() {
        assert_eq!(encode_sequence("", false).unwrap(), "\x1b]52;c;\x07");
        assert_eq!(encode_sequence("hello", false).unwrap(), "\x1b]52;c;aGVsbG8=\x07");
        assert_eq!(
            encode_sequence("hi", true).unwrap(),
            "\x1bPtmux;\x1b\x1b]52;c;aGk=\x07\x1b\\"
        );
    }

    #[test]
    fn oversized_payloads_are_rejected() {
        let big = "x".repeat(MAX_COPY_BYTES + 1);
        assert!(encode_sequence(&big, false).is_err());
    }
}

//! Document file acquisition and the two-tier save path.
//!
//! Tier one is the interactive save: the user names a destination and we
//! write it; cancelling the prompt never reaches this module. Tier two is
//! the fallback: write into a well-known directory, which stands in for the
//! browser-style "just download it" path.

use anyhow::Context;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["md", "markdown", "txt"];

/// Returns the document name (file stem) when the file name carries a
/// supported extension, `None` otherwise.
pub fn document_stem(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }
    Some(path.file_stem()?.to_string_lossy().to_string())
}

pub fn read_document(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

pub fn write_document(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, content)
}

/// Where tier-two saves land: the download directory when the platform has
/// one, else the home directory, else the working directory.
pub fn fallback_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn fallback_write(name: &str, content: &str) -> io::Result<PathBuf> {
    let path = fallback_dir().join(format!("{name}.md"));
    write_document(&path, content)?;
    Ok(path)
}

/// Normalizes a user-entered save target: bare names get `.md` appended,
/// anything with a supported extension is kept as typed.
pub fn normalize_save_target(input: &str) -> PathBuf {
    let path = PathBuf::from(input.trim());
    match document_stem(&path) {
        Some(_) => path,
        None => {
            let mut s = path.into_os_string();
            s.push(".md");
            PathBuf::from(s)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stems_accept_supported_extensions_case_insensitively() {
        assert_eq!(document_stem(Path::new("notes.md")).as_deref(), Some("notes"));
        assert_eq!(document_stem(Path::new("A.MARKDOWN")).as_deref(), Some("A"));
        assert_eq!(document_stem(Path::new("dir/readme.TXT")).as_deref(), Some("readme"));
    }

    #[test]
    fn wrong_or_missing_extensions_are_rejected() {
        assert_eq!(document_stem(Path::new("image.png")), None);
        assert_eq!(document_stem(Path::new("archive.tar.gz")), None);
        assert_eq!(document_stem(Path::new("noext")), None);
    }

    #[test]
    fn save_targets_get_md_appended_when_bare() {
        assert_eq!(normalize_save_target("notes"), PathBuf::from("notes.md"));
        assert_eq!(normalize_save_target("notes.md"), PathBuf::from("notes.md"));
        assert_eq!(normalize_save_target(" notes.txt "), PathBuf::from("notes.txt"));
        assert_eq!(normalize_save_target("weird.png"), PathBuf::from("weird.png.md"));
    }

    #[test]
    fn write_and_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("doc.md");
        write_document(&path, "# content").unwrap();
        assert_eq!(read_document(&path).unwrap(), "# content");
    }

    #[test]
    fn reading_a_missing_file_reports_the_path() {
        let err = read_document(Path::new("/no/such/file.md")).unwrap_err();
        assert!(format!("{err:#}").contains("file.md"));
    }
}

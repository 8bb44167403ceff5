use crate::paths::dotted_extension;
use log;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Bytes inspected when the extension does not decide.
pub const SNIFF_LEN: usize = 8192;

/// Share of control bytes above which a prefix counts as binary.
pub const CONTROL_RATIO_LIMIT: f64 = 0.3;

static BINARY_EXTENSIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        ".exe", ".dll", ".so", ".dylib", ".bin", ".dat", // executables, blobs
        ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".ico", // images
        ".mp3", ".mp4", ".wav", ".avi", ".mov", ".flv", // media
        ".zip", ".tar", ".gz", ".bz2", ".7z", ".rar", // archives
        ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", // documents
        ".pyc", ".pyo", ".class", ".o", ".obj", // compiled objects
    ]
    .into_iter()
    .collect()
});

static TEXT_EXTENSIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        ".js", ".ts", ".jsx", ".tsx", ".json", ".html", ".htm", ".xml", ".css", ".scss",
        ".sass", ".less", ".md", ".txt", ".csv", ".py", ".rb", ".java", ".c", ".cpp", ".h",
        ".hpp", ".go", ".rs", ".php", ".sh", ".bash", ".zsh", ".bat", ".cmd", ".ps1",
        ".yaml", ".yml", ".toml", ".ini", ".conf", ".cfg", ".sql", ".r", ".m", ".pl", ".pm",
        ".lua", ".swift", ".kt", ".dart", ".vue", ".svelte", ".astro", ".cs", ".vb", ".fs",
        ".lisp", ".clj", ".scm", ".scala", ".erl", ".ex", ".exs", ".dockerfile",
        ".gitignore", ".env", ".editorconfig", ".rst", ".adoc", ".textile", ".org",
    ]
    .into_iter()
    .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Text,
    Binary,
}

/// Extension verdict, if the extension is explicitly listed.
pub fn classify_by_extension(path: &Path) -> Option<ContentKind> {
    let ext = dotted_extension(path);
    if BINARY_EXTENSIONS.contains(ext.as_str()) {
        Some(ContentKind::Binary)
    } else if TEXT_EXTENSIONS.contains(ext.as_str()) {
        Some(ContentKind::Text)
    } else {
        None
    }
}

/// Verdict on a content prefix: NUL bytes or too many control characters
/// mean binary. Tab, LF and CR are not control characters here.
pub fn classify_prefix(prefix: &[u8]) -> ContentKind {
    if prefix.is_empty() {
        return ContentKind::Text;
    }
    if prefix.contains(&0) {
        return ContentKind::Binary;
    }
    let control = prefix
        .iter()
        .filter(|&&b| b < 0x20 && b != b'\t' && b != b'\n' && b != b'\r')
        .count();
    let ratio = control as f64 / prefix.len() as f64;
    if ratio > CONTROL_RATIO_LIMIT {
        ContentKind::Binary
    } else {
        ContentKind::Text
    }
}

/// Extension first, then the first [`SNIFF_LEN`] bytes. Files that cannot be
/// opened or read count as binary.
pub fn classify_file(path: &Path) -> ContentKind {
    if let Some(kind) = classify_by_extension(path) {
        log::trace!("Classified by extension as {:?}: {}", kind, path.display());
        return kind;
    }

    let mut prefix = Vec::with_capacity(SNIFF_LEN);
    let read = File::open(path)
        .and_then(|file| file.take(SNIFF_LEN as u64).read_to_end(&mut prefix));
    if let Err(e) = read {
        log::debug!("Treating unreadable file as binary: {} ({})", path.display(), e);
        return ContentKind::Binary;
    }

    let kind = classify_prefix(&prefix);
    log::trace!("Classified by content as {:?}: {}", kind, path.display());
    kind
}

pub fn is_binary_file(path: &Path) -> bool {
    classify_file(path) == ContentKind::Binary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn binary_extension_wins_over_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.PNG");
        fs::write(&path, "plain text really").unwrap();
        assert!(is_binary_file(&path));
    }

    #[test]
    fn text_extension_wins_over_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weird.txt");
        fs::write(&path, b"a\0b").unwrap();
        assert!(!is_binary_file(&path));
    }

    #[test]
    fn nul_byte_in_unknown_extension_is_binary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.unknown");
        let mut content = vec![b'a'; 4000];
        content.push(0);
        fs::write(&path, content).unwrap();
        assert!(is_binary_file(&path));
    }

    #[test]
    fn nul_byte_past_prefix_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("long.data1");
        let mut content = vec![b'a'; SNIFF_LEN];
        content.push(0);
        fs::write(&path, content).unwrap();
        assert!(!is_binary_file(&path));
    }

    #[test]
    fn empty_unknown_file_is_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("LICENSE");
        fs::write(&path, b"").unwrap();
        assert!(!is_binary_file(&path));
    }

    #[test]
    fn missing_file_is_binary() {
        let dir = tempfile::tempdir().unwrap();
        assert!(is_binary_file(&dir.path().join("gone.xyz")));
    }

    #[test]
    fn control_ratio_threshold() {
        // 3 of 10 is exactly at the limit and still text.
        let mut at_limit = vec![b'a'; 7];
        at_limit.extend([0x01, 0x02, 0x03]);
        assert_eq!(classify_prefix(&at_limit), ContentKind::Text);

        let mut over_limit = vec![b'a'; 6];
        over_limit.extend([0x01, 0x02, 0x03, 0x04]);
        assert_eq!(classify_prefix(&over_limit), ContentKind::Binary);
    }

    #[test]
    fn whitespace_controls_do_not_count() {
        assert_eq!(classify_prefix(b"\t\t\r\n\r\n\n\n"), ContentKind::Text);
    }

    #[test]
    fn dotfiles_use_their_name_as_extension() {
        assert_eq!(
            classify_by_extension(Path::new(".gitignore")),
            Some(ContentKind::Text)
        );
        assert_eq!(classify_by_extension(Path::new("Makefile")), None);
    }
}

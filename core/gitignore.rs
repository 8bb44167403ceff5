use crate::config::GITIGNORE_FILENAME;
use log;
use std::fs;
use std::io;
use std::path::Path;

/// Reads `<root>/.gitignore` as a flat list of exclusion patterns: one per
/// non-empty line that does not start with `#`, trimmed. Lines are decoded
/// one at a time, so invalid UTF-8 only affects the line it appears on. A
/// missing file yields no patterns.
pub fn load_gitignore_patterns(root: &Path) -> Vec<String> {
    let path = root.join(GITIGNORE_FILENAME);
    let content = match fs::read(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("No {} at {}", GITIGNORE_FILENAME, path.display());
            return Vec::new();
        }
        Err(e) => {
            log::warn!("Cannot read {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    let patterns = parse_gitignore(&content);
    log::info!("Loaded {} patterns from {}", patterns.len(), GITIGNORE_FILENAME);
    patterns
}

pub fn parse_gitignore(content: &[u8]) -> Vec<String> {
    content
        .split(|&b| b == b'\n')
        .map(String::from_utf8_lossy)
        .filter_map(|line| pattern_from_line(&line))
        .collect()
}

fn pattern_from_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        None
    } else {
        Some(line.to_string())
    }
}

use crate::error::Result;
use crate::paths::relative_slash_path;
use globset::{GlobBuilder, GlobMatcher};
use log;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A compiled include pattern.
///
/// `*` and `?` stay within one path component and `**` spans directories.
/// A pattern matches a file when it matches either the root-relative path
/// or the bare file name, so `*.py` finds Python files at any depth while
/// `src/*.py` is anchored to `src`.
#[derive(Debug, Clone)]
pub struct IncludePattern {
    matcher: GlobMatcher,
}

impl IncludePattern {
    pub fn new(raw: &str) -> Result<Self> {
        let normalized = raw.trim().trim_start_matches("./");
        let glob = GlobBuilder::new(normalized)
            .literal_separator(true)
            .build()?;
        Ok(Self {
            matcher: glob.compile_matcher(),
        })
    }

    pub fn matches_relative(&self, relative_path: &str) -> bool {
        self.matcher.is_match(relative_path)
    }

    pub fn matches_basename(&self, file_name: &str) -> bool {
        self.matcher.is_match(file_name)
    }

    pub fn matches(&self, relative_path: &str) -> bool {
        let file_name = relative_path.rsplit('/').next().unwrap_or(relative_path);
        self.matches_relative(relative_path) || self.matches_basename(file_name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PatternMatcher {
    patterns: Vec<IncludePattern>,
}

impl PatternMatcher {
    /// Compiles every pattern. Patterns that fail to compile are reported
    /// and then behave as if they matched nothing.
    pub fn new(patterns: &[String]) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|raw| match IncludePattern::new(raw) {
                Ok(pattern) => {
                    log::trace!("Adding include pattern: {}", raw);
                    Some(pattern)
                }
                Err(e) => {
                    log::warn!("Invalid glob pattern \"{}\" matches nothing: {}", raw, e);
                    None
                }
            })
            .collect();
        Self { patterns }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn matches(&self, relative_path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(relative_path))
    }

    /// Walks `root` once and returns every non-directory entry matched by
    /// any pattern, deduplicated and sorted by path bytes.
    pub fn discover(&self, root: &Path) -> Vec<PathBuf> {
        if self.is_empty() {
            return Vec::new();
        }

        log::info!("Walking directory: {}", root.display());
        let mut found = Vec::new();
        for entry_result in WalkDir::new(root).follow_links(false) {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    log::debug!("Error walking directory: {}", e);
                    continue;
                }
            };
            if entry.depth() == 0 || entry.file_type().is_dir() {
                continue;
            }
            let relative = relative_slash_path(entry.path(), root);
            if self.matches(&relative) {
                log::trace!("Matched: {}", relative);
                found.push(entry.into_path());
            } else {
                log::trace!("Not matched: {}", relative);
            }
        }

        sort_paths(&mut found);
        found.dedup();
        log::info!("Directory walk complete. Matched {} paths.", found.len());
        found
    }
}

/// Byte-wise lexicographic order on the whole path, independent of how the
/// filesystem enumerates entries.
pub fn sort_paths(paths: &mut [PathBuf]) {
    paths.sort_unstable_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
}

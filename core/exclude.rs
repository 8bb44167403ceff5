//! Coarse exclusion matching.
//!
//! A pattern excludes a path when it is a substring of the root-relative
//! path, when it glob-matches the file name, or when it (minus one trailing
//! slash) equals a whole path segment. This is not gitignore: there is no
//! negation or anchoring, and substring containment is intentionally broad,
//! so `dist` also excludes `src/distinct/file.go`.

use crate::paths::relative_slash_path;
use globset::{GlobBuilder, GlobMatcher};
use log;
use std::path::Path;

#[derive(Debug, Clone)]
struct ExclusionPattern {
    raw: String,
    segment: String,
    basename_glob: Option<GlobMatcher>,
}

impl ExclusionPattern {
    fn new(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let basename_glob = match GlobBuilder::new(raw).literal_separator(true).build() {
            Ok(glob) => Some(glob.compile_matcher()),
            Err(e) => {
                log::debug!("Exclusion pattern \"{}\" is not a valid glob: {}", raw, e);
                None
            }
        };
        Some(Self {
            raw: raw.to_string(),
            segment: raw.strip_suffix('/').unwrap_or(raw).to_string(),
            basename_glob,
        })
    }

    fn matches(&self, relative_path: &str) -> bool {
        if relative_path.contains(&self.raw) {
            return true;
        }
        let file_name = relative_path.rsplit('/').next().unwrap_or(relative_path);
        if self
            .basename_glob
            .as_ref()
            .is_some_and(|glob| glob.is_match(file_name))
        {
            return true;
        }
        relative_path.split('/').any(|part| part == self.segment)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    patterns: Vec<ExclusionPattern>,
}

impl ExclusionFilter {
    /// `patterns` is the manual list followed by the gitignore-derived one.
    /// Blank entries are dropped.
    pub fn new(patterns: &[String]) -> Self {
        Self {
            patterns: patterns
                .iter()
                .filter_map(|p| ExclusionPattern::new(p))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn is_excluded(&self, path: &Path, root: &Path) -> bool {
        let relative = relative_slash_path(path, root);
        self.is_excluded_relative(&relative)
    }

    pub fn is_excluded_relative(&self, relative_path: &str) -> bool {
        match self.patterns.iter().find(|p| p.matches(relative_path)) {
            Some(pattern) => {
                log::debug!(
                    "Path excluded by pattern \"{}\": {}",
                    pattern.raw,
                    relative_path
                );
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(patterns: &[&str]) -> ExclusionFilter {
        let patterns: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
        ExclusionFilter::new(&patterns)
    }

    #[test]
    fn whole_segment_excludes_nested_file() {
        assert!(filter(&["test"]).is_excluded_relative("src/test/x.py"));
    }

    #[test]
    fn trailing_slash_matches_directory_segment() {
        let f = filter(&["node_modules/"]);
        assert!(f.is_excluded_relative("web/node_modules/react/index.js"));
        assert!(!f.is_excluded_relative("web/src/app.js"));
    }

    #[test]
    fn basename_glob_excludes() {
        let f = filter(&["*.min.js"]);
        assert!(f.is_excluded_relative("dist/app.min.js"));
        assert!(!f.is_excluded_relative("src/app.js"));
    }

    #[test]
    fn substring_containment_is_broad() {
        assert!(filter(&["dist"]).is_excluded_relative("src/distinct/file.go"));
    }

    #[test]
    fn blank_patterns_exclude_nothing() {
        let f = filter(&["", "   "]);
        assert!(f.is_empty());
        assert!(!f.is_excluded_relative("src/main.rs"));
    }

    #[test]
    fn uses_root_relative_path() {
        let root = Path::new("/home/build/project");
        let f = filter(&["build"]);
        assert!(!f.is_excluded(&root.join("src/main.rs"), root));
        assert!(f.is_excluded(&root.join("build/out.txt"), root));
    }
}

use crate::binary::is_binary_file;
use crate::config::SelectionConfig;
use crate::exclude::ExclusionFilter;
use crate::gather::PatternMatcher;
use crate::gitignore::load_gitignore_patterns;
use log;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    StatError(String),
    Excluded,
    TooLarge { size: u64 },
    Binary,
}

impl SkipReason {
    pub fn tag(&self) -> &'static str {
        match self {
            SkipReason::StatError(_) => "stat-error",
            SkipReason::Excluded => "excluded",
            SkipReason::TooLarge { .. } => "too-large",
            SkipReason::Binary => "binary",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::StatError(err) => write!(f, "Cannot stat: {}", err),
            SkipReason::Excluded => f.write_str("Matched exclusion pattern"),
            SkipReason::TooLarge { size } => {
                write!(f, "Too large ({:.1} MB)", *size as f64 / 1024.0 / 1024.0)
            }
            SkipReason::Binary => f.write_str("Binary file"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipRecord {
    pub path: PathBuf,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub path: PathBuf,
    pub size: u64,
    pub is_regular: bool,
}

impl CandidateFile {
    pub fn stat(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            size: metadata.len(),
            is_regular: metadata.is_file(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub size: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub selected: Vec<SelectedFile>,
    pub skipped: Vec<SkipRecord>,
}

/// Manual excludes first, then `.gitignore` lines unless disabled.
pub fn exclusion_patterns(config: &SelectionConfig) -> Vec<String> {
    let mut patterns = config.excludes().to_vec();
    if config.ignore_gitignore() {
        log::debug!("Skipping .gitignore as requested.");
    } else {
        patterns.extend(load_gitignore_patterns(config.root()));
    }
    patterns
}

/// Runs discovery and filtering with the exclusion list derived from
/// `config`.
pub fn select(config: &SelectionConfig) -> Selection {
    let patterns = exclusion_patterns(config);
    select_files(config, &patterns)
}

/// Filters discovered candidates in sorted order. Checks run cheapest
/// first: stat, exclusion, size, then the content sniff.
pub fn select_files(config: &SelectionConfig, exclusion_patterns: &[String]) -> Selection {
    let root = config.root();
    let candidates = PatternMatcher::new(config.patterns()).discover(root);
    let exclusions = ExclusionFilter::new(exclusion_patterns);
    log::debug!(
        "Filtering {} candidates with {} exclusion patterns (max size {} bytes)",
        candidates.len(),
        exclusions.len(),
        config.max_size()
    );

    let mut selection = Selection::default();
    for path in candidates {
        let candidate = match CandidateFile::stat(&path) {
            Ok(candidate) => candidate,
            Err(e) => {
                log::debug!("Cannot stat {}: {}", path.display(), e);
                selection.skipped.push(SkipRecord {
                    path,
                    reason: SkipReason::StatError(e.to_string()),
                });
                continue;
            }
        };

        if !candidate.is_regular {
            log::trace!("Ignoring non-regular file: {}", candidate.path.display());
            continue;
        }
        if let Some(reason) = rejection_reason(&candidate, config, &exclusions) {
            log::debug!("Skipping {} ({})", candidate.path.display(), reason.tag());
            selection.skipped.push(SkipRecord {
                path: candidate.path,
                reason,
            });
            continue;
        }

        log::trace!("Selected: {}", candidate.path.display());
        selection.selected.push(SelectedFile {
            path: candidate.path,
            size: candidate.size,
        });
    }

    log::info!(
        "Selection complete: {} selected, {} skipped.",
        selection.selected.len(),
        selection.skipped.len()
    );
    selection
}

fn rejection_reason(
    candidate: &CandidateFile,
    config: &SelectionConfig,
    exclusions: &ExclusionFilter,
) -> Option<SkipReason> {
    if exclusions.is_excluded(&candidate.path, config.root()) {
        return Some(SkipReason::Excluded);
    }
    if candidate.size > config.max_size() {
        return Some(SkipReason::TooLarge {
            size: candidate.size,
        });
    }
    if is_binary_file(&candidate.path) {
        return Some(SkipReason::Binary);
    }
    None
}

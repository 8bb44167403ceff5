use crate::error::{AppError, Result};
use log;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;
pub const DEFAULT_ENCODING: &str = "utf-8";
pub const DEFAULT_CONFIG_FILENAME: &str = ".combine.toml";
pub const GITIGNORE_FILENAME: &str = ".gitignore";

/// Defaults read from a TOML file. Every key is optional; command-line
/// values take precedence over whatever is set here.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub patterns: Option<Vec<String>>,
    #[serde(default)]
    pub excludes: Option<Vec<String>>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub no_separator: Option<bool>,
    #[serde(default)]
    pub ignore_gitignore: Option<bool>,
    #[serde(default)]
    pub newline: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub max_size: Option<u64>,
}

impl FileConfig {
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        log::info!("Loading configuration from: {}", config_path.display());
        let toml_content = fs::read_to_string(config_path).map_err(|e| AppError::FileRead {
            path: config_path.to_path_buf(),
            source: e,
        })?;
        toml::from_str::<FileConfig>(&toml_content).map_err(|e| {
            AppError::TomlParse(format!(
                "Error parsing config file '{}': {}. Check TOML syntax and keys.",
                config_path.display(),
                e
            ))
        })
    }

    /// Picks the defaults file to load: an explicit path must exist, the
    /// implicit `<root>/.combine.toml` is used only when present.
    pub fn resolve_path(
        root: &Path,
        cli_config_file: Option<&Path>,
        cli_disable_config: bool,
    ) -> Result<Option<PathBuf>> {
        if cli_disable_config {
            log::debug!("Config file loading disabled via CLI flag.");
            return Ok(None);
        }

        match cli_config_file {
            Some(path) => {
                if !path.is_file() {
                    return Err(AppError::Config(format!(
                        "Specified config file not found at path: {}",
                        path.display()
                    )));
                }
                log::debug!("Using specified config file path: {}", path.display());
                Ok(Some(path.to_path_buf()))
            }
            None => {
                let default_path = root.join(DEFAULT_CONFIG_FILENAME);
                if default_path.is_file() {
                    log::debug!("Using default config file path: {}", default_path.display());
                    Ok(Some(default_path))
                } else {
                    log::debug!(
                        "No config file specified and default not found at: {}",
                        default_path.display()
                    );
                    Ok(None)
                }
            }
        }
    }
}

/// Line terminator appended to files that do not already end with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewlineStyle {
    #[default]
    Lf,
    Crlf,
    Cr,
}

impl NewlineStyle {
    pub fn sequence(self) -> &'static str {
        match self {
            NewlineStyle::Lf => "\n",
            NewlineStyle::Crlf => "\r\n",
            NewlineStyle::Cr => "\r",
        }
    }
}

impl FromStr for NewlineStyle {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "lf" | "\\n" => Ok(NewlineStyle::Lf),
            "crlf" | "\\r\\n" => Ok(NewlineStyle::Crlf),
            "cr" | "\\r" => Ok(NewlineStyle::Cr),
            other => Err(AppError::InvalidArgument(format!(
                "Unknown newline type '{}'. Use lf, crlf or cr.",
                other
            ))),
        }
    }
}

impl fmt::Display for NewlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NewlineStyle::Lf => "lf",
            NewlineStyle::Crlf => "crlf",
            NewlineStyle::Cr => "cr",
        };
        f.write_str(name)
    }
}

/// Everything the selection pass needs. Built once, read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionConfig {
    root: PathBuf,
    patterns: Vec<String>,
    excludes: Vec<String>,
    max_size: u64,
    ignore_gitignore: bool,
}

impl SelectionConfig {
    /// Validates and canonicalizes `root`.
    pub fn new(
        root: &Path,
        patterns: Vec<String>,
        excludes: Vec<String>,
        max_size: u64,
        ignore_gitignore: bool,
    ) -> Result<Self> {
        let metadata =
            fs::metadata(root).map_err(|_| AppError::RootMissing(root.to_path_buf()))?;
        if !metadata.is_dir() {
            return Err(AppError::RootNotDirectory(root.to_path_buf()));
        }
        let root = root.canonicalize().map_err(|e| {
            AppError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to canonicalize root '{}': {}", root.display(), e),
            ))
        })?;
        Ok(Self {
            root,
            patterns,
            excludes,
            max_size,
            ignore_gitignore,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn excludes(&self) -> &[String] {
        &self.excludes
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    pub fn ignore_gitignore(&self) -> bool {
        self.ignore_gitignore
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CombineOptions {
    pub root: PathBuf,
    pub output: PathBuf,
    pub separators: bool,
    pub newline: NewlineStyle,
}

/// Splits a comma-separated flag value, trimming entries and dropping empty
/// ones.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

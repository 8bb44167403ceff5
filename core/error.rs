use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("TOML Parsing Error: {0}")]
    TomlParse(String),

    #[error("Root directory does not exist: {}", .0.display())]
    RootMissing(PathBuf),

    #[error("Root path is not a directory: {}", .0.display())]
    RootNotDirectory(PathBuf),

    #[error("No files found matching the patterns")]
    NoFilesFound,

    #[error("No files to combine after filtering")]
    NoFilesAfterFiltering,

    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File Read Error: Path '{path}', Error: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot create output directory: Path '{path}', Error: {source}")]
    DirCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot create output file: Path '{path}', Error: {source}")]
    OutputCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File Write Error: Path '{path}', Error: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Glob Pattern Error: {0}")]
    Glob(String),

    #[error("Invalid Argument: {0}")]
    InvalidArgument(String),
}

impl AppError {
    /// Process exit code for this error: setup failures on the output side
    /// are `2`, everything else is `1`.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::DirCreation { .. }
            | AppError::OutputCreate { .. }
            | AppError::FileWrite { .. } => 2,
            _ => 1,
        }
    }
}

impl From<globset::Error> for AppError {
    fn from(err: globset::Error) -> Self {
        AppError::Glob(format!("Globset error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_side_failures_exit_with_two() {
        let io = || std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let dir = AppError::DirCreation {
            path: PathBuf::from("out"),
            source: io(),
        };
        let file = AppError::OutputCreate {
            path: PathBuf::from("out/x.txt"),
            source: io(),
        };
        assert_eq!(dir.exit_code(), 2);
        assert_eq!(file.exit_code(), 2);
    }

    #[test]
    fn selection_failures_exit_with_one() {
        assert_eq!(AppError::NoFilesFound.exit_code(), 1);
        assert_eq!(AppError::NoFilesAfterFiltering.exit_code(), 1);
        assert_eq!(AppError::RootMissing(PathBuf::from("nope")).exit_code(), 1);
    }
}

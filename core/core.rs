pub mod binary;
pub mod combine;
pub mod comment_style;
pub mod config;
pub mod error;
pub mod exclude;
pub mod gather;
pub mod gitignore;
pub mod paths;
pub mod select;

pub use binary::{ContentKind, classify_file, is_binary_file};
pub use combine::{CombineResult, Combiner, build_separator, combine_files};
pub use comment_style::{CommentStyle, SeparatorShape, comment_style_for_path};
pub use config::{
    CombineOptions, DEFAULT_ENCODING, DEFAULT_MAX_FILE_SIZE, FileConfig, NewlineStyle,
    SelectionConfig, VERSION, split_list,
};
pub use error::{AppError, Result};
pub use exclude::ExclusionFilter;
pub use gather::PatternMatcher;
pub use gitignore::load_gitignore_patterns;
pub use select::{
    CandidateFile, SelectedFile, Selection, SkipReason, SkipRecord, exclusion_patterns, select,
    select_files,
};

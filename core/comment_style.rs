use crate::paths::dotted_extension;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentStyle {
    pub single_line: Option<&'static str>,
    pub block: Option<(&'static str, &'static str)>,
}

/// How a separator is drawn for a given [`CommentStyle`]. Block comments win
/// when a language has both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeparatorShape {
    Block {
        start: &'static str,
        end: &'static str,
    },
    Line(&'static str),
    Plain,
}

impl CommentStyle {
    pub const DEFAULT: CommentStyle = CommentStyle::line("#");

    pub const fn line(marker: &'static str) -> Self {
        Self {
            single_line: Some(marker),
            block: None,
        }
    }

    pub const fn block(start: &'static str, end: &'static str) -> Self {
        Self {
            single_line: None,
            block: Some((start, end)),
        }
    }

    pub const fn both(marker: &'static str, start: &'static str, end: &'static str) -> Self {
        Self {
            single_line: Some(marker),
            block: Some((start, end)),
        }
    }

    pub fn shape(&self) -> SeparatorShape {
        match (self.block, self.single_line) {
            (Some((start, end)), _) => SeparatorShape::Block { start, end },
            (None, Some(marker)) => SeparatorShape::Line(marker),
            (None, None) => SeparatorShape::Plain,
        }
    }
}

impl Default for CommentStyle {
    fn default() -> Self {
        Self::DEFAULT
    }
}

static COMMENT_STYLES: Lazy<HashMap<&'static str, CommentStyle>> = Lazy::new(|| {
    let hash = CommentStyle::line("#");
    let c_like = CommentStyle::both("//", "/*", "*/");
    let markup = CommentStyle::block("<!--", "-->");

    let mut styles = HashMap::new();
    for ext in [
        ".py", ".rb", ".sh", ".bash", ".zsh", ".yaml", ".yml", ".toml", ".conf", ".ini", ".r",
        ".pl", ".pm", ".txt",
    ] {
        styles.insert(ext, hash);
    }
    for ext in [
        ".js", ".ts", ".jsx", ".tsx", ".java", ".c", ".cpp", ".cc", ".h", ".hpp", ".cs", ".go",
        ".swift", ".kt", ".scala", ".rs", ".dart", ".php", ".scss", ".less",
    ] {
        styles.insert(ext, c_like);
    }
    for ext in [".html", ".xml", ".svg", ".md"] {
        styles.insert(ext, markup);
    }
    styles.insert(".css", CommentStyle::block("/*", "*/"));
    styles.insert(".sass", CommentStyle::line("//"));
    styles.insert(".sql", CommentStyle::both("--", "/*", "*/"));
    for ext in [".lisp", ".clj", ".scm"] {
        styles.insert(ext, CommentStyle::line(";"));
    }
    styles.insert(".lua", CommentStyle::both("--", "--[[", "]]"));
    styles.insert(".bat", CommentStyle::line("REM"));
    styles.insert(".cmd", CommentStyle::line("REM"));
    styles.insert(".vb", CommentStyle::line("'"));
    styles.insert(".m", CommentStyle::line("%"));
    styles.insert(".tex", CommentStyle::line("%"));
    styles.insert(".rst", CommentStyle::line(".."));
    styles
});

pub fn comment_style_for_extension(ext: &str) -> CommentStyle {
    COMMENT_STYLES
        .get(ext.to_lowercase().as_str())
        .copied()
        .unwrap_or_default()
}

pub fn comment_style_for_path(path: &Path) -> CommentStyle {
    comment_style_for_extension(&dotted_extension(path))
}

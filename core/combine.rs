use crate::comment_style::{CommentStyle, SeparatorShape, comment_style_for_path};
use crate::config::CombineOptions;
use crate::error::{AppError, Result};
use crate::paths::{relative_slash_path, resolve_absolute};
use crate::select::SelectedFile;
use chrono::Local;
use log;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const RULE_WIDTH: usize = 70;
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineResult {
    pub success_count: usize,
    pub error_count: usize,
    pub output: PathBuf,
}

pub fn local_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Header written in front of the `ordinal`-th file.
pub fn build_separator(
    style: &CommentStyle,
    ordinal: usize,
    relative_path: &str,
    timestamp: &str,
) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    match style.shape() {
        SeparatorShape::Block { start, end } => format!(
            "\n{start}\n FILE {ordinal}: {relative_path}\n Combined at: {timestamp}\n{end}\n\n"
        ),
        SeparatorShape::Line(m) => format!(
            "\n{m} {rule}\n{m} FILE {ordinal}: {relative_path}\n{m} Combined at: {timestamp}\n{m} {rule}\n\n"
        ),
        SeparatorShape::Plain => format!("\n{rule}\n FILE {ordinal}: {relative_path}\n{rule}\n\n"),
    }
}

/// Drops the output file from its own inputs, comparing resolved absolute
/// paths.
pub fn without_output<'a>(files: &'a [SelectedFile], output: &Path) -> Vec<&'a Path> {
    let output = resolve_absolute(output);
    files
        .iter()
        .map(|f| f.path.as_path())
        .filter(|path| {
            let is_output = resolve_absolute(path) == output;
            if is_output {
                log::debug!("Leaving output file out of its own input: {}", path.display());
            }
            !is_output
        })
        .collect()
}

/// Appends files to a sink one at a time, each optionally preceded by a
/// separator and terminated by the configured newline.
pub struct Combiner<'a, W: Write> {
    sink: W,
    options: &'a CombineOptions,
    clock: fn() -> String,
    success_count: usize,
    error_count: usize,
}

impl<'a, W: Write> Combiner<'a, W> {
    pub fn new(sink: W, options: &'a CombineOptions) -> Self {
        Self {
            sink,
            options,
            clock: local_timestamp,
            success_count: 0,
            error_count: 0,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> String) -> Self {
        self.clock = clock;
        self
    }

    /// Reads `path` and appends it. A file that cannot be read is reported,
    /// counted and skipped; only failures on the sink are returned as
    /// errors.
    pub fn append(&mut self, ordinal: usize, path: &Path) -> Result<()> {
        let content = match fs::read(path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Skipped {}: {}", path.display(), e);
                self.error_count += 1;
                return Ok(());
            }
        };

        if self.options.separators {
            let relative = relative_slash_path(path, &self.options.root);
            let separator = build_separator(
                &comment_style_for_path(path),
                ordinal,
                &relative,
                &(self.clock)(),
            );
            self.write_all(separator.as_bytes())?;
        }

        self.write_all(&content)?;

        let newline = self.options.newline.sequence().as_bytes();
        if !content.is_empty() && !content.ends_with(newline) {
            self.write_all(newline)?;
        }

        self.success_count += 1;
        Ok(())
    }

    /// Flushes the sink and hands it back with the run's counts.
    pub fn finish(mut self) -> Result<(W, CombineResult)> {
        if let Err(e) = self.sink.flush() {
            return Err(self.write_error(e));
        }
        let result = CombineResult {
            success_count: self.success_count,
            error_count: self.error_count,
            output: self.options.output.clone(),
        };
        Ok((self.sink, result))
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        match self.sink.write_all(bytes) {
            Ok(()) => Ok(()),
            Err(e) => Err(self.write_error(e)),
        }
    }

    fn write_error(&self, source: io::Error) -> AppError {
        AppError::FileWrite {
            path: self.options.output.clone(),
            source,
        }
    }
}

/// Writes every selected file into `options.output` in order. Directory and
/// file creation both happen before the first byte is written.
pub fn combine_files(options: &CombineOptions, files: &[SelectedFile]) -> Result<CombineResult> {
    let inputs = without_output(files, &options.output);
    if inputs.is_empty() {
        return Err(AppError::NoFilesAfterFiltering);
    }

    if let Some(parent) = options.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| AppError::DirCreation {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }
    let file = File::create(&options.output).map_err(|e| AppError::OutputCreate {
        path: options.output.clone(),
        source: e,
    })?;
    log::debug!(
        "Writing {} files to {} (separators: {}, newline: {})",
        inputs.len(),
        options.output.display(),
        options.separators,
        options.newline
    );

    let mut combiner = Combiner::new(BufWriter::new(file), options);
    let total = inputs.len();
    for (idx, path) in inputs.into_iter().enumerate() {
        log::info!(
            "Processing [{}/{}]: {}",
            idx + 1,
            total,
            path.file_name().unwrap_or_default().to_string_lossy()
        );
        combiner.append(idx + 1, path)?;
    }

    let (_, result) = combiner.finish()?;
    log::info!(
        "Combined {} files into {} ({} errors).",
        result.success_count,
        result.output.display(),
        result.error_count
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NewlineStyle;

    fn fixed_clock() -> String {
        "2024-01-02 03:04:05".to_string()
    }

    fn options(root: &Path, output: PathBuf, separators: bool, newline: NewlineStyle) -> CombineOptions {
        CombineOptions {
            root: root.to_path_buf(),
            output,
            separators,
            newline,
        }
    }

    fn selected(paths: &[PathBuf]) -> Vec<SelectedFile> {
        paths
            .iter()
            .map(|p| SelectedFile {
                path: p.clone(),
                size: fs::metadata(p).map(|m| m.len()).unwrap_or(0),
            })
            .collect()
    }

    fn line_separator(ordinal: usize, path: &str) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        format!(
            "\n# {rule}\n# FILE {ordinal}: {path}\n# Combined at: 2024-01-02 03:04:05\n# {rule}\n\n"
        )
    }

    #[test]
    fn separators_number_files_and_terminate_content() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.py");
        let b = dir.path().join("b.py");
        fs::write(&a, "print(1)").unwrap();
        fs::write(&b, "print(2)\n").unwrap();

        let opts = options(dir.path(), dir.path().join("out.txt"), true, NewlineStyle::Lf);
        let mut combiner = Combiner::new(Vec::new(), &opts).with_clock(fixed_clock);
        combiner.append(1, &a).unwrap();
        combiner.append(2, &b).unwrap();
        let (bytes, result) = combiner.finish().unwrap();

        let expected = format!(
            "{}print(1)\n{}print(2)\n",
            line_separator(1, "a.py"),
            line_separator(2, "b.py")
        );
        assert_eq!(String::from_utf8(bytes).unwrap(), expected);
        assert_eq!(result.success_count, 2);
        assert_eq!(result.error_count, 0);
    }

    #[test]
    fn block_separator_for_c_like_files() {
        let style = comment_style_for_path(Path::new("lib.rs"));
        let separator = build_separator(&style, 3, "src/lib.rs", "T");
        assert_eq!(separator, "\n/*\n FILE 3: src/lib.rs\n Combined at: T\n*/\n\n");
    }

    #[test]
    fn plain_separator_without_markers() {
        let style = CommentStyle {
            single_line: None,
            block: None,
        };
        let rule = "=".repeat(RULE_WIDTH);
        assert_eq!(
            build_separator(&style, 1, "x", "T"),
            format!("\n{rule}\n FILE 1: x\n{rule}\n\n")
        );
    }

    #[test]
    fn no_separator_lf_is_raw_concatenation() {
        let dir = tempfile::tempdir().unwrap();
        let parts = ["one\n", "two\nlines\n", "three\n"];
        let paths: Vec<PathBuf> = parts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let path = dir.path().join(format!("{i}.txt"));
                fs::write(&path, text).unwrap();
                path
            })
            .collect();

        let output = dir.path().join("out").join("all.txt");
        let opts = options(dir.path(), output.clone(), false, NewlineStyle::Lf);
        let result = combine_files(&opts, &selected(&paths)).unwrap();

        assert_eq!(result.success_count, 3);
        assert_eq!(fs::read_to_string(&output).unwrap(), parts.concat());
    }

    #[test]
    fn crlf_is_appended_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        let empty = dir.path().join("c.txt");
        fs::write(&a, "x\n").unwrap();
        fs::write(&b, "y\r\n").unwrap();
        fs::write(&empty, "").unwrap();

        let opts = options(dir.path(), dir.path().join("o.txt"), false, NewlineStyle::Crlf);
        let mut combiner = Combiner::new(Vec::new(), &opts);
        for (i, path) in [&a, &b, &empty].into_iter().enumerate() {
            combiner.append(i + 1, path).unwrap();
        }
        let (bytes, _) = combiner.finish().unwrap();
        assert_eq!(bytes, b"x\n\r\ny\r\n");
    }

    #[test]
    fn output_file_is_never_its_own_input() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let output = dir.path().join("combined.txt");
        fs::write(&a, "alpha\n").unwrap();
        fs::write(&output, "stale\n").unwrap();

        let opts = options(dir.path(), output.clone(), false, NewlineStyle::Lf);
        let result = combine_files(&opts, &selected(&[a, output.clone()])).unwrap();

        assert_eq!(result.success_count, 1);
        assert_eq!(fs::read_to_string(&output).unwrap(), "alpha\n");
    }

    #[test]
    fn only_output_left_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("combined.txt");
        fs::write(&output, "stale\n").unwrap();

        let opts = options(dir.path(), output.clone(), true, NewlineStyle::Lf);
        let err = combine_files(&opts, &selected(&[output.clone()])).unwrap_err();
        assert!(matches!(err, AppError::NoFilesAfterFiltering));
        assert_eq!(fs::read_to_string(&output).unwrap(), "stale\n");
    }

    #[test]
    fn unreadable_file_is_counted_and_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.txt");
        let gone = dir.path().join("gone.txt");
        fs::write(&good, "ok\n").unwrap();

        let output = dir.path().join("out.txt");
        let opts = options(dir.path(), output.clone(), false, NewlineStyle::Lf);
        let files = vec![
            SelectedFile {
                path: gone,
                size: 0,
            },
            SelectedFile {
                path: good,
                size: 3,
            },
        ];
        let result = combine_files(&opts, &files).unwrap();

        assert_eq!(result.success_count, 1);
        assert_eq!(result.error_count, 1);
        assert_eq!(fs::read_to_string(&output).unwrap(), "ok\n");
    }

    #[test]
    fn ordinal_follows_position_even_after_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.py");
        fs::write(&good, "x = 1\n").unwrap();

        let opts = options(dir.path(), dir.path().join("o.txt"), true, NewlineStyle::Lf);
        let mut combiner = Combiner::new(Vec::new(), &opts).with_clock(fixed_clock);
        combiner.append(1, &dir.path().join("missing.py")).unwrap();
        combiner.append(2, &good).unwrap();
        let (bytes, result) = combiner.finish().unwrap();

        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with(&line_separator(2, "good.py")));
        assert_eq!(result.error_count, 1);
    }

    #[cfg(unix)]
    #[test]
    fn directory_creation_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        fs::write(&a, "a\n").unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a dir").unwrap();

        let opts = options(dir.path(), blocker.join("sub").join("out.txt"), true, NewlineStyle::Lf);
        let err = combine_files(&opts, &selected(&[a])).unwrap_err();
        assert!(matches!(err, AppError::DirCreation { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn output_naming_a_directory_cannot_be_created() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        fs::write(&a, "a\n").unwrap();
        let output = dir.path().join("outdir");
        fs::create_dir(&output).unwrap();

        let opts = options(dir.path(), output.clone(), true, NewlineStyle::Lf);
        let err = combine_files(&opts, &selected(&[a])).unwrap_err();
        assert!(matches!(err, AppError::OutputCreate { ref path, .. } if *path == output));
        assert_eq!(err.exit_code(), 2);
        assert!(output.is_dir());
    }

    #[test]
    fn timestamp_has_expected_shape() {
        let ts = local_timestamp();
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], " ");
        assert_eq!(&ts[13..14], ":");
    }
}

use clap::Parser;
use std::ffi::OsString;

/// Long flags that may also be written with a single dash (`-root`).
const SINGLE_DASH_LONG_FLAGS: &[&str] = &[
    "root",
    "no-separator",
    "encoding",
    "newline",
    "max-size",
    "ignore-gitignore",
    "dry-run",
    "debug",
    "version",
    "config",
    "no-config",
    "help",
];

/// One-letter flags that may also be written with two dashes (`--p`).
const DOUBLE_DASH_SHORT_FLAGS: &[&str] = &["p", "o", "e", "v"];

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "combine",
    about = "Combine multiple files matching glob patterns into a single file.",
    override_usage = "combine -p PATTERNS -o OUTPUT [options]",
    disable_version_flag = true,
    after_help = "EXAMPLES:\n  combine -p \"*.py\" -o combined.py\n  combine -p \"*.go,*.mod\" -o project.txt\n  combine -p \"**/*.js\" -o bundle.js -e \"node_modules,dist\"\n  combine -p \"src/**/*.cpp\" -o output.cpp -dry-run"
)]
pub struct Cli {
    #[arg(
        short = 'p',
        value_name = "PATTERNS",
        help = "Glob patterns (comma-separated), e.g. \"*.py,*.txt\" (required)"
    )]
    pub patterns: Option<String>,

    #[arg(short = 'o', value_name = "OUTPUT", help = "Output file path (required)")]
    pub output: Option<String>,

    #[arg(
        short = 'e',
        value_name = "EXCLUDES",
        help = "Exclude patterns (comma-separated)"
    )]
    pub excludes: Option<String>,

    #[arg(
        long,
        value_name = "DIR",
        default_value = ".",
        help = "Root directory to search"
    )]
    pub root: String,

    #[arg(long, help = "Don't add separators between files")]
    pub no_separator: bool,

    #[arg(
        long,
        value_name = "ENCODING",
        help = "Output file encoding, recorded only [default: utf-8]"
    )]
    pub encoding: Option<String>,

    #[arg(
        long,
        value_name = "TYPE",
        help = "Newline type: lf, crlf, cr [default: lf]"
    )]
    pub newline: Option<String>,

    #[arg(
        long,
        value_name = "BYTES",
        help = "Maximum file size in bytes [default: 104857600]"
    )]
    pub max_size: Option<u64>,

    #[arg(long, help = "Don't read .gitignore")]
    pub ignore_gitignore: bool,

    #[arg(long, help = "Preview without writing")]
    pub dry_run: bool,

    #[arg(short = 'v', help = "Verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Debug mode (implies -v)")]
    pub debug: bool,

    #[arg(long, help = "Show version")]
    pub version: bool,

    #[arg(
        long,
        value_name = "FILE",
        conflicts_with = "no_config",
        help = "TOML file with default options (default: <root>/.combine.toml)"
    )]
    pub config: Option<String>,

    #[arg(long, conflicts_with = "config", help = "Don't load any TOML defaults file")]
    pub no_config: bool,
}

/// Rewrites Go-style flag spellings to what clap expects: single-dash long
/// flags (`-dry-run`, `-root=src`) gain a dash and double-dash one-letter
/// flags (`--p`, `--o=out.txt`) lose one. Everything after a bare `--` is
/// left alone.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .enumerate()
        .map(|(idx, arg)| {
            if idx == 0 || passthrough {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                passthrough = true;
                return arg;
            }
            if let Some(rest) = text.strip_prefix("--") {
                let name = rest.split('=').next().unwrap_or_default();
                return if DOUBLE_DASH_SHORT_FLAGS.contains(&name) {
                    OsString::from(&text[1..])
                } else {
                    arg
                };
            }
            if !text.starts_with('-') {
                return arg;
            }
            let name = text[1..].split('=').next().unwrap_or_default();
            if SINGLE_DASH_LONG_FLAGS.contains(&name) {
                OsString::from(format!("-{}", text))
            } else {
                arg
            }
        })
        .collect()
}

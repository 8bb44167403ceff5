mod cli_args;
mod output;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::*;
use combine_core::{
    AppError, CombineOptions, DEFAULT_ENCODING, DEFAULT_MAX_FILE_SIZE, FileConfig,
    NewlineStyle, SelectionConfig, split_list,
};
use log;
use std::env;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;

use cli_args::{Cli, normalize_args};

/// Fully merged options for one run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub selection: SelectionConfig,
    pub combine: CombineOptions,
    pub encoding: String,
    pub dry_run: bool,
    /// Root as the user wrote it, for the report.
    pub display_root: String,
}

fn main() {
    let cli = match Cli::try_parse_from(normalize_args(env::args_os())) {
        Ok(cli) => cli,
        Err(e) => {
            // Help goes to stdout with success; real usage errors exit 1.
            let exit_code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(exit_code);
        }
    };

    if cli.version {
        println!("combine v{}", combine_core::VERSION);
        process::exit(0);
    }

    if !io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
    setup_logging(cli.verbose, cli.debug);
    log::debug!("CLI args parsed: {:?}", cli);

    let exit_code = match run_app(cli) {
        Ok(()) => {
            log::info!("Application finished successfully.");
            0
        }
        Err(e) => {
            let core_err = e.downcast_ref::<AppError>();
            let exit_code = core_err.map_or(1, AppError::exit_code);
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            if let Some(AppError::InvalidArgument(_)) = core_err {
                eprintln!("\n{}", Cli::command().render_usage());
            }
            exit_code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn setup_logging(verbose: bool, debug: bool) {
    let log_level = if debug {
        log::LevelFilter::Debug
    } else if verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(cli: Cli) -> Result<()> {
    let settings = load_settings(&cli).context("Failed to resolve configuration")?;
    log::debug!("Resolved settings: {:?}", settings);
    if !settings.encoding.eq_ignore_ascii_case(DEFAULT_ENCODING) {
        log::info!(
            "Declared output encoding '{}' is not applied; file bytes are copied unchanged.",
            settings.encoding
        );
    }

    log::info!("Searching for files...");
    let selection = combine_core::select(&settings.selection);

    output::print_summary(&settings, &selection);

    if selection.selected.is_empty() {
        anyhow::bail!(AppError::NoFilesFound);
    }

    if settings.dry_run {
        output::print_dry_run_notice();
        return Ok(());
    }

    log::info!("Combining files...");
    let result = combine_core::combine_files(&settings.combine, &selection.selected)?;
    output::print_success(&result);
    Ok(())
}

fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Layers compiled defaults, the optional TOML defaults file and the
/// command line, in increasing precedence.
fn load_settings(cli: &Cli) -> Result<RunSettings> {
    let root = expand_path(&cli.root);

    let explicit_config = cli.config.as_deref().map(expand_path);
    let config_path = FileConfig::resolve_path(&root, explicit_config.as_deref(), cli.no_config)?;
    let file_config = match &config_path {
        Some(path) => FileConfig::load_from_path(path)?,
        None => FileConfig::default(),
    };

    let patterns = match &cli.patterns {
        Some(raw) => split_list(raw),
        None => clean_list(file_config.patterns.unwrap_or_default()),
    };
    let output = cli.output.clone().or(file_config.output);
    let (patterns, output) = match (patterns.is_empty(), output) {
        (false, Some(output)) => (patterns, output),
        _ => anyhow::bail!(AppError::InvalidArgument(
            "both -p PATTERNS and -o OUTPUT are required".to_string()
        )),
    };

    let excludes = match &cli.excludes {
        Some(raw) => split_list(raw),
        None => clean_list(file_config.excludes.unwrap_or_default()),
    };

    let newline_raw = cli
        .newline
        .clone()
        .or(file_config.newline)
        .unwrap_or_else(|| NewlineStyle::default().to_string());
    let newline = newline_raw.parse::<NewlineStyle>().unwrap_or_else(|e| {
        log::warn!("{}; using lf.", e);
        NewlineStyle::Lf
    });

    let selection = SelectionConfig::new(
        &root,
        patterns,
        excludes,
        cli.max_size
            .or(file_config.max_size)
            .unwrap_or(DEFAULT_MAX_FILE_SIZE),
        cli.ignore_gitignore || file_config.ignore_gitignore.unwrap_or(false),
    )?;

    let combine = CombineOptions {
        root: selection.root().to_path_buf(),
        output: expand_path(&output),
        separators: !(cli.no_separator || file_config.no_separator.unwrap_or(false)),
        newline,
    };

    Ok(RunSettings {
        selection,
        combine,
        encoding: cli
            .encoding
            .clone()
            .or(file_config.encoding)
            .unwrap_or_else(|| DEFAULT_ENCODING.to_string()),
        dry_run: cli.dry_run,
        display_root: cli.root.clone(),
    })
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

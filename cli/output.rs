use colored::*;
use combine_core::{CombineResult, Selection};
use std::path::Path;

use crate::RunSettings;

const RULE_WIDTH: usize = 70;
const MAX_SKIPPED_SHOWN: usize = 15;
const MAX_SELECTED_SHOWN: usize = 20;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn display_relative(path: &Path, root: &Path) -> String {
    pathdiff::diff_paths(path, root)
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

pub fn print_summary(settings: &RunSettings, selection: &Selection) {
    let root = settings.selection.root();

    println!("\n{}", rule());
    println!("COMBINE FILES - SUMMARY");
    println!("{}", rule());
    println!("Root directory    : {}", settings.display_root);
    println!("Output file       : {}", settings.combine.output.display());
    println!(
        "Search patterns   : {}",
        settings.selection.patterns().join(", ")
    );
    println!("Files found       : {}", selection.selected.len());
    println!("Files excluded    : {}", selection.skipped.len());
    if settings.dry_run {
        println!("Mode              : DRY-RUN (no changes)");
    } else {
        println!("Mode              : EXECUTION");
    }
    println!("{}", rule());

    if !selection.skipped.is_empty() {
        println!("\nEXCLUDED FILES (showing first {}):", MAX_SKIPPED_SHOWN);
        for record in selection.skipped.iter().take(MAX_SKIPPED_SHOWN) {
            println!("  {} {}", "×".red(), display_relative(&record.path, root));
            println!("    Reason: {}", record.reason);
        }
        if selection.skipped.len() > MAX_SKIPPED_SHOWN {
            println!(
                "  ... and {} more files\n",
                selection.skipped.len() - MAX_SKIPPED_SHOWN
            );
        }
    }

    if settings.dry_run && !selection.selected.is_empty() {
        println!("\nFILES TO BE COMBINED (showing first {}):", MAX_SELECTED_SHOWN);
        for file in selection.selected.iter().take(MAX_SELECTED_SHOWN) {
            println!(
                "  {} {} ({:.1} KB)",
                "✓".green(),
                display_relative(&file.path, root),
                file.size as f64 / 1024.0
            );
        }
        if selection.selected.len() > MAX_SELECTED_SHOWN {
            println!(
                "  ... and {} more files",
                selection.selected.len() - MAX_SELECTED_SHOWN
            );
        }
        println!(
            "\nTotal: {} files will be combined",
            selection.selected.len()
        );
    }
}

pub fn print_dry_run_notice() {
    println!("Dry-run mode: No files were modified");
}

pub fn print_success(result: &CombineResult) {
    println!("\n{}", rule());
    println!(
        "{} Combined {} files into {}",
        "SUCCESS:".green().bold(),
        result.success_count,
        result.output.display()
    );
    if result.error_count > 0 {
        println!(
            "{} {} files were skipped due to errors",
            "WARNING:".yellow().bold(),
            result.error_count
        );
    }
    println!("{}", rule());
}

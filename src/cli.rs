//! Command-line interface module for tidyfold.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Configuration loading with interactive fallback
//! - Directory enumeration
//! - The per-file classify / resolve / move loop
//! - Console reporting

use crate::category_map::{CategoryMap, FALLBACK_CATEGORY};
use crate::config;
use crate::organizer::FileOrganizer;
use crate::output::OutputFormatter;
use clap::Parser;
use colored::*;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Organize the files of a directory into category subfolders by extension.
#[derive(Parser, Debug)]
#[command(name = "tidyfold", version, about)]
pub struct Cli {
    /// Directory to organize (defaults to the current working directory)
    pub directory: Option<PathBuf>,

    /// Preview the moves without creating folders or renaming files
    #[arg(short = 'd', long)]
    pub dry_run: bool,
}

/// Runs the CLI application with parsed arguments.
///
/// Loads the category mapping (built-in or from the configuration file
/// next to the executable) and organizes the target directory. Returns
/// `Ok(())` when the operator declines to continue after a bad
/// configuration; individual file failures never turn into an error here.
///
/// # Examples
///
/// ```no_run
/// use tidyfold::cli::{Cli, run_cli};
/// use std::path::PathBuf;
///
/// let cli = Cli { directory: Some(PathBuf::from("/downloads")), dry_run: true };
/// if let Err(e) = run_cli(cli) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(cli: Cli) -> Result<(), String> {
    let base_path = match cli.directory {
        Some(dir) => dir,
        None => env::current_dir()
            .map_err(|e| format!("Cannot determine current directory: {}", e))?,
    };

    // A declined configuration ends the run normally.
    let Some(map) = config::load_category_map() else {
        OutputFormatter::plain("Aborted.");
        return Ok(());
    };

    organize_directory(&base_path, &map, cli.dry_run)
}

/// Organizes the files of `base_path` into category subfolders.
///
/// In a real run the category folder tree is created first (pre-existing
/// folders are skipped, other creation failures abort before any file is
/// touched), then every candidate file is classified, given a
/// collision-free destination and renamed. In dry-run mode nothing is
/// created or renamed; the planned moves are only reported.
///
/// One line is printed per file (`Moved:` / `Would move:`), one error line
/// per failure; a failing file never aborts the batch.
pub fn organize_directory(
    base_path: &Path,
    map: &CategoryMap,
    dry_run: bool,
) -> Result<(), String> {
    if !base_path.is_dir() {
        return Err(format!("Not a directory: {}", base_path.display()));
    }

    if dry_run {
        OutputFormatter::dry_run_notice(&format!(
            "Analyzing contents of: {}",
            base_path.display()
        ));
    } else {
        OutputFormatter::info(&format!("Organizing contents of: {}", base_path.display()));
        FileOrganizer::create_category_dirs(base_path, map).map_err(|e| e.to_string())?;
    }

    let files = list_candidate_files(base_path)
        .map_err(|e| format!("Error reading directory {}: {}", base_path.display(), e))?;

    if files.is_empty() {
        OutputFormatter::plain("No files to organize.");
        return Ok(());
    }

    let pb = OutputFormatter::create_progress_bar(files.len() as u64);
    let mut category_counts: HashMap<String, usize> = HashMap::new();
    let mut failed = 0usize;

    for name in &files {
        let category = map
            .resolve(name)
            .unwrap_or_else(|| FALLBACK_CATEGORY.to_string());

        if dry_run {
            pb.println(format!("Would move: {} -> {}", name, category));
            *category_counts.entry(category).or_insert(0) += 1;
        } else {
            match FileOrganizer::move_to_category(base_path, &base_path.join(name), &category) {
                Ok(_) => {
                    pb.println(format!("Moved: {} -> {}", name, category));
                    *category_counts.entry(category).or_insert(0) += 1;
                }
                Err(e) => {
                    pb.println(format!("{} Failed to move {}: {}", "✗".red(), name, e));
                    failed += 1;
                }
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();

    let processed: usize = category_counts.values().sum();
    OutputFormatter::summary_table(&category_counts, processed);

    if failed > 0 {
        OutputFormatter::warning(&format!(
            "{} {} could not be moved. See errors above.",
            failed,
            if failed == 1 { "file" } else { "files" }
        ));
    }

    if dry_run {
        OutputFormatter::success("Dry run complete. No files were modified.");
    } else {
        OutputFormatter::success("Organization complete!");
    }

    Ok(())
}

/// Lists the names of the files eligible for organization.
///
/// The listing is taken once; sub-directories and hidden entries (leading
/// `.`) are never move candidates. Names are sorted so a run processes
/// files in a stable order.
fn list_candidate_files(base_path: &Path) -> io::Result<Vec<String>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(base_path)? {
        let entry = entry?;
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        files.push(name);
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_list_candidate_files_skips_directories_and_hidden() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        fs::write(base_path.join("b.txt"), "b").expect("write");
        fs::write(base_path.join("a.jpg"), "a").expect("write");
        fs::write(base_path.join(".hidden"), "h").expect("write");
        fs::create_dir(base_path.join("subdir")).expect("mkdir");

        let files = list_candidate_files(base_path).expect("Failed to list");
        assert_eq!(files, vec!["a.jpg".to_string(), "b.txt".to_string()]);
    }

    #[test]
    fn test_list_candidate_files_empty_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let files = list_candidate_files(temp_dir.path()).expect("Failed to list");
        assert!(files.is_empty());
    }

    #[test]
    fn test_organize_directory_rejects_non_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("file.txt");
        fs::write(&file_path, "x").expect("write");

        let result = organize_directory(&file_path, &CategoryMap::new(), false);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parses_dry_run_flags() {
        let cli = Cli::parse_from(["tidyfold", "/tmp", "--dry-run"]);
        assert!(cli.dry_run);
        assert_eq!(cli.directory, Some(PathBuf::from("/tmp")));

        let cli = Cli::parse_from(["tidyfold", "-d"]);
        assert!(cli.dry_run);
        assert_eq!(cli.directory, None);
    }
}

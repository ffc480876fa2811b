//! Category mapping configuration.
//!
//! The category mapping can be overridden by a JSON document placed next
//! to the executable. The document mirrors the [`CategoryMap`] shape: each
//! key is a category name whose value is either an array of lowercase
//! extension strings (each starting with `.`) or a nested object of the
//! same shape.
//!
//! ```json
//! {
//!   "images": [".jpg", ".png"],
//!   "documents": {
//!     "pdfs": [".pdf"]
//!   }
//! }
//! ```
//!
//! A missing file silently falls back to the built-in mapping (with a
//! notice). A malformed or unreadable file reports the error and asks the
//! operator whether to continue with the defaults; declining ends the run.

use crate::category_map::CategoryMap;
use crate::output::OutputFormatter;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// The configuration file name looked up next to the executable.
pub const CONFIG_FILE_NAME: &str = "tidyfold.config.json";

/// Errors that can occur while loading the category configuration.
///
/// A missing configuration file is not an error; both variants describe a
/// file that was found but could not be used.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// The file exists but could not be read.
    ReadFailed { path: PathBuf, reason: String },
    /// The file was read but is not a valid category mapping document.
    ParseFailed { path: PathBuf, reason: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadFailed { path, reason } => {
                write!(
                    f,
                    "Failed to read configuration {}: {}",
                    path.display(),
                    reason
                )
            }
            ConfigError::ParseFailed { path, reason } => {
                write!(
                    f,
                    "Invalid configuration {}: {}",
                    path.display(),
                    reason
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Loads the category mapping for a run.
///
/// Resolution order:
/// 1. `tidyfold.config.json` next to the executable, when present.
/// 2. The built-in mapping, with a notice, when the file is absent.
///
/// On a read or parse failure the error is reported and the operator is
/// asked whether to continue with the built-in mapping. Returns `None`
/// when the operator declines; the caller ends the run normally.
pub fn load_category_map() -> Option<CategoryMap> {
    match load_from_exe_dir() {
        Ok(Some(map)) => {
            OutputFormatter::info(&format!("Loaded category mapping from {}", CONFIG_FILE_NAME));
            Some(map)
        }
        Ok(None) => {
            OutputFormatter::info(&format!(
                "No {} found, using built-in categories",
                CONFIG_FILE_NAME
            ));
            Some(CategoryMap::new())
        }
        Err(e) => {
            OutputFormatter::error(&e.to_string());
            let stdin = io::stdin();
            if confirm_continue_with_defaults(stdin.lock(), io::stdout()) {
                Some(CategoryMap::new())
            } else {
                None
            }
        }
    }
}

/// Loads the mapping from the configuration file next to the executable,
/// or `Ok(None)` when no such file exists.
fn load_from_exe_dir() -> Result<Option<CategoryMap>, ConfigError> {
    let Some(path) = config_file_path() else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }
    load_from_file(&path).map(Some)
}

/// Returns the expected configuration file path, next to the executable.
fn config_file_path() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_FILE_NAME)))
}

/// Loads and parses a category mapping document from a specific file.
pub fn load_from_file(path: &Path) -> Result<CategoryMap, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    serde_json::from_str(&content).map_err(|e| ConfigError::ParseFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Asks the operator whether to continue with the built-in mapping.
///
/// Blocks on one line of input. Only an explicit `y`/`yes` (any case)
/// counts as consent; anything else, including end of input, declines.
pub fn confirm_continue_with_defaults<R: BufRead, W: Write>(mut input: R, mut output: W) -> bool {
    let _ = write!(output, "Continue with the built-in categories? [y/N] ");
    let _ = output.flush();

    let mut answer = String::new();
    if input.read_line(&mut answer).is_err() {
        return false;
    }

    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_file_valid_document() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            r#"{ "pictures": [".jpg"], "papers": { "pdfs": [".pdf"] } }"#,
        )
        .expect("Failed to write config");

        let map = load_from_file(&path).expect("Failed to load config");
        assert_eq!(map.resolve("a.jpg"), Some("pictures".to_string()));
        assert_eq!(
            map.resolve("a.pdf"),
            Some(format!("papers{}pdfs", std::path::MAIN_SEPARATOR))
        );
    }

    #[test]
    fn test_load_from_file_malformed_json() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{ not json").expect("Failed to write config");

        let result = load_from_file(&path);
        assert!(matches!(result, Err(ConfigError::ParseFailed { .. })));
    }

    #[test]
    fn test_load_from_file_wrong_shape() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{ "images": 42 }"#).expect("Failed to write config");

        let result = load_from_file(&path);
        assert!(matches!(result, Err(ConfigError::ParseFailed { .. })));
    }

    #[test]
    fn test_load_from_file_missing() {
        let result = load_from_file(Path::new("/non/existent/config.json"));
        assert!(matches!(result, Err(ConfigError::ReadFailed { .. })));
    }

    #[test]
    fn test_confirm_accepts_yes_answers() {
        let mut out = Vec::new();
        assert!(confirm_continue_with_defaults("y\n".as_bytes(), &mut out));
        assert!(confirm_continue_with_defaults("Y\n".as_bytes(), &mut out));
        assert!(confirm_continue_with_defaults("yes\n".as_bytes(), &mut out));
    }

    #[test]
    fn test_confirm_declines_everything_else() {
        let mut out = Vec::new();
        assert!(!confirm_continue_with_defaults("n\n".as_bytes(), &mut out));
        assert!(!confirm_continue_with_defaults("\n".as_bytes(), &mut out));
        assert!(!confirm_continue_with_defaults("".as_bytes(), &mut out));
        assert!(!confirm_continue_with_defaults("maybe\n".as_bytes(), &mut out));
    }

    #[test]
    fn test_confirm_writes_prompt() {
        let mut out = Vec::new();
        confirm_continue_with_defaults("y\n".as_bytes(), &mut out);
        let prompt = String::from_utf8(out).expect("prompt is utf-8");
        assert!(prompt.contains("[y/N]"));
    }
}

/// Collision-safe destination path generation.
///
/// Given a destination directory and a desired filename, this module
/// computes a path that does not exist at check time. When the desired
/// name is taken, a ` (n)` counter suffix is appended before the
/// extension, continuing an existing suffix instead of stacking a second
/// one (`name (5).ext` becomes `name (6).ext`, never `name (5) (1).ext`).
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static SUFFIX_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Matches a stem that already carries a ` (n)` counter suffix.
fn suffix_pattern() -> &'static Regex {
    SUFFIX_PATTERN.get_or_init(|| {
        Regex::new(r"^(.+) \((\d+)\)$").expect("counter suffix pattern is valid")
    })
}

/// Computes a path under `dest_dir` for `desired_filename` that is free of
/// an existing filesystem entry at the moment of the check.
///
/// The original name is preserved when it is free. Otherwise candidates
/// `<base> (<counter>)<extension>` are probed with an incrementing
/// counter until one is free. For a fixed directory snapshot the result
/// is deterministic.
///
/// This is a check, not a reservation: another writer can take the
/// returned path before the caller renames onto it, in which case the
/// rename itself fails and is reported per file.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use tidyfold::safe_path::resolve_safe_path;
///
/// let path = resolve_safe_path(Path::new("/downloads/images"), "photo.jpg");
/// assert!(!path.exists());
/// ```
pub fn resolve_safe_path(dest_dir: &Path, desired_filename: &str) -> PathBuf {
    let desired = dest_dir.join(desired_filename);
    if !desired.exists() {
        return desired;
    }

    let (stem, extension) = split_filename(desired_filename);
    let (base, start) = match parse_counter_suffix(&stem) {
        Some((base, counter)) => (base, counter + 1),
        None => (stem, 1),
    };

    let mut counter = start;
    loop {
        let candidate = dest_dir.join(format!("{} ({}){}", base, counter, extension));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Extracts an existing ` (n)` suffix from a stem.
///
/// Returns the bare base and the parsed counter, or `None` when the stem
/// carries no suffix (including counters too large to represent).
fn parse_counter_suffix(stem: &str) -> Option<(String, u64)> {
    let captures = suffix_pattern().captures(stem)?;
    let counter = captures[2].parse::<u64>().ok()?;
    Some((captures[1].to_string(), counter))
}

/// Splits a filename into stem and extension at the last dot.
///
/// The extension keeps its leading dot. A dot at position zero starts no
/// extension, so dotfiles keep their full name as the stem.
fn split_filename(filename: &str) -> (String, String) {
    match filename.rfind('.') {
        Some(index) if index > 0 => (filename[..index].to_string(), filename[index..].to_string()),
        _ => (filename.to_string(), String::new()),
    }
}

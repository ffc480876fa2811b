/// Filesystem side of the organization run.
///
/// This module creates the category folder tree up front and moves single
/// files into their resolved category directory, routing the destination
/// name through the collision resolver. It never deletes anything, never
/// moves directories, and never touches file contents.
use crate::category_map::{CategoryMap, CategoryNode};
use crate::safe_path::resolve_safe_path;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur while creating category folders or moving files.
#[derive(Debug)]
pub enum OrganizeError {
    /// The base directory path is invalid or doesn't exist.
    InvalidBasePath {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to create a category directory for a reason other than it
    /// already existing.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to move a file to its category directory.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: std::io::Error,
    },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBasePath { path, source } => {
                write!(f, "Invalid base path {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::FileMoveFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "cannot rename {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
        }
    }
}

impl std::error::Error for OrganizeError {}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Moves files into category subdirectories and builds the folder tree.
pub struct FileOrganizer;

impl FileOrganizer {
    /// Creates one directory per category under `base_path`, recursively
    /// mirroring the mapping tree.
    ///
    /// Pre-existing directories are left untouched. Any other creation
    /// failure (e.g. permission denied) is surfaced so the caller can
    /// abort before any file is moved.
    pub fn create_category_dirs(base_path: &Path, map: &CategoryMap) -> OrganizeResult<()> {
        if !base_path.exists() {
            return Err(OrganizeError::InvalidBasePath {
                path: base_path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "base path does not exist",
                ),
            });
        }

        for (name, node) in map.entries() {
            let dir_path = base_path.join(name);
            Self::create_dir_idempotent(&dir_path)?;

            if let CategoryNode::Subcategories(subtree) = node {
                Self::create_category_dirs(&dir_path, subtree)?;
            }
        }

        Ok(())
    }

    /// Creates a single directory, absorbing only the already-exists case.
    fn create_dir_idempotent(path: &Path) -> OrganizeResult<()> {
        match fs::create_dir(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(OrganizeError::DirectoryCreationFailed {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    /// Moves a file into a category directory within the base path.
    ///
    /// `category_path` is the relative folder path returned by the
    /// classifier (e.g. `"documents/pdfs"` or `"others"`). The destination
    /// directory is created when missing, and the destination filename is
    /// routed through [`resolve_safe_path`] so an occupied name gets a
    /// ` (n)` counter suffix instead of being overwritten.
    ///
    /// Returns the path the file ended up at.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use tidyfold::organizer::FileOrganizer;
    ///
    /// let moved_to = FileOrganizer::move_to_category(
    ///     Path::new("/downloads"),
    ///     Path::new("/downloads/photo.png"),
    ///     "images",
    /// );
    /// ```
    pub fn move_to_category(
        base_path: &Path,
        file_path: &Path,
        category_path: &str,
    ) -> OrganizeResult<PathBuf> {
        if !base_path.exists() {
            return Err(OrganizeError::InvalidBasePath {
                path: base_path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "base path does not exist",
                ),
            });
        }

        let dest_dir = base_path.join(category_path);
        if let Err(e) = fs::create_dir_all(&dest_dir)
            && e.kind() != io::ErrorKind::AlreadyExists
        {
            return Err(OrganizeError::DirectoryCreationFailed {
                path: dest_dir,
                source: e,
            });
        }

        let file_name = file_path
            .file_name()
            .ok_or_else(|| OrganizeError::FileMoveFailure {
                source: file_path.to_path_buf(),
                destination: dest_dir.clone(),
                source_error: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "file has no name component",
                ),
            })?;

        let destination_path = resolve_safe_path(&dest_dir, &file_name.to_string_lossy());

        fs::rename(file_path, &destination_path).map_err(|e| OrganizeError::FileMoveFailure {
            source: file_path.to_path_buf(),
            destination: destination_path.clone(),
            source_error: e,
        })?;

        Ok(destination_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_create_category_dirs_mirrors_tree() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        FileOrganizer::create_category_dirs(base_path, &CategoryMap::new())
            .expect("Failed to create category dirs");

        assert!(base_path.join("images").is_dir());
        assert!(base_path.join("documents").is_dir());
        assert!(base_path.join("documents").join("pdfs").is_dir());
        assert!(base_path.join("documents").join("sheets").is_dir());
        assert!(base_path.join("others").is_dir());
    }

    #[test]
    fn test_create_category_dirs_is_idempotent() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        fs::create_dir(base_path.join("images")).expect("Failed to pre-create directory");

        FileOrganizer::create_category_dirs(base_path, &CategoryMap::new())
            .expect("First pass failed");
        FileOrganizer::create_category_dirs(base_path, &CategoryMap::new())
            .expect("Second pass failed");
    }

    #[test]
    fn test_create_category_dirs_invalid_base_path() {
        let result =
            FileOrganizer::create_category_dirs(Path::new("/non/existent"), &CategoryMap::new());
        assert!(matches!(
            result,
            Err(OrganizeError::InvalidBasePath { .. })
        ));
    }

    #[test]
    fn test_move_to_category_creates_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        let file_path = base_path.join("test.txt");
        fs::write(&file_path, "test content").expect("Failed to write test file");

        let moved_to = FileOrganizer::move_to_category(base_path, &file_path, "texts")
            .expect("Failed to move file");

        assert!(!file_path.exists());
        assert_eq!(moved_to, base_path.join("texts").join("test.txt"));
        assert!(moved_to.exists());
    }

    #[test]
    fn test_move_to_category_nested_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        let file_path = base_path.join("report.pdf");
        fs::write(&file_path, "pdf data").expect("Failed to write test file");

        let category = format!("documents{}pdfs", std::path::MAIN_SEPARATOR);
        let moved_to = FileOrganizer::move_to_category(base_path, &file_path, &category)
            .expect("Failed to move file");

        assert_eq!(
            moved_to,
            base_path.join("documents").join("pdfs").join("report.pdf")
        );
        assert!(moved_to.exists());
    }

    #[test]
    fn test_move_to_category_resolves_collision() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        let occupied = base_path.join("images");
        fs::create_dir(&occupied).expect("Failed to create category dir");
        fs::write(occupied.join("photo.jpg"), "already here").expect("Failed to write");

        let file_path = base_path.join("photo.jpg");
        fs::write(&file_path, "new photo").expect("Failed to write test file");

        let moved_to = FileOrganizer::move_to_category(base_path, &file_path, "images")
            .expect("Failed to move file");

        assert_eq!(moved_to, occupied.join("photo (1).jpg"));
        assert!(moved_to.exists());
        assert_eq!(
            fs::read_to_string(occupied.join("photo.jpg")).expect("read"),
            "already here"
        );
    }

    #[test]
    fn test_move_to_category_missing_source_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        let result =
            FileOrganizer::move_to_category(base_path, &base_path.join("gone.txt"), "texts");
        assert!(matches!(
            result,
            Err(OrganizeError::FileMoveFailure { .. })
        ));
    }

    #[test]
    fn test_move_to_category_invalid_base_path() {
        let result = FileOrganizer::move_to_category(
            Path::new("/non/existent/path"),
            Path::new("/some/file.txt"),
            "texts",
        );
        assert!(result.is_err());
    }
}

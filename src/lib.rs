//! tidyfold - tidy a directory into category subfolders
//!
//! This library classifies files by extension against a configurable,
//! possibly nested category mapping, computes collision-free destination
//! paths, and moves files into the matching category folders. A dry-run
//! mode previews the moves without touching the filesystem.

pub mod category_map;
pub mod cli;
pub mod config;
pub mod organizer;
pub mod output;
pub mod safe_path;

pub use category_map::{CategoryMap, CategoryNode, FALLBACK_CATEGORY};
pub use config::ConfigError;
pub use organizer::{FileOrganizer, OrganizeError};
pub use safe_path::resolve_safe_path;

pub use cli::{Cli, run_cli};

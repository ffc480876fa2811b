/// Extension-based file classification against a nested category mapping.
///
/// A [`CategoryMap`] is a tree of category names. Each node is either a leaf
/// holding the file extensions that belong to the category, or a subtree of
/// further categories. Classification walks the tree in declaration order
/// and returns the relative folder path of the first matching leaf
/// (e.g. `"documents/pdfs"`).
///
/// # Examples
///
/// ```
/// use tidyfold::category_map::CategoryMap;
///
/// let map = CategoryMap::new();
/// assert_eq!(map.resolve("photo.JPG"), Some("images".to_string()));
/// assert_eq!(map.resolve("unknownfile.xyz"), None);
/// ```
use serde::Deserialize;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use std::fmt;
use std::path::MAIN_SEPARATOR;

/// The catch-all category for files no mapping entry matches.
pub const FALLBACK_CATEGORY: &str = "others";

/// A single node of the category tree.
///
/// Leaves hold lowercase extensions including the leading dot; an empty
/// leaf matches nothing and only reserves a folder name. Internal nodes
/// hold a nested [`CategoryMap`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CategoryNode {
    /// Leaf: the extensions routed to this category.
    Extensions(Vec<String>),
    /// Internal node: a nested map of sub-categories.
    Subcategories(CategoryMap),
}

impl CategoryNode {
    /// Lowercases leaf extensions so matching stays case-insensitive even
    /// when a configuration file spells them in upper case.
    fn normalized(self) -> Self {
        match self {
            CategoryNode::Extensions(exts) => {
                CategoryNode::Extensions(exts.into_iter().map(|e| e.to_lowercase()).collect())
            }
            other => other,
        }
    }
}

/// An ordered mapping of category names to [`CategoryNode`]s.
///
/// Entry order is declaration order: for the built-in mapping this is the
/// order the entries are added in [`CategoryMap::new`], and for a loaded
/// JSON document it is the key order of the document. When an extension
/// appears in more than one leaf, the first entry in that order wins.
/// The map is built once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMap {
    entries: Vec<(String, CategoryNode)>,
}

impl CategoryMap {
    /// Creates the built-in standard category mapping.
    pub fn new() -> Self {
        let documents = Self::empty()
            .with_extensions("pdfs", &[".pdf"])
            .with_extensions("docs", &[".doc", ".docx", ".odt"])
            .with_extensions("sheets", &[".csv", ".xlsx", ".ods"])
            .with_extensions("powerpoints", &[".ppt", ".pptx"]);

        Self::empty()
            .with_extensions(
                "images",
                &[".jpg", ".jpeg", ".png", ".webp", ".psd", ".svg", ".gif"],
            )
            .with_extensions("videos", &[".mp4", ".mkv", ".avi", ".mov", ".wmv", ".webm"])
            .with_extensions("audios", &[".mp3", ".wav"])
            .with_subcategories("documents", documents)
            .with_extensions("apps", &[".exe", ".msi", ".deb", ".rpm"])
            .with_extensions(
                "texts",
                &[".txt", ".md", ".json", ".xml", ".yaml", ".yml", ".log"],
            )
            .with_extensions(
                "compressed",
                &[".zip", ".rar", ".7z", ".tar", ".gz", ".bz2"],
            )
            .with_extensions("fonts", &[".ttf", ".otf", ".woff", ".woff2"])
            .with_extensions(FALLBACK_CATEGORY, &[])
    }

    /// Creates an empty mapping, useful as a builder starting point.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a leaf category holding the given extensions.
    ///
    /// Extensions are stored lowercased, including the leading dot.
    pub fn with_extensions(mut self, name: &str, extensions: &[&str]) -> Self {
        let exts = extensions.iter().map(|e| e.to_lowercase()).collect();
        self.entries
            .push((name.to_string(), CategoryNode::Extensions(exts)));
        self
    }

    /// Appends an internal category holding a nested sub-mapping.
    pub fn with_subcategories(mut self, name: &str, subtree: CategoryMap) -> Self {
        self.entries
            .push((name.to_string(), CategoryNode::Subcategories(subtree)));
        self
    }

    /// Returns the entries of this map in declaration order.
    pub fn entries(&self) -> &[(String, CategoryNode)] {
        &self.entries
    }

    /// Returns true when the mapping has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves the category folder path for a filename.
    ///
    /// The extension is extracted case-insensitively. Nested matches are
    /// joined with the platform path separator, root to leaf. Returns
    /// `None` when no leaf anywhere in the tree holds the extension; the
    /// caller maps that to [`FALLBACK_CATEGORY`].
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::MAIN_SEPARATOR;
    /// use tidyfold::category_map::CategoryMap;
    ///
    /// let map = CategoryMap::new();
    /// assert_eq!(
    ///     map.resolve("report.pdf"),
    ///     Some(format!("documents{}pdfs", MAIN_SEPARATOR))
    /// );
    /// ```
    pub fn resolve(&self, filename: &str) -> Option<String> {
        self.resolve_extension(&file_extension(filename))
    }

    /// Resolves an already-extracted extension against the tree.
    fn resolve_extension(&self, extension: &str) -> Option<String> {
        for (name, node) in &self.entries {
            match node {
                CategoryNode::Extensions(exts) => {
                    if exts.iter().any(|e| e == extension) {
                        return Some(name.clone());
                    }
                }
                CategoryNode::Subcategories(subtree) => {
                    if let Some(sub_path) = subtree.resolve_extension(extension) {
                        return Some(format!("{}{}{}", name, MAIN_SEPARATOR, sub_path));
                    }
                }
            }
        }
        None
    }
}

impl Default for CategoryMap {
    fn default() -> Self {
        Self::new()
    }
}

impl<'de> Deserialize<'de> for CategoryMap {
    /// Deserializes a JSON object into a [`CategoryMap`], preserving the
    /// key order of the document and rejecting duplicate sibling names.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CategoryMapVisitor;

        impl<'de> Visitor<'de> for CategoryMapVisitor {
            type Value = CategoryMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of category names to extension arrays or nested maps")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries: Vec<(String, CategoryNode)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));

                while let Some((name, node)) = access.next_entry::<String, CategoryNode>()? {
                    if entries.iter().any(|(existing, _)| existing == &name) {
                        return Err(de::Error::custom(format!(
                            "duplicate category name '{}'",
                            name
                        )));
                    }
                    entries.push((name, node.normalized()));
                }

                Ok(CategoryMap { entries })
            }
        }

        deserializer.deserialize_map(CategoryMapVisitor)
    }
}

/// Extracts the lowercased extension of a filename, including the leading
/// dot, or an empty string when the name has none.
///
/// The split happens at the last dot, so `archive.tar.gz` yields `.gz`.
/// A leading dot does not start an extension: `.gitignore` yields `""`.
pub fn file_extension(filename: &str) -> String {
    match filename.rfind('.') {
        Some(index) if index > 0 => filename[index..].to_lowercase(),
        _ => String::new(),
    }
}

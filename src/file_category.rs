//! File categorization by extension.
//!
//! Maps file extensions to the six destination categories used when sorting
//! a downloads directory. Classification is purely string-based: the
//! extension is taken from the file name, lower-cased, and looked up in a
//! fixed registry. Unknown or missing extensions fall back to
//! [`Category::Other`].
//!
//! # Examples
//!
//! ```
//! use downsort::file_category::{Category, ExtensionRegistry};
//!
//! let registry = ExtensionRegistry::default();
//! assert_eq!(registry.classify("vacation.JPG"), Category::ImagesVideos);
//! assert_eq!(registry.classify("notes.txt"), Category::Documents);
//! assert_eq!(registry.classify("README"), Category::Other);
//! ```

use serde::Serialize;
use std::collections::HashMap;

/// The closed set of destination categories.
///
/// Every entry in a run maps to exactly one of these. `Other` is the
/// catch-all for unregistered extensions and the only category directories
/// are ever assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Pictures and video files, sharing one destination.
    ImagesVideos,
    /// Audio files (MP3, FLAC, etc.).
    Audio,
    /// Installers and packages (EXE, MSI, DEB, etc.).
    Setup,
    /// Documents and office files.
    Documents,
    /// Archives (ZIP, RAR, etc.).
    Compressed,
    /// Everything else, including all directories.
    Other,
}

impl Category {
    /// All categories in stable display order.
    pub const ALL: [Category; 6] = [
        Category::ImagesVideos,
        Category::Audio,
        Category::Setup,
        Category::Documents,
        Category::Compressed,
        Category::Other,
    ];

    /// Human-readable label for display.
    ///
    /// # Examples
    ///
    /// ```
    /// use downsort::file_category::Category;
    ///
    /// assert_eq!(Category::ImagesVideos.label(), "Images/Videos");
    /// assert_eq!(Category::Other.label(), "Other");
    /// ```
    pub fn label(self) -> &'static str {
        match self {
            Category::ImagesVideos => "Images/Videos",
            Category::Audio => "Audio",
            Category::Setup => "Setup Files",
            Category::Documents => "Documents",
            Category::Compressed => "Compressed",
            Category::Other => "Other",
        }
    }
}

/// Splits a file name into stem and extension.
///
/// The extension is the substring from the final `.` (inclusive) to the end
/// of the name. A dot that is the first or last character of the name does
/// not begin an extension, so `.bashrc` and `archive.` both have an empty
/// extension and `photo.backup.png` splits as `("photo.backup", ".png")`.
pub(crate) fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(i) if i > 0 && i < name.len() - 1 => (&name[..i], &name[i..]),
        _ => (name, ""),
    }
}

/// Static mapping from dot-prefixed, lower-cased extensions to categories.
///
/// Built once and never mutated during a run. Lookups are case-insensitive
/// because the queried extension is lower-cased before the lookup.
#[derive(Debug, Clone)]
pub struct ExtensionRegistry {
    extensions: HashMap<String, Category>,
}

impl ExtensionRegistry {
    /// Creates a registry with the standard extension sets.
    pub fn new() -> Self {
        let mut registry = Self {
            extensions: HashMap::new(),
        };
        registry.populate_standard_mappings();
        registry
    }

    fn populate_standard_mappings(&mut self) {
        const IMAGES_VIDEOS: &[&str] = &[
            ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".svg", ".webp", ".heic", ".raw",
            ".mp4", ".avi", ".mkv", ".mov", ".wmv", ".flv", ".webm", ".mpeg", ".mpg", ".3gp",
        ];
        const AUDIO: &[&str] = &[".mp3", ".wav", ".flac", ".aac", ".ogg", ".wma", ".m4a"];
        const SETUP: &[&str] = &[".exe", ".msi", ".dmg", ".pkg", ".deb"];
        const DOCUMENTS: &[&str] = &[
            ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".txt",
        ];
        const COMPRESSED: &[&str] = &[".zip", ".rar", ".7z", ".tar", ".gz"];

        let sets = [
            (IMAGES_VIDEOS, Category::ImagesVideos),
            (AUDIO, Category::Audio),
            (SETUP, Category::Setup),
            (DOCUMENTS, Category::Documents),
            (COMPRESSED, Category::Compressed),
        ];
        for (extensions, category) in sets {
            for ext in extensions {
                self.add_extension(ext, category);
            }
        }
    }

    /// Adds or replaces a single extension mapping.
    ///
    /// The extension must include its leading dot; it is stored lower-cased.
    pub fn add_extension(&mut self, ext: &str, category: Category) {
        self.extensions.insert(ext.to_lowercase(), category);
    }

    /// Maps a dot-prefixed extension to its category, if registered.
    ///
    /// # Examples
    ///
    /// ```
    /// use downsort::file_category::{Category, ExtensionRegistry};
    ///
    /// let registry = ExtensionRegistry::default();
    /// assert_eq!(registry.extension_category(".pdf"), Some(Category::Documents));
    /// assert_eq!(registry.extension_category(".xyz"), None);
    /// ```
    pub fn extension_category(&self, ext: &str) -> Option<Category> {
        self.extensions.get(&ext.to_lowercase()).copied()
    }

    /// Classifies a file name into a category.
    ///
    /// Pure and total: any input yields a category, with `Other` for names
    /// whose extension is missing or unregistered. Directories must not be
    /// passed here; they are `Other` by rule, regardless of any suffix in
    /// their name.
    pub fn classify(&self, name: &str) -> Category {
        let (_, ext) = split_name(name);
        if ext.is_empty() {
            return Category::Other;
        }
        self.extension_category(ext).unwrap_or(Category::Other)
    }
}

impl Default for ExtensionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

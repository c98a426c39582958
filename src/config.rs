//! TOML configuration for the CLI: source, mode, per-category destinations,
//! and optional exclusion filters.
//!
//! Everything here is optional: command-line flags override file values,
//! and a missing file simply means defaults. Filters keep entries out of a
//! run entirely (partial downloads, OS metadata files); with no
//! configuration they exclude nothing.
//!
//! # Configuration File Format
//!
//! ```toml
//! source = "/home/me/Downloads"
//! mode = "move"
//!
//! [destinations]
//! images_videos = "/sorted/media"
//! audio = "/sorted/audio"
//! setup = "/sorted/installers"
//! documents = "/sorted/documents"
//! compressed = "/sorted/archives"
//! other = "/sorted/other"
//!
//! [filters]
//! skip_hidden = false
//!
//! [filters.exclude]
//! filenames = [".DS_Store", "Thumbs.db"]
//! patterns = ["*.part"]
//! extensions = ["crdownload"]
//! regex = []
//! ```

use crate::file_category::{Category, split_name};
use crate::run::{DestinationMap, ValidationError};
use crate::transfer::TransferMode;
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors from loading or compiling a configuration file.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// Invalid glob pattern in the filter rules.
    InvalidGlobPattern(String),
    /// Invalid regex pattern with the actual compile error.
    InvalidRegexPattern { pattern: String, reason: String },
    /// IO error while reading the configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid glob pattern '{}'", pattern)
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level configuration file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizeConfig {
    /// Source directory to organize.
    pub source: Option<PathBuf>,
    /// Transfer mode, `"move"` or `"copy"`.
    pub mode: Option<TransferMode>,
    /// Destination directory per category.
    #[serde(default)]
    pub destinations: Destinations,
    /// Rules for keeping entries out of a run.
    #[serde(default)]
    pub filters: FilterRules,
}

impl OrganizeConfig {
    /// File name probed in the source directory when no `--config` path is
    /// given.
    pub const DEFAULT_FILE_NAME: &'static str = ".downsort.toml";

    /// Loads and parses a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        toml::from_str(&raw).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }
}

/// Raw per-category destinations as read from the file. Every category must
/// end up set (here or via flags) before a run can start.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Destinations {
    pub images_videos: Option<PathBuf>,
    pub audio: Option<PathBuf>,
    pub setup: Option<PathBuf>,
    pub documents: Option<PathBuf>,
    pub compressed: Option<PathBuf>,
    pub other: Option<PathBuf>,
}

impl Destinations {
    /// Builds the complete [`DestinationMap`], rejecting the first category
    /// without a configured destination.
    pub fn resolve(&self) -> Result<DestinationMap, ValidationError> {
        let require = |value: &Option<PathBuf>, category: Category| {
            value
                .clone()
                .ok_or(ValidationError::DestinationUnset { category })
        };
        Ok(DestinationMap {
            images_videos: require(&self.images_videos, Category::ImagesVideos)?,
            audio: require(&self.audio, Category::Audio)?,
            setup: require(&self.setup, Category::Setup)?,
            documents: require(&self.documents, Category::Documents)?,
            compressed: require(&self.compressed, Category::Compressed)?,
            other: require(&self.other, Category::Other)?,
        })
    }
}

/// Filter rules as written in the configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterRules {
    /// Skip entries whose name starts with a dot. Off by default: hidden
    /// files are organized like everything else unless asked otherwise.
    #[serde(default)]
    pub skip_hidden: bool,
    #[serde(default)]
    pub exclude: ExcludeRules,
}

/// Rules for excluding entries from a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact names to exclude (e.g. ".DS_Store", "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,
    /// Glob patterns matched against the entry name (e.g. "*.part").
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Extensions to exclude, with or without the leading dot.
    #[serde(default)]
    pub extensions: Vec<String>,
    /// Regex patterns matched against the entry name.
    #[serde(default)]
    pub regex: Vec<String>,
}

impl FilterRules {
    /// Compiles the raw rules, validating every pattern.
    pub fn compile(&self) -> Result<CompiledFilters, ConfigError> {
        let mut patterns = Vec::with_capacity(self.exclude.patterns.len());
        for raw in &self.exclude.patterns {
            let pattern = Pattern::new(raw)
                .map_err(|_| ConfigError::InvalidGlobPattern(raw.clone()))?;
            patterns.push(pattern);
        }

        let mut regexes = Vec::with_capacity(self.exclude.regex.len());
        for raw in &self.exclude.regex {
            let regex = Regex::new(raw).map_err(|e| ConfigError::InvalidRegexPattern {
                pattern: raw.clone(),
                reason: e.to_string(),
            })?;
            regexes.push(regex);
        }

        let extensions = self
            .exclude
            .extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .collect();

        Ok(CompiledFilters {
            skip_hidden: self.skip_hidden,
            filenames: self.exclude.filenames.iter().cloned().collect(),
            patterns,
            extensions,
            regexes,
        })
    }
}

/// Compiled, ready-to-apply filters. The default excludes nothing.
#[derive(Debug, Clone, Default)]
pub struct CompiledFilters {
    skip_hidden: bool,
    filenames: HashSet<String>,
    patterns: Vec<Pattern>,
    extensions: HashSet<String>,
    regexes: Vec<Regex>,
}

impl CompiledFilters {
    /// Whether an entry with this name should be left out of the run.
    pub fn should_skip(&self, name: &str) -> bool {
        if self.skip_hidden && name.starts_with('.') {
            return true;
        }
        if self.filenames.contains(name) {
            return true;
        }
        let (_, ext) = split_name(name);
        if !ext.is_empty() && self.extensions.contains(&ext[1..].to_lowercase()) {
            return true;
        }
        if self.patterns.iter().any(|p| p.matches(name)) {
            return true;
        }
        self.regexes.iter().any(|r| r.is_match(name))
    }
}

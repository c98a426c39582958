//! Read-only per-category size and count statistics.
//!
//! Unlike a run, which touches only the top level of the source, the
//! scanner walks the entire subtree. It never mutates anything and is meant
//! to be invoked while no run is active (initial display, manual rescan,
//! post-run refresh); mid-run it is only a best-effort snapshot.

use crate::file_category::{Category, ExtensionRegistry};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Scan failures. Only a missing source is fatal to a scan; per-entry stat
/// failures are skipped silently.
#[derive(Debug)]
pub enum ScanError {
    SourceMissing { path: PathBuf },
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceMissing { path } => {
                write!(f, "Source folder does not exist: {}", path.display())
            }
        }
    }
}

impl std::error::Error for ScanError {}

/// Size and count totals for one category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryLine {
    pub category: Category,
    pub files: u64,
    pub bytes: u64,
}

/// Aggregate statistics for a source tree.
///
/// Contains one line per category (all six, in [`Category::ALL`] order),
/// so the per-category sums always add up to the totals.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryStatsReport {
    pub source: PathBuf,
    pub generated_at: DateTime<Utc>,
    pub total_files: u64,
    pub total_bytes: u64,
    pub categories: Vec<CategoryLine>,
}

impl CategoryStatsReport {
    /// Percent of the total size held by `bytes`, 0 when the tree is empty.
    pub fn percent_of_total(&self, bytes: u64) -> f64 {
        if self.total_bytes > 0 {
            bytes as f64 / self.total_bytes as f64 * 100.0
        } else {
            0.0
        }
    }
}

/// Walks `source` recursively and aggregates file sizes and counts per
/// category.
///
/// Files only; directories contribute nothing themselves. Entries that
/// cannot be read or stat'ed are skipped without failing the scan. A
/// missing source is reported as [`ScanError::SourceMissing`] rather than
/// an empty report.
pub fn scan(source: &Path) -> Result<CategoryStatsReport, ScanError> {
    if !source.exists() {
        return Err(ScanError::SourceMissing {
            path: source.to_path_buf(),
        });
    }

    let registry = ExtensionRegistry::default();
    let mut files = [0u64; Category::ALL.len()];
    let mut bytes = [0u64; Category::ALL.len()];
    let mut total_files = 0u64;
    let mut total_bytes = 0u64;

    for entry in WalkDir::new(source).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let size = match entry.metadata() {
            Ok(metadata) => metadata.len(),
            Err(_) => continue,
        };
        let name = entry.file_name().to_string_lossy();
        let category = registry.classify(&name);
        let slot = Category::ALL
            .iter()
            .position(|c| *c == category)
            .unwrap_or(Category::ALL.len() - 1);
        files[slot] += 1;
        bytes[slot] += size;
        total_files += 1;
        total_bytes += size;
    }

    let categories = Category::ALL
        .iter()
        .enumerate()
        .map(|(i, category)| CategoryLine {
            category: *category,
            files: files[i],
            bytes: bytes[i],
        })
        .collect();

    Ok(CategoryStatsReport {
        source: source.to_path_buf(),
        generated_at: Utc::now(),
        total_files,
        total_bytes,
        categories,
    })
}

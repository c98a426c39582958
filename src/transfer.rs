//! Collision-free target resolution and move/copy execution.
//!
//! This module owns the two filesystem-touching pieces of a run: picking a
//! target path that does not already exist in the destination directory, and
//! performing the actual move or copy of one file or one directory tree.
//! Errors are returned to the caller per item; nothing here aborts a run.

use crate::file_category::split_name;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Whether entries are moved out of the source or duplicated into the
/// destinations. Fixed for the duration of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransferMode {
    Move,
    Copy,
}

/// Errors from a single transfer. Recoverable at run level: the offending
/// item is logged and the run moves on to the next entry.
#[derive(Debug)]
pub enum TransferError {
    /// The source entry disappeared between enumeration and transfer.
    SourceMissing { path: PathBuf },
    /// Something already occupies the resolved target path. Resolution
    /// guarantees a free path at resolution time, so this indicates an
    /// external writer claimed the name in between; it is a failure, never
    /// an overwrite.
    TargetExists { path: PathBuf },
    /// The move itself failed (permissions, disk full, ...).
    MoveFailed {
        source_path: PathBuf,
        target: PathBuf,
        source: io::Error,
    },
    /// The copy failed. For directory trees the partially-copied target has
    /// already been removed when this is returned.
    CopyFailed {
        source_path: PathBuf,
        target: PathBuf,
        source: io::Error,
    },
}

impl std::fmt::Display for TransferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceMissing { path } => {
                write!(f, "source no longer exists: {}", path.display())
            }
            Self::TargetExists { path } => {
                write!(f, "target already exists: {}", path.display())
            }
            Self::MoveFailed {
                source_path,
                target,
                source,
            } => write!(
                f,
                "failed to move {} to {}: {}",
                source_path.display(),
                target.display(),
                source
            ),
            Self::CopyFailed {
                source_path,
                target,
                source,
            } => write!(
                f,
                "failed to copy {} to {}: {}",
                source_path.display(),
                target.display(),
                source
            ),
        }
    }
}

impl std::error::Error for TransferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MoveFailed { source, .. } | Self::CopyFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Resolves a target path in `dest_dir` that does not currently exist.
///
/// If `dest_dir/name` is free it is returned unchanged. Otherwise candidates
/// get a numeric suffix before the extension (`report(1).pdf`,
/// `report(2).pdf`, ... for files, `backup(1)`, `backup(2)`, ... for
/// directories), counting up from 1 until a free name is found.
///
/// The existence check here and the later transfer are not atomic: an
/// external writer can claim the returned name in between. Single-writer,
/// single-pass usage only; [`transfer`] refuses to overwrite if it happens.
///
/// # Examples
///
/// ```no_run
/// use downsort::transfer::resolve_target;
/// use std::path::Path;
///
/// let target = resolve_target(Path::new("/sorted/docs"), "report.pdf", false);
/// assert!(!target.exists());
/// ```
pub fn resolve_target(dest_dir: &Path, name: &str, is_directory: bool) -> PathBuf {
    let first = dest_dir.join(name);
    if !first.exists() {
        return first;
    }

    let (stem, ext) = if is_directory {
        (name, "")
    } else {
        split_name(name)
    };

    let mut counter: u64 = 1;
    loop {
        let candidate = dest_dir.join(format!("{stem}({counter}){ext}"));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Moves or copies one source entry to an already-resolved target path.
///
/// Directories relocate or duplicate as whole subtrees; files preserve
/// content and modification time. The target must not exist; a pre-existing
/// entry at the exact path fails the transfer rather than overwriting it.
/// On failure the source is left as it was (directory copies clean up the
/// partial target tree before returning).
pub fn transfer(
    source: &Path,
    target: &Path,
    mode: TransferMode,
    is_directory: bool,
) -> Result<(), TransferError> {
    if !source.exists() {
        return Err(TransferError::SourceMissing {
            path: source.to_path_buf(),
        });
    }
    if target.exists() {
        return Err(TransferError::TargetExists {
            path: target.to_path_buf(),
        });
    }

    match mode {
        TransferMode::Move => move_entry(source, target, is_directory),
        TransferMode::Copy => {
            if is_directory {
                copy_tree(source, target).map_err(|e| TransferError::CopyFailed {
                    source_path: source.to_path_buf(),
                    target: target.to_path_buf(),
                    source: e,
                })
            } else {
                copy_file(source, target).map_err(|e| TransferError::CopyFailed {
                    source_path: source.to_path_buf(),
                    target: target.to_path_buf(),
                    source: e,
                })
            }
        }
    }
}

/// EXDEV on POSIX, ERROR_NOT_SAME_DEVICE on Windows.
fn is_cross_device(err: &io::Error) -> bool {
    matches!(err.raw_os_error(), Some(18) | Some(17))
}

fn move_entry(source: &Path, target: &Path, is_directory: bool) -> Result<(), TransferError> {
    match fs::rename(source, target) {
        Ok(()) => Ok(()),
        Err(err) if is_cross_device(&err) => {
            // Rename cannot cross filesystems; fall back to copy + delete.
            let copied = if is_directory {
                copy_tree(source, target)
            } else {
                copy_file(source, target)
            };
            match copied {
                Ok(()) => {
                    let removed = if is_directory {
                        fs::remove_dir_all(source)
                    } else {
                        fs::remove_file(source)
                    };
                    removed.map_err(|e| TransferError::MoveFailed {
                        source_path: source.to_path_buf(),
                        target: target.to_path_buf(),
                        source: e,
                    })
                }
                Err(copy_err) => Err(TransferError::MoveFailed {
                    source_path: source.to_path_buf(),
                    target: target.to_path_buf(),
                    source: copy_err,
                }),
            }
        }
        Err(err) => Err(TransferError::MoveFailed {
            source_path: source.to_path_buf(),
            target: target.to_path_buf(),
            source: err,
        }),
    }
}

/// Copies one file, carrying the source's modification time onto the copy.
fn copy_file(source: &Path, target: &Path) -> io::Result<()> {
    fs::copy(source, target)?;
    if let Ok(metadata) = fs::metadata(source)
        && let Ok(modified) = metadata.modified()
    {
        // Timestamp preservation is best-effort; the content is already safe.
        if let Ok(file) = fs::OpenOptions::new().write(true).open(target) {
            let _ = file.set_modified(modified);
        }
    }
    Ok(())
}

/// Deep-copies a directory tree, whole-or-nothing: if any member fails, the
/// partially-copied target is removed before the error is returned.
fn copy_tree(source: &Path, target: &Path) -> io::Result<()> {
    if let Err(err) = copy_tree_inner(source, target) {
        let _ = fs::remove_dir_all(target);
        return Err(err);
    }
    Ok(())
}

fn copy_tree_inner(source: &Path, target: &Path) -> io::Result<()> {
    fs::create_dir_all(target)?;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let path = entry.path();
        let child_target = target.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree_inner(&path, &child_target)?;
        } else {
            copy_file(&path, &child_target)?;
        }
    }
    Ok(())
}

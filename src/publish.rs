//! Crash-safe file publication.
//!
//! Content is written to `<dest>.tmp`, synced, and renamed over `<dest>`.
//! With [`Backup::Keep`] the previous file is first renamed to `<dest>.old`
//! (a single generation). At every point the destination is absent, fully
//! old, or fully new; a crash before the final rename leaves a stray `.tmp`
//! that the next publish overwrites.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const TMP_SUFFIX: &str = ".tmp";
const OLD_SUFFIX: &str = ".old";

/// Whether a publish keeps the replaced file around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backup {
    /// Rename the previous destination to `<dest>.old`.
    Keep,
    /// Replace the destination directly.
    Skip,
}

impl From<bool> for Backup {
    fn from(keep: bool) -> Self {
        if keep {
            Backup::Keep
        } else {
            Backup::Skip
        }
    }
}

/// Atomically replaces `destination` with `content`, creating its parent
/// directory when missing.
pub fn publish(content: &[u8], destination: &Path, backup: Backup) -> Result<()> {
    if let Some(parent) = destination
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        if !parent.is_dir() {
            tracing::info!(directory = %parent.display(), "directory does not exist, creating");
        }
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let tmp_path = tmp_path(destination);
    tracing::info!(path = %tmp_path.display(), "writing new file");
    if let Err(err) = write_synced(&tmp_path, content) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }

    if backup == Backup::Keep && destination.is_file() {
        let old_path = old_path(destination);
        tracing::info!(
            from = %destination.display(),
            to = %old_path.display(),
            "moving previous file"
        );
        fs::rename(destination, &old_path).with_context(|| {
            format!(
                "failed to move {} to {}",
                destination.display(),
                old_path.display()
            )
        })?;
    }

    tracing::info!(
        from = %tmp_path.display(),
        to = %destination.display(),
        "moving new file into place"
    );
    fs::rename(&tmp_path, destination).with_context(|| {
        format!(
            "failed to move {} to {}",
            tmp_path.display(),
            destination.display()
        )
    })?;

    Ok(())
}

/// Transient write target, `<dest>.tmp`.
pub fn tmp_path(destination: &Path) -> PathBuf {
    with_suffix(destination, TMP_SUFFIX)
}

/// Single-generation backup, `<dest>.old`.
pub fn old_path(destination: &Path) -> PathBuf {
    with_suffix(destination, OLD_SUFFIX)
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

fn write_synced(path: &Path, content: &[u8]) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    file.write_all(content)
        .with_context(|| format!("failed to write {}", path.display()))?;
    file.sync_all()
        .with_context(|| format!("failed to sync {}", path.display()))?;
    Ok(())
}

/*!
 * Reconstruction marker and project progress.
 *
 * A rebuilt script carries a marker comment; progress tracking only looks
 * for that substring.
 */

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use log::debug;
use serde::Serialize;

use crate::errors::FileError;
use crate::file_utils::FileManager;

/// Marker substring written at the top of every reconstructed script
pub const RECONSTRUCTION_MARKER: &str = "# Fichier reconstruit après traduction par RenExtract le";

/// Full marker line for a given time
pub fn marker_line(timestamp: &DateTime<Local>) -> String {
    format!(
        "{} {}",
        RECONSTRUCTION_MARKER,
        timestamp.format("%d/%m/%Y à %H:%M:%S")
    )
}

/// Whether a script has already been reconstructed. Unreadable files are
/// reported as not reconstructed.
pub fn is_reconstructed<P: AsRef<Path>>(path: P) -> bool {
    match FileManager::read_text(path.as_ref()) {
        Ok(decoded) => decoded.content.contains(RECONSTRUCTION_MARKER),
        Err(e) => {
            debug!("Treating {:?} as pending: {}", path.as_ref(), e);
            false
        }
    }
}

/// Put the marker line at the top of a script unless it is already there.
///
/// Returns whether the file was changed.
pub fn stamp_reconstructed<P: AsRef<Path>>(
    path: P,
    timestamp: &DateTime<Local>,
) -> Result<bool, FileError> {
    let path = path.as_ref();
    let decoded = FileManager::read_text(path)?;
    if decoded.content.contains(RECONSTRUCTION_MARKER) {
        return Ok(false);
    }

    let newline = if decoded.content.contains("\r\n") { "\r\n" } else { "\n" };
    let stamped = format!("{}{}{}", marker_line(timestamp), newline, decoded.content);
    FileManager::write_atomic(path, &decoded.with_original_bom(&stamped))?;
    Ok(true)
}

/// Completion state of the scripts in a project tree
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectProgress {
    pub total: usize,
    pub completed: usize,
    pub pending: Vec<PathBuf>,
}

impl ProjectProgress {
    /// Completed share, 0 to 100
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64 * 100.0
        }
    }
}

/// List every `.rpy` script below `dir`, sorted
pub fn find_scripts<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    FileManager::find_files(dir.as_ref(), "rpy")
        .with_context(|| format!("Failed to scan project folder: {:?}", dir.as_ref()))
}

/// Count reconstructed scripts among `scripts`.
///
/// `on_file` is called once per script, e.g. to advance a progress bar.
pub fn progress_of<F>(scripts: Vec<PathBuf>, mut on_file: F) -> ProjectProgress
where
    F: FnMut(&Path),
{
    let mut progress = ProjectProgress {
        total: scripts.len(),
        ..Default::default()
    };

    for script in scripts {
        on_file(&script);
        if is_reconstructed(&script) {
            progress.completed += 1;
        } else {
            progress.pending.push(script);
        }
    }

    progress
}

/// Count reconstructed scripts below `dir`
pub fn scan_project_progress<P, F>(dir: P, on_file: F) -> Result<ProjectProgress>
where
    P: AsRef<Path>,
    F: FnMut(&Path),
{
    let scripts = find_scripts(dir)?;
    Ok(progress_of(scripts, on_file))
}

/*!
 * Numbered continuation files.
 *
 * Extraction may split a large working file into `name.txt`, `name_1.txt`,
 * `name_2.txt`, ... Every consumer must read the set as one stream, in
 * numeric order, or counts go wrong as soon as a continuation exists.
 */

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::file_utils::FileManager;

/// Position of a file inside its numbered set
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Rank {
    /// The un-suffixed base file
    Base,
    /// `{name}_{N}{ext}`
    Numbered(u64),
    /// `{name}_{suffix}{ext}` where the suffix is not a number
    Unnumbered,
}

/// Splits `name.ext` into (`name`, `.ext`); the extension may be empty
fn split_base_filename(base_filename: &str) -> (&str, &str) {
    match base_filename.rfind('.') {
        Some(0) | None => (base_filename, ""),
        Some(dot) => base_filename.split_at(dot),
    }
}

/// Rank of a sibling file name, or `None` when it is not part of the set
fn rank_of(file_name: &str, stem: &str, ext: &str) -> Option<Rank> {
    let suffix = file_name
        .strip_prefix(stem)?
        .strip_prefix('_')?
        .strip_suffix(ext)?;
    if suffix.is_empty() {
        return None;
    }
    if !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return Some(Rank::Unnumbered);
    }
    Some(match suffix.parse::<u64>() {
        Ok(n) => Rank::Numbered(n),
        Err(_) => Rank::Unnumbered,
    })
}

/// Ordered paths of `base_filename` and its numbered continuations in
/// `folder`. Empty when neither exists.
pub fn find_numbered_files<P: AsRef<Path>>(folder: P, base_filename: &str) -> Vec<PathBuf> {
    let folder = folder.as_ref();
    let (stem, ext) = split_base_filename(base_filename);
    let mut ranked: Vec<(Rank, String, PathBuf)> = Vec::new();

    let base_path = folder.join(base_filename);
    if FileManager::file_exists(&base_path) {
        ranked.push((Rank::Base, base_filename.to_string(), base_path));
    }

    match fs::read_dir(folder) {
        Ok(entries) => {
            for entry in entries.flatten() {
                let path = entry.path();
                if !path.is_file() {
                    continue;
                }
                let file_name = entry.file_name().to_string_lossy().into_owned();
                if let Some(rank) = rank_of(&file_name, stem, ext) {
                    ranked.push((rank, file_name, path));
                }
            }
        }
        Err(e) => {
            debug!("Cannot list {:?}: {}", folder, e);
        }
    }

    ranked.sort_by(|a, b| match a.0.cmp(&b.0) {
        Ordering::Equal => a.1.cmp(&b.1),
        other => other,
    });

    let files: Vec<PathBuf> = ranked.into_iter().map(|(_, _, path)| path).collect();
    if files.len() > 1 {
        debug!("{} files in numbered set for {}", files.len(), base_filename);
    }
    files
}

/// All lines of the numbered set, concatenated in rank order.
///
/// Files that cannot be read are skipped with a warning; an empty result
/// means the content is missing.
pub fn load_all_lines<P: AsRef<Path>>(folder: P, base_filename: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for path in find_numbered_files(folder, base_filename) {
        match FileManager::read_text(&path) {
            Ok(decoded) => lines.extend(decoded.content.lines().map(str::to_string)),
            Err(e) => warn!("Skipping unreadable file in numbered set: {}", e),
        }
    }
    lines
}

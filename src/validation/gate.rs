/*!
 * Last check before a translated script is rebuilt.
 *
 * Every working file the reconstruction needs is validated, all of them,
 * even after a failure, so the operator sees every discrepancy in one
 * report. A single failing required file makes the whole result invalid.
 */

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;

use super::correspondence::{CorrespondenceValidator, LineCount, ValidationReport};
use super::file_kind::{CountingRule, FileKind};
use crate::file_utils::FileManager;
use crate::multi_file;

/// Folder holding the files handed to the translator
pub const TRANSLATE_DIR: &str = "fichiers_a_traduire";

/// Folder holding extracted files that are not meant to be translated
pub const NOT_TRANSLATE_DIR: &str = "fichiers_a_ne_pas_traduire";

/// Totals over every file checked
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationSummary {
    pub total_expected: usize,
    pub total_found: usize,
    pub files_checked: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Whole-reconstruction decision
#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregateValidation {
    pub overall_valid: bool,
    pub files_validated: BTreeMap<FileKind, ValidationReport>,
    pub summary: ValidationSummary,
}

impl AggregateValidation {
    /// Kinds whose report carries at least one error
    pub fn failed_kinds(&self) -> Vec<FileKind> {
        self.files_validated
            .iter()
            .filter(|(_, report)| !report.errors.is_empty())
            .map(|(kind, _)| *kind)
            .collect()
    }

    fn record(&mut self, kind: FileKind, report: ValidationReport, counts_toward_total: bool) {
        self.summary.files_checked += 1;
        if counts_toward_total {
            self.summary.total_found += report.translation_count;
        }
        for error in &report.errors {
            self.summary.errors.push(format!("[{}] {}", kind, error));
        }
        for warning in &report.warnings {
            self.summary.warnings.push(format!("[{}] {}", kind, warning));
        }
        self.files_validated.insert(kind, report);
    }
}

/// Directory layout the working files were found in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLayout {
    /// `{root}/{game}/fichiers_a_traduire/`
    Flat,
    /// `{root}/{game}/{file_base}/fichiers_a_traduire/`
    Nested,
}

/// Where the working files of one source file live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLocation {
    pub game_dir: PathBuf,
    pub translate_dir: PathBuf,
    pub layout: OutputLayout,
}

impl OutputLocation {
    fn new(game_dir: &Path, file_base: &str, layout: OutputLayout) -> Self {
        let translate_dir = match layout {
            OutputLayout::Flat => game_dir.join(TRANSLATE_DIR),
            OutputLayout::Nested => game_dir.join(file_base).join(TRANSLATE_DIR),
        };
        Self {
            game_dir: game_dir.to_path_buf(),
            translate_dir,
            layout,
        }
    }

    /// Directories searched for the empty-text file, in order
    pub fn empty_file_dirs(&self) -> Vec<PathBuf> {
        let sibling = self
            .translate_dir
            .parent()
            .map(|parent| parent.join(NOT_TRANSLATE_DIR))
            .unwrap_or_else(|| PathBuf::from(NOT_TRANSLATE_DIR));
        vec![self.translate_dir.clone(), sibling]
    }

    fn has_any_output(&self, file_base: &str) -> bool {
        FileKind::ALL
            .iter()
            .any(|kind| FileManager::file_exists(self.translate_dir.join(kind.file_name(file_base))))
    }
}

/// Authorizes reconstruction once every required working file matches
#[derive(Debug, Clone)]
pub struct ReconstructionGate {
    temp_root: PathBuf,
    detect_duplicates: bool,
}

impl ReconstructionGate {
    /// Gate over the given temp-output root, duplicate check disabled
    pub fn new<P: Into<PathBuf>>(temp_root: P) -> Self {
        Self {
            temp_root: temp_root.into(),
            detect_duplicates: false,
        }
    }

    pub fn with_duplicate_detection(mut self, enabled: bool) -> Self {
        self.detect_duplicates = enabled;
        self
    }

    pub fn temp_root(&self) -> &Path {
        &self.temp_root
    }

    /// Find the output directory for `file_base` among the root's immediate
    /// subfolders.
    ///
    /// A folder holding the dialogue file wins, then the first folder holding
    /// any other working file of this base, then the first existing
    /// `fichiers_a_traduire` folder of either layout. Games are scanned in
    /// name order, flat layout before nested.
    pub fn locate_output(&self, file_base: &str) -> Option<OutputLocation> {
        let mut games: Vec<PathBuf> = match fs::read_dir(&self.temp_root) {
            Ok(entries) => entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.is_dir())
                .collect(),
            Err(e) => {
                warn!("Cannot read temp-output root {:?}: {}", self.temp_root, e);
                return None;
            }
        };
        games.sort();

        let candidates: Vec<OutputLocation> = games
            .iter()
            .flat_map(|game| {
                [
                    OutputLocation::new(game, file_base, OutputLayout::Flat),
                    OutputLocation::new(game, file_base, OutputLayout::Nested),
                ]
            })
            .collect();

        let dialogue_name = FileKind::Dialogue.file_name(file_base);
        if let Some(found) = candidates
            .iter()
            .find(|c| FileManager::file_exists(c.translate_dir.join(&dialogue_name)))
        {
            return Some(found.clone());
        }

        if let Some(found) = candidates.iter().find(|c| c.has_any_output(file_base)) {
            return Some(found.clone());
        }

        candidates
            .into_iter()
            .find(|c| FileManager::dir_exists(&c.translate_dir))
    }

    /// Validate every working file needed to rebuild `file_base`.
    pub fn validate_before_reconstruction(
        &self,
        file_base: &str,
        extracted_count: usize,
        asterix_count: usize,
        empty_count: usize,
    ) -> AggregateValidation {
        let mut result = AggregateValidation::default();
        result.summary.total_expected = extracted_count + asterix_count + empty_count;

        let Some(location) = self.locate_output(file_base) else {
            result.summary.errors.push(format!(
                "No output folder found for '{}' under {}",
                file_base,
                self.temp_root.display()
            ));
            warn!("Reconstruction refused for {}: output folder not found", file_base);
            return result;
        };
        debug!("Working files for {} in {:?}", file_base, location.translate_dir);

        let mut overall_valid = true;

        if extracted_count > 0 {
            let path = location.translate_dir.join(FileKind::Dialogue.file_name(file_base));
            let report = Self::check_required(FileKind::Dialogue, &path, extracted_count);
            overall_valid &= report.errors.is_empty();
            result.record(FileKind::Dialogue, report, true);
        }

        if asterix_count > 0 {
            let path = location.translate_dir.join(FileKind::Asterix.file_name(file_base));
            let report = Self::check_required(FileKind::Asterix, &path, asterix_count);
            overall_valid &= report.errors.is_empty();
            result.record(FileKind::Asterix, report, true);
        }

        if self.detect_duplicates {
            let path = location.translate_dir.join(FileKind::Duplicates.file_name(file_base));
            result.record(FileKind::Duplicates, Self::check_duplicates(&path), false);
        }

        if empty_count > 0 {
            let file_name = FileKind::Empty.file_name(file_base);
            let dirs = location.empty_file_dirs();
            let path = dirs
                .iter()
                .map(|dir| dir.join(&file_name))
                .find(|path| FileManager::file_exists(path))
                .unwrap_or_else(|| dirs[0].join(&file_name));
            let report = Self::check_required(FileKind::Empty, &path, empty_count);
            overall_valid &= report.errors.is_empty();
            result.record(FileKind::Empty, report, true);
        }

        result.overall_valid = overall_valid;
        info!(
            "Reconstruction check for {}: {} ({} file(s), {}/{} unit(s))",
            file_base,
            if overall_valid { "passed" } else { "failed" },
            result.summary.files_checked,
            result.summary.total_found,
            result.summary.total_expected
        );
        result
    }

    fn check_required(kind: FileKind, path: &Path, expected: usize) -> ValidationReport {
        if !FileManager::file_exists(path) {
            return ValidationReport::failed(format!(
                "Required {} file missing: {}",
                kind,
                path.display()
            ));
        }
        CorrespondenceValidator::validate_file_correspondence(expected, path)
    }

    /// Presence check only; the count is informational
    fn check_duplicates(path: &Path) -> ValidationReport {
        if !FileManager::file_exists(path) {
            return ValidationReport {
                valid: true,
                warnings: vec![format!("Duplicates file not found: {}", path.display())],
                ..Default::default()
            };
        }

        let folder = path.parent().unwrap_or_else(|| Path::new("."));
        let base_filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let lines = multi_file::load_all_lines(folder, &base_filename);
        let count = LineCount::of(&lines, CountingRule::NonBlank);

        ValidationReport {
            valid: true,
            translation_count: count.units,
            empty_lines: count.blank,
            ..Default::default()
        }
    }
}

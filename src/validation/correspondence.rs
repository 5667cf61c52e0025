/*!
 * Count correspondence between extraction and translated working files.
 *
 * Extraction knows how many units it wrote; before reconstruction the
 * translated file (with its numbered continuations) must hold exactly as
 * many. Missing units are errors. Extra units only produce a warning, since
 * translators sometimes split a line in two, but the report is still not
 * valid because the counts differ.
 */

use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Serialize;

use super::file_kind::{CountingRule, FileKind};
use crate::file_utils::FileManager;
use crate::multi_file;

/// Outcome of checking one working file against its expected count
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    /// Units actually found
    pub translation_count: usize,
    pub missing_count: usize,
    pub extra_count: usize,
    /// Blank lines seen, counted or not
    pub empty_lines: usize,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Report for a file that could not be checked at all
    pub fn failed(error: String) -> Self {
        Self {
            errors: vec![error],
            ..Default::default()
        }
    }

    /// One-line description for logs
    pub fn summary(&self) -> String {
        if self.valid {
            format!("OK: {} unit(s)", self.translation_count)
        } else {
            format!(
                "{} unit(s), {} missing, {} extra, {} error(s), {} warning(s)",
                self.translation_count,
                self.missing_count,
                self.extra_count,
                self.errors.len(),
                self.warnings.len()
            )
        }
    }
}

/// Line tallies for a logical file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineCount {
    /// Lines counted as units under the rule
    pub units: usize,
    /// Blank lines
    pub blank: usize,
}

impl LineCount {
    pub fn of<S: AsRef<str>>(lines: &[S], rule: CountingRule) -> Self {
        let blank = lines
            .iter()
            .filter(|line| line.as_ref().trim().is_empty())
            .count();
        let units = match rule {
            CountingRule::AllLines => lines.len(),
            CountingRule::NonBlank => lines.len() - blank,
        };
        Self { units, blank }
    }
}

/// Compares expected unit counts with translated working files
pub struct CorrespondenceValidator;

impl CorrespondenceValidator {
    /// Check a translated working file (and its numbered continuations)
    /// against the number of units extraction produced.
    pub fn validate_file_correspondence<P: AsRef<Path>>(
        expected_count: usize,
        translation_file_path: P,
    ) -> ValidationReport {
        let path = translation_file_path.as_ref();

        if !FileManager::file_exists(path) {
            return ValidationReport::failed(format!(
                "Translation file not found: {}",
                path.display()
            ));
        }

        let Some(base_filename) = path.file_name().map(|n| n.to_string_lossy().into_owned())
        else {
            return ValidationReport::failed(format!("Invalid file path: {}", path.display()));
        };
        let folder = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let lines = multi_file::load_all_lines(&folder, &base_filename);
        if lines.is_empty() {
            return ValidationReport::failed(format!(
                "No content found in {} or its numbered continuations",
                path.display()
            ));
        }

        let rule = FileKind::counting_rule_for(path);
        let report = Self::compare(expected_count, LineCount::of(&lines, rule));
        debug!("Correspondence for {:?}: {}", path, report.summary());
        report
    }

    /// Compare an expected count with tallied lines
    pub fn compare(expected_count: usize, count: LineCount) -> ValidationReport {
        let actual = count.units;
        let mut report = ValidationReport {
            valid: actual == expected_count,
            translation_count: actual,
            empty_lines: count.blank,
            ..Default::default()
        };

        if actual < expected_count {
            report.missing_count = expected_count - actual;
            report.errors.push(format!(
                "Missing translations: expected {} line(s), found {} ({} missing)",
                expected_count, actual, report.missing_count
            ));
        } else if actual > expected_count {
            report.extra_count = actual - expected_count;
            warn!(
                "Translated file has {} extra line(s) ({} found for {} expected)",
                report.extra_count, actual, expected_count
            );
            report.warnings.push(format!(
                "Extra translations: expected {} line(s), found {} ({} extra)",
                expected_count, actual, report.extra_count
            ));
        }

        report
    }
}

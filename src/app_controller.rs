use anyhow::Result;
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::content::{ClassificationResult, ContentClassifier, RenpyFileValidator, RenpyValidation};
use crate::errors::FileError;
use crate::normalizer::{CorrectionCounts, QuoteNormalizer};
use crate::progress::{self, ProjectProgress};
use crate::validation::{AggregateValidation, CorrespondenceValidator, ReconstructionGate, ValidationReport};

// @module: Application controller for the validation commands

/// Per-file outcome of a quote repair run
#[derive(Debug)]
pub struct QuoteFixOutcome {
    pub path: PathBuf,
    pub result: Result<CorrectionCounts, FileError>,
}

/// Counts requested for a reconstruction check
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpectedCounts {
    pub dialogue: usize,
    pub asterix: usize,
    pub empty: usize,
}

/// Main application controller; owns the configuration every command
/// derives its components from
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn classifier(&self) -> ContentClassifier {
        ContentClassifier::with_sample_lines(self.config.classifier.sample_lines)
    }

    pub fn renpy_validator(&self) -> RenpyFileValidator {
        RenpyFileValidator::with_thresholds(
            self.config.renpy.min_confidence,
            self.config.renpy.warning_confidence,
        )
    }

    /// Gate over the configured temp root, or `temp_root` when given
    pub fn gate(&self, temp_root: Option<&Path>) -> ReconstructionGate {
        let root = temp_root
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.temp_root.clone());
        ReconstructionGate::new(root).with_duplicate_detection(self.config.detect_duplicates)
    }

    /// Classify a candidate translation file
    pub fn classify(&self, path: &Path) -> ClassificationResult {
        let result = self.classifier().classify_candidate(path);
        if result.is_translation {
            info!("{:?}: translation ({:.0}%)", path, result.confidence);
        } else {
            warn!("{:?}: {} - {}", path, result.file_type, result.reason);
        }
        result
    }

    /// Check that a file is a Ren'Py script
    pub fn check_script(&self, path: &Path) -> RenpyValidation {
        let result = self.renpy_validator().validate(path);
        for warning in &result.warnings {
            warn!("{:?}: {}", path, warning);
        }
        for error in &result.errors {
            error!("{:?}: {}", path, error);
        }
        result
    }

    /// Compare a translated working file with its expected count
    pub fn validate_file(&self, path: &Path, expected: usize) -> ValidationReport {
        let report = CorrespondenceValidator::validate_file_correspondence(expected, path);
        info!("{:?}: {}", path, report.summary());
        report
    }

    /// Run the full pre-reconstruction check
    pub fn check_reconstruction(
        &self,
        file_base: &str,
        counts: ExpectedCounts,
        temp_root: Option<&Path>,
    ) -> AggregateValidation {
        let result = self.gate(temp_root).validate_before_reconstruction(
            file_base,
            counts.dialogue,
            counts.asterix,
            counts.empty,
        );
        for error in &result.summary.errors {
            error!("{}", error);
        }
        for warning in &result.summary.warnings {
            warn!("{}", warning);
        }
        result
    }

    /// Repair quotes in every given file; failures do not stop the run
    pub fn fix_quotes(&self, paths: &[PathBuf]) -> Vec<QuoteFixOutcome> {
        paths
            .iter()
            .map(|path| {
                let result = QuoteNormalizer::normalize_file(path);
                if let Err(e) = &result {
                    error!("{}", e);
                }
                QuoteFixOutcome {
                    path: path.clone(),
                    result,
                }
            })
            .collect()
    }

    /// Scan a project folder for reconstructed scripts
    pub fn project_progress(&self, dir: &Path) -> Result<ProjectProgress> {
        let scripts = progress::find_scripts(dir)?;
        debug!("Found {} script(s) under {:?}", scripts.len(), dir);

        let progress_bar = ProgressBar::new(scripts.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar.set_message("Scanning scripts");

        let result = progress::progress_of(scripts, |_| progress_bar.inc(1));
        progress_bar.finish_and_clear();

        info!(
            "{}/{} script(s) reconstructed ({:.0}%)",
            result.completed,
            result.total,
            result.percent()
        );
        Ok(result)
    }

    /// Mark a script as reconstructed
    pub fn stamp(&self, path: &Path) -> Result<bool, FileError> {
        let changed = progress::stamp_reconstructed(path, &Local::now())?;
        if changed {
            info!("Marked {:?} as reconstructed", path);
        } else {
            debug!("{:?} already carries the reconstruction marker", path);
        }
        Ok(changed)
    }
}

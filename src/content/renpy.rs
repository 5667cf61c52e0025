/*!
 * Plausibility scoring for Ren'Py script files.
 *
 * Used before extraction to refuse files that only look like `.rpy` scripts
 * by name. The score combines breadth (how many kinds of structural
 * constructs appear) with density (how much of the file is dialogue).
 */

use std::path::Path;

use log::{debug, warn};
use serde::Serialize;

use super::patterns::{QUOTED_STRING_REGEX, RENPY_PATTERNS, SPEAKER_DIALOGUE_REGEX};
use crate::errors::FileError;
use crate::file_utils::FileManager;

/// Default minimum confidence for a file to be accepted
pub const DEFAULT_MIN_CONFIDENCE: f64 = 15.0;

/// Default confidence under which an accepted file still gets a warning
pub const DEFAULT_WARNING_CONFIDENCE: f64 = 50.0;

const MIN_PATTERN_KINDS: usize = 2;
const DIALOGUE_BONUS_THRESHOLD: f64 = 10.0;
const MAX_DIALOGUE_BONUS: f64 = 20.0;

/// Result of scoring one file
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenpyValidation {
    pub is_valid: bool,
    pub confidence: f64,
    /// Names of the distinct structural patterns that matched
    pub patterns_found: Vec<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl RenpyValidation {
    fn rejected(error: String) -> Self {
        Self {
            errors: vec![error],
            ..Default::default()
        }
    }
}

/// Line statistics gathered in one pass over a script
#[derive(Debug, Default)]
struct ScriptStats {
    total_lines: usize,
    pattern_matches: usize,
    dialogue_lines: usize,
    matched_kinds: Vec<bool>,
}

impl ScriptStats {
    fn collect(content: &str) -> Self {
        let mut stats = Self {
            matched_kinds: vec![false; RENPY_PATTERNS.len()],
            ..Default::default()
        };

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            stats.total_lines += 1;

            let mut matched = false;
            for (index, pattern) in RENPY_PATTERNS.iter().enumerate() {
                if pattern.regex.is_match(line) {
                    stats.matched_kinds[index] = true;
                    matched = true;
                }
            }
            if matched {
                stats.pattern_matches += 1;
            }

            if SPEAKER_DIALOGUE_REGEX.is_match(trimmed) || QUOTED_STRING_REGEX.is_match(trimmed) {
                stats.dialogue_lines += 1;
            }
        }

        stats
    }

    fn kinds_found(&self) -> Vec<String> {
        RENPY_PATTERNS
            .iter()
            .zip(&self.matched_kinds)
            .filter(|(_, matched)| **matched)
            .map(|(pattern, _)| pattern.name.to_string())
            .collect()
    }

    fn confidence(&self) -> f64 {
        if self.total_lines == 0 {
            return 0.0;
        }
        let total = self.total_lines as f64;
        let mut confidence = (self.pattern_matches as f64 / total * 100.0).min(100.0);

        let dialogue_ratio = self.dialogue_lines as f64 / total * 100.0;
        if dialogue_ratio > DIALOGUE_BONUS_THRESHOLD {
            confidence += (dialogue_ratio / 2.0).min(MAX_DIALOGUE_BONUS);
        }
        confidence.min(100.0)
    }
}

/// Scores whether a file is a genuine Ren'Py script
#[derive(Debug, Clone)]
pub struct RenpyFileValidator {
    min_confidence: f64,
    warning_confidence: f64,
}

impl RenpyFileValidator {
    pub fn new() -> Self {
        Self::with_thresholds(DEFAULT_MIN_CONFIDENCE, DEFAULT_WARNING_CONFIDENCE)
    }

    pub fn with_thresholds(min_confidence: f64, warning_confidence: f64) -> Self {
        Self {
            min_confidence,
            warning_confidence,
        }
    }

    /// Validate a file on disk
    pub fn validate<P: AsRef<Path>>(&self, path: P) -> RenpyValidation {
        let path = path.as_ref();
        let decoded = match FileManager::read_text(path) {
            Ok(decoded) => decoded,
            Err(FileError::NotFound(_)) => {
                return RenpyValidation::rejected(format!("File not found: {}", path.display()));
            }
            Err(e) => {
                warn!("Could not read {:?}: {}", path, e);
                return RenpyValidation::rejected(e.to_string());
            }
        };

        let mut result = self.validate_content(&decoded.content);
        if decoded.used_fallback() {
            result
                .warnings
                .insert(0, "File is not valid UTF-8; decoded as Latin-1".to_string());
        }
        debug!(
            "Ren'Py check for {:?}: valid={} confidence={:.1}",
            path, result.is_valid, result.confidence
        );
        result
    }

    /// Validate script text already in memory
    pub fn validate_content(&self, content: &str) -> RenpyValidation {
        if content.trim().is_empty() {
            return RenpyValidation::rejected("File is empty".to_string());
        }

        let stats = ScriptStats::collect(content);
        if stats.total_lines == 0 {
            return RenpyValidation::rejected("File contains only comments".to_string());
        }

        let confidence = stats.confidence();
        let patterns_found = stats.kinds_found();
        let mut errors = Vec::new();

        if confidence <= self.min_confidence {
            errors.push(format!(
                "Confidence {:.1}% is below the {:.0}% threshold",
                confidence, self.min_confidence
            ));
        }
        if patterns_found.len() < MIN_PATTERN_KINDS {
            errors.push(format!(
                "Only {} kind(s) of Ren'Py construct found, at least {} required",
                patterns_found.len(),
                MIN_PATTERN_KINDS
            ));
        }
        if stats.dialogue_lines == 0 {
            errors.push("No dialogue lines found".to_string());
        }

        let mut warnings = Vec::new();
        if confidence < self.warning_confidence {
            warnings.push(format!(
                "Low confidence ({:.1}%): this may not be a Ren'Py script",
                confidence
            ));
        }

        RenpyValidation {
            is_valid: errors.is_empty(),
            confidence,
            patterns_found,
            warnings,
            errors,
        }
    }
}

impl Default for RenpyFileValidator {
    fn default() -> Self {
        Self::new()
    }
}

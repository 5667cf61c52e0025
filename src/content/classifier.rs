/*!
 * Cheap content sniffing for candidate translation files.
 *
 * Genuine translation files start with `translate <lang> <label>:` blocks,
 * so the first few non-empty lines are enough to tell them apart from UI or
 * engine code. Technical markers win over translation markers, and anything
 * that cannot be read is rejected rather than accepted.
 */

use std::fmt;
use std::path::Path;

use log::{debug, warn};
use serde::Serialize;

use super::patterns::{TECHNICAL_MARKERS, TRANSLATION_MARKER};
use crate::file_utils::FileManager;

/// Default number of non-empty lines sampled from the top of a file
pub const DEFAULT_SAMPLE_LINES: usize = 20;

const CONFIDENCE_TECHNICAL: f64 = 90.0;
const CONFIDENCE_TRANSLATION: f64 = 95.0;
const CONFIDENCE_NO_MARKERS: f64 = 70.0;

/// Kind of content found in a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Translation,
    TechnicalCode,
    Invalid,
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Translation => "translation",
            Self::TechnicalCode => "technical_code",
            Self::Invalid => "invalid",
        };
        write!(f, "{}", name)
    }
}

/// Outcome of a single classification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub is_translation: bool,
    pub file_type: ContentType,
    /// Between 0 and 100
    pub confidence: f64,
    pub reason: String,
}

impl ClassificationResult {
    fn new(file_type: ContentType, confidence: f64, reason: String) -> Self {
        Self {
            is_translation: file_type == ContentType::Translation,
            file_type,
            confidence,
            reason,
        }
    }

    /// Rejection used whenever nothing could be sampled
    fn unreadable(reason: String) -> Self {
        Self::new(ContentType::TechnicalCode, 0.0, reason)
    }
}

/// Heuristic classifier separating translation files from technical code
#[derive(Debug, Clone)]
pub struct ContentClassifier {
    sample_lines: usize,
}

impl ContentClassifier {
    /// Create a classifier with the default sample size
    pub fn new() -> Self {
        Self::with_sample_lines(DEFAULT_SAMPLE_LINES)
    }

    /// Create a classifier sampling `sample_lines` non-empty lines
    pub fn with_sample_lines(sample_lines: usize) -> Self {
        Self {
            sample_lines: sample_lines.max(1),
        }
    }

    /// Classify a file's content.
    ///
    /// Only the leading non-empty lines are read. Read errors never escape:
    /// they produce a `technical_code` result with zero confidence.
    pub fn classify<P: AsRef<Path>>(&self, path: P) -> ClassificationResult {
        let path = path.as_ref();
        match FileManager::read_leading_lines(path, self.sample_lines) {
            Ok(sample) => {
                let result = Self::classify_sample(&sample);
                debug!(
                    "Classified {:?} as {} ({:.0}%)",
                    path, result.file_type, result.confidence
                );
                result
            }
            Err(e) => {
                warn!("Could not inspect {:?}: {}", path, e);
                ClassificationResult::unreadable(format!("Unable to read file: {}", e))
            }
        }
    }

    /// Check the extension first, then classify.
    ///
    /// Anything that is not a `.rpy` file is `invalid` without being read.
    pub fn classify_candidate<P: AsRef<Path>>(&self, path: P) -> ClassificationResult {
        let path = path.as_ref();
        if !FileManager::has_rpy_extension(path) {
            return ClassificationResult::new(
                ContentType::Invalid,
                0.0,
                format!("Not a .rpy file: {}", path.display()),
            );
        }
        self.classify(path)
    }

    /// Classify in-memory text such as clipboard content
    pub fn classify_text(&self, text: &str) -> ClassificationResult {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let sample: Vec<&str> = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .take(self.sample_lines)
            .collect();
        Self::classify_sample(&sample)
    }

    fn classify_sample<S: AsRef<str>>(sample: &[S]) -> ClassificationResult {
        if sample.is_empty() {
            return ClassificationResult::unreadable("No readable content".to_string());
        }

        let joined = sample
            .iter()
            .map(|line| line.as_ref())
            .collect::<Vec<&str>>()
            .join("\n");
        let translation_count = joined.matches(TRANSLATION_MARKER).count();
        let technical_count: usize = TECHNICAL_MARKERS
            .iter()
            .map(|marker| joined.matches(marker).count())
            .sum();

        if technical_count >= 1 {
            ClassificationResult::new(
                ContentType::TechnicalCode,
                CONFIDENCE_TECHNICAL,
                format!(
                    "{} technical marker(s) found ({} translation marker(s))",
                    technical_count, translation_count
                ),
            )
        } else if translation_count >= 1 {
            ClassificationResult::new(
                ContentType::Translation,
                CONFIDENCE_TRANSLATION,
                format!("{} translation block(s) found", translation_count),
            )
        } else {
            ClassificationResult::new(
                ContentType::TechnicalCode,
                CONFIDENCE_NO_MARKERS,
                "No translation markers found".to_string(),
            )
        }
    }
}

impl Default for ContentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

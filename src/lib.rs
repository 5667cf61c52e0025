/*!
 * # RenExtract - validation core for Ren'Py script translation
 *
 * Dialogue is extracted from `.rpy` scripts into plain-text working files,
 * translated by a human or an online translator, then rebuilt into a
 * translated script. This library holds the checks that run around that
 * round trip.
 *
 * ## Features
 *
 * - Tell translation files apart from technical script code
 * - Score how much a file looks like a Ren'Py script
 * - Read working files split into numbered continuations as one stream
 * - Compare translated line counts with extraction counts
 * - Validate every working file before a script is rebuilt
 * - Repair quotes, guillemets, ellipsis artifacts and percent signs
 * - Track which scripts of a project have been rebuilt
 *
 * ## Architecture
 *
 * - `content`: content classification and Ren'Py script scoring
 * - `multi_file`: numbered continuation files
 * - `validation`: count correspondence and the reconstruction gate
 * - `normalizer`: text repair for translated files
 * - `progress`: reconstruction marker and project progress
 * - `file_utils`: decoding, atomic writes and file discovery
 * - `app_config`: configuration management
 * - `app_controller`: command orchestration for the CLI
 * - `errors`: custom error types
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod content;
pub mod errors;
pub mod file_utils;
pub mod multi_file;
pub mod normalizer;
pub mod progress;
pub mod validation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use content::{ClassificationResult, ContentClassifier, ContentType, RenpyFileValidator, RenpyValidation};
pub use errors::{AppError, ConfigError, FileError};
pub use multi_file::{find_numbered_files, load_all_lines};
pub use normalizer::{fix_unescaped_quotes_in_txt, CorrectionCounts, QuoteNormalizer};
pub use progress::{is_reconstructed, ProjectProgress, RECONSTRUCTION_MARKER};
pub use validation::{
    AggregateValidation, CorrespondenceValidator, FileKind, ReconstructionGate, ValidationReport,
};

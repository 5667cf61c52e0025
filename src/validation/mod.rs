/*!
 * Validation of translated working files before reconstruction.
 *
 * - `file_kind`: working file families and their counting rules
 * - `correspondence`: expected vs. actual unit counts for one file
 * - `gate`: aggregates every required file into one decision
 */

pub mod correspondence;
pub mod file_kind;
pub mod gate;

// Re-export main types
pub use correspondence::{CorrespondenceValidator, LineCount, ValidationReport};
pub use file_kind::{CountingRule, FileKind};
pub use gate::{AggregateValidation, OutputLayout, OutputLocation, ReconstructionGate, ValidationSummary};

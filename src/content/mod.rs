/*!
 * Content heuristics applied before a file is accepted as input.
 *
 * - `classifier`: separates translation files from technical code
 * - `renpy`: scores how much a file looks like a Ren'Py script
 * - `patterns`: the marker and regex tables both rely on
 */

pub mod classifier;
pub mod patterns;
pub mod renpy;

pub use classifier::{ClassificationResult, ContentClassifier, ContentType};
pub use renpy::{RenpyFileValidator, RenpyValidation};

/*!
 * Error types for the renextract application.
 *
 * Library operations that touch the filesystem report `FileError`; the
 * validators convert these into structured report fields instead of
 * propagating them. `AppError` wraps everything for the command-line layer.
 */

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when reading or writing working files
#[derive(Error, Debug)]
pub enum FileError {
    /// The file does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file could not be read or decoded
    #[error("Unable to read {}: {message}", path.display())]
    Unreadable {
        /// Path of the file
        path: PathBuf,
        /// Underlying reason
        message: String,
    },

    /// The file could not be replaced on disk
    #[error("Unable to write {}: {message}", path.display())]
    WriteFailed {
        /// Path of the file
        path: PathBuf,
        /// Underlying reason
        message: String,
    },
}

/// Errors raised while checking configuration values
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A numeric setting is outside its accepted range
    #[error("Invalid value for {field}: {message}")]
    InvalidValue {
        /// Name of the offending setting
        field: &'static str,
        /// Explanation
        message: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(#[from] FileError),

    /// Error in the configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A validation gate refused to authorize the operation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::Unknown(format!("I/O error: {}", error))
    }
}

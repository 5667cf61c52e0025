use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::errors::FileError;

// @module: File and directory utilities

// @const: UTF-8 byte-order mark
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Encoding that was used to decode a working file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// Valid UTF-8 (BOM stripped if present)
    Utf8,
    /// Fallback single-byte decoding
    Latin1,
}

/// Text content of a file together with the encoding that decoded it
#[derive(Debug, Clone)]
pub struct DecodedText {
    pub content: String,
    pub encoding: TextEncoding,
    /// The file started with a UTF-8 BOM, which is not part of `content`
    pub had_bom: bool,
}

impl DecodedText {
    /// Whether the Latin-1 fallback had to be used
    pub fn used_fallback(&self) -> bool {
        self.encoding == TextEncoding::Latin1
    }

    /// Content with the original BOM put back, for writing the file again
    pub fn with_original_bom(&self, content: &str) -> String {
        if self.had_bom {
            format!("\u{feff}{}", content)
        } else {
            content.to_string()
        }
    }
}

/// Decode raw bytes as UTF-8, or as Latin-1 when they are not valid UTF-8
fn decode_bytes(bytes: &[u8]) -> (String, TextEncoding) {
    match std::str::from_utf8(bytes) {
        Ok(text) => (text.to_string(), TextEncoding::Utf8),
        Err(_) => (bytes.iter().map(|b| *b as char).collect(), TextEncoding::Latin1),
    }
}

fn open_error(path: &Path, e: std::io::Error) -> FileError {
    match e.kind() {
        ErrorKind::NotFound => FileError::NotFound(path.to_path_buf()),
        _ => FileError::Unreadable {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
    }
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Read a text file, stripping a UTF-8 BOM and falling back to Latin-1
    /// when the bytes are not valid UTF-8.
    pub fn read_text<P: AsRef<Path>>(path: P) -> std::result::Result<DecodedText, FileError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| open_error(path, e))?;

        let (bytes, had_bom) = match bytes.strip_prefix(UTF8_BOM) {
            Some(rest) => (rest, true),
            None => (bytes.as_slice(), false),
        };

        let (content, encoding) = decode_bytes(bytes);
        if encoding == TextEncoding::Latin1 {
            warn!("{:?} is not valid UTF-8, decoding as Latin-1", path);
        }
        Ok(DecodedText {
            content,
            encoding,
            had_bom,
        })
    }

    /// Read only the first `max_lines` non-blank lines of a file.
    ///
    /// Lines are decoded one at a time with the same BOM and Latin-1 rules
    /// as `read_text`; reading stops as soon as enough lines were collected.
    pub fn read_leading_lines<P: AsRef<Path>>(
        path: P,
        max_lines: usize,
    ) -> std::result::Result<Vec<String>, FileError> {
        let path = path.as_ref();
        let file = fs::File::open(path).map_err(|e| open_error(path, e))?;
        let mut reader = BufReader::new(file);
        let mut lines = Vec::new();
        let mut buffer = Vec::new();
        let mut first = true;

        while lines.len() < max_lines {
            buffer.clear();
            let read = reader
                .read_until(b'\n', &mut buffer)
                .map_err(|e| open_error(path, e))?;
            if read == 0 {
                break;
            }

            let mut raw = buffer.as_slice();
            if first {
                raw = raw.strip_prefix(UTF8_BOM).unwrap_or(raw);
                first = false;
            }
            let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);

            let (line, _) = decode_bytes(raw);
            if !line.trim().is_empty() {
                lines.push(line);
            }
        }

        Ok(lines)
    }

    /// Replace a file's content in one step.
    ///
    /// The content is written to a temporary file in the target directory
    /// and then renamed over the target, so an interrupted write never
    /// leaves a half-written file behind.
    pub fn write_atomic<P: AsRef<Path>>(path: P, content: &str) -> std::result::Result<(), FileError> {
        let path = path.as_ref();
        let write_failed = |message: String| FileError::WriteFailed {
            path: path.to_path_buf(),
            message,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut temp = NamedTempFile::new_in(&dir).map_err(|e| write_failed(e.to_string()))?;
        temp.write_all(content.as_bytes())
            .map_err(|e| write_failed(e.to_string()))?;
        temp.flush().map_err(|e| write_failed(e.to_string()))?;
        temp.persist(path).map_err(|e| write_failed(e.error.to_string()))?;

        debug!("Rewrote {:?} ({} bytes)", path, content.len());
        Ok(())
    }

    /// Find files with a specific extension below a directory, sorted by path
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let wanted = extension.trim_start_matches('.');
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(wanted) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        result.sort();
        Ok(result)
    }

    /// Whether a path carries the `.rpy` extension
    pub fn has_rpy_extension<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("rpy"))
    }
}

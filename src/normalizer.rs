/*!
 * Text repair for translated working files.
 *
 * Online translators and editors return text that breaks Ren'Py strings:
 * raw double quotes, French guillemets, `<<`/`>>` approximations, a literal
 * `[...]` and lone percent signs. The repair runs line by line and is
 * idempotent: a second pass over its own output changes nothing.
 */

use std::ops::AddAssign;
use std::path::Path;

use log::{debug, error, info};
use serde::Serialize;

use crate::errors::FileError;
use crate::file_utils::FileManager;

const ESCAPED_QUOTE: &str = "\\\"";
const ELLIPSIS_ARTIFACT: &str = "[...]";

/// Corrections applied, by category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CorrectionCounts {
    pub quotes: usize,
    pub guillemets: usize,
    pub ellipses: usize,
    pub percents: usize,
}

impl CorrectionCounts {
    pub fn total(&self) -> usize {
        self.quotes + self.guillemets + self.ellipses + self.percents
    }
}

impl AddAssign for CorrectionCounts {
    fn add_assign(&mut self, other: Self) {
        self.quotes += other.quotes;
        self.guillemets += other.guillemets;
        self.ellipses += other.ellipses;
        self.percents += other.percents;
    }
}

/// Escape every `"` not already preceded by a backslash
fn escape_quotes(line: &str) -> (String, usize) {
    let mut out = String::with_capacity(line.len());
    let mut count = 0;
    let mut prev = None;
    for c in line.chars() {
        if c == '"' && prev != Some('\\') {
            out.push_str(ESCAPED_QUOTE);
            count += 1;
        } else {
            out.push(c);
        }
        prev = Some(c);
    }
    (out, count)
}

fn is_angle(c: char) -> bool {
    c == '<' || c == '>'
}

/// Replace `«`, `»` and standalone `<<`/`>>` with an escaped quote
fn replace_guillemets(line: &str) -> (String, usize) {
    let chars: Vec<char> = line.chars().collect();
    let mut out = String::with_capacity(line.len());
    let mut count = 0;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '«' || c == '»' {
            out.push_str(ESCAPED_QUOTE);
            count += 1;
            i += 1;
            continue;
        }
        if is_angle(c) {
            let mut end = i;
            while end < chars.len() && chars[end] == c {
                end += 1;
            }
            let touches_before = i > 0 && is_angle(chars[i - 1]);
            let touches_after = end < chars.len() && is_angle(chars[end]);
            if end - i == 2 && !touches_before && !touches_after {
                out.push_str(ESCAPED_QUOTE);
                count += 1;
            } else {
                out.extend(&chars[i..end]);
            }
            i = end;
            continue;
        }
        out.push(c);
        i += 1;
    }
    (out, count)
}

/// Collapse `[...]` into `...`, repeating until none is left
fn collapse_ellipsis(line: &str) -> (String, usize) {
    let mut out = line.to_string();
    let mut count = 0;
    while let Some(pos) = out.find(ELLIPSIS_ARTIFACT) {
        out.replace_range(pos..pos + ELLIPSIS_ARTIFACT.len(), "...");
        count += 1;
    }
    (out, count)
}

/// Double a lone `%` unless a letter follows it (format specifier)
fn escape_percent(line: &str) -> (String, usize) {
    let chars: Vec<char> = line.chars().collect();
    let mut out = String::with_capacity(line.len());
    let mut count = 0;
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '%' {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        let mut end = i;
        while end < chars.len() && chars[end] == '%' {
            end += 1;
        }
        let followed_by_letter = end < chars.len() && chars[end].is_alphabetic();
        if end - i == 1 && !followed_by_letter {
            out.push_str("%%");
            count += 1;
        } else {
            out.extend(&chars[i..end]);
        }
        i = end;
    }
    (out, count)
}

/// Repairs quotes and related artifacts in translated text files
pub struct QuoteNormalizer;

impl QuoteNormalizer {
    /// Repair one line (without its line terminator)
    pub fn normalize_line(line: &str) -> (String, CorrectionCounts) {
        let (line, quotes) = escape_quotes(line);
        let (line, guillemets) = replace_guillemets(&line);
        let (line, ellipses) = collapse_ellipsis(&line);
        let (line, percents) = escape_percent(&line);
        (
            line,
            CorrectionCounts {
                quotes,
                guillemets,
                ellipses,
                percents,
            },
        )
    }

    /// Repair a whole text, keeping line terminators as they are
    pub fn normalize_text(text: &str) -> (String, CorrectionCounts) {
        let mut out = String::with_capacity(text.len());
        let mut counts = CorrectionCounts::default();

        for chunk in text.split_inclusive('\n') {
            let (body, terminator) = match chunk.strip_suffix("\r\n") {
                Some(body) => (body, "\r\n"),
                None => match chunk.strip_suffix('\n') {
                    Some(body) => (body, "\n"),
                    None => (chunk, ""),
                },
            };
            let (fixed, line_counts) = Self::normalize_line(body);
            out.push_str(&fixed);
            out.push_str(terminator);
            counts += line_counts;
        }

        (out, counts)
    }

    /// Repair a file in place.
    ///
    /// The file is only rewritten when something was corrected, and then
    /// replaced as a whole. A leading BOM is kept.
    pub fn normalize_file<P: AsRef<Path>>(path: P) -> Result<CorrectionCounts, FileError> {
        let path = path.as_ref();
        let decoded = FileManager::read_text(path)?;
        let (fixed, counts) = Self::normalize_text(&decoded.content);

        if counts.total() > 0 {
            FileManager::write_atomic(path, &decoded.with_original_bom(&fixed))?;
            info!("{} correction(s) applied to {:?}", counts.total(), path);
            debug!("Corrections for {:?}: {:?}", path, counts);
        } else {
            debug!("No correction needed for {:?}", path);
        }

        Ok(counts)
    }
}

/// Repair a translated text file and return the number of corrections.
///
/// I/O failures are logged and reported as zero corrections.
pub fn fix_unescaped_quotes_in_txt<P: AsRef<Path>>(file_path: P) -> usize {
    match QuoteNormalizer::normalize_file(&file_path) {
        Ok(counts) => counts.total(),
        Err(e) => {
            error!("Quote repair skipped: {}", e);
            0
        }
    }
}

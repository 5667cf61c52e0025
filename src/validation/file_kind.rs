/*!
 * Kinds of working files produced by extraction and how each is counted.
 */

use std::fmt;
use std::path::Path;

use serde::Serialize;

/// How lines of a working file map to translatable units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountingRule {
    /// Only non-blank lines count; blank lines separate entries
    NonBlank,
    /// Every line counts, blank or not
    AllLines,
}

/// Working file families written next to each other for one source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FileKind {
    #[serde(rename = "dialogue")]
    Dialogue,
    #[serde(rename = "asterix")]
    Asterix,
    #[serde(rename = "empty")]
    Empty,
    #[serde(rename = "duplicates")]
    Duplicates,
}

impl FileKind {
    pub const ALL: [FileKind; 4] = [Self::Dialogue, Self::Asterix, Self::Empty, Self::Duplicates];

    /// Filename suffix including the extension
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Dialogue => "_dialogue.txt",
            Self::Asterix => "_asterix.txt",
            Self::Empty => "_empty.txt",
            Self::Duplicates => "_doublons.txt",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dialogue => "dialogue",
            Self::Asterix => "asterix",
            Self::Empty => "empty",
            Self::Duplicates => "duplicates",
        }
    }

    /// `{file_base}{suffix}`
    pub fn file_name(&self, file_base: &str) -> String {
        format!("{}{}", file_base, self.suffix())
    }

    pub fn counting_rule(&self) -> CountingRule {
        match self {
            Self::Empty => CountingRule::AllLines,
            _ => CountingRule::NonBlank,
        }
    }

    /// Kind of a working file, judged by its name
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let name = path.as_ref().file_name()?.to_string_lossy().into_owned();
        Self::ALL.into_iter().find(|kind| name.ends_with(kind.suffix()))
    }

    /// Counting rule for an arbitrary path. Only `_empty.txt` files count
    /// every line; everything else counts non-blank lines.
    pub fn counting_rule_for<P: AsRef<Path>>(path: P) -> CountingRule {
        Self::from_path(path)
            .map(|kind| kind.counting_rule())
            .unwrap_or(CountingRule::NonBlank)
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

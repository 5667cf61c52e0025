/*!
 * Pattern tables used by the content heuristics.
 *
 * The tables are plain data so they can be tuned and tested on their own;
 * the matching logic lives in `classifier` and `renpy`.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Substring that opens a translation block (`translate <lang> <label>:`)
pub const TRANSLATION_MARKER: &str = "translate ";

/// Substrings that betray technical script code rather than a translation
pub const TECHNICAL_MARKERS: &[&str] = &["init python:", "screen ", "define config", "init "];

/// Structural Ren'Py constructs as `(name, pattern)` pairs
pub const RENPY_PATTERN_SOURCES: &[(&str, &str)] = &[
    ("label", r"^\s*label\s+[\w.]+\s*(\(.*\))?\s*:"),
    ("menu", r"^\s*menu(\s+\w+)?\s*:"),
    ("menu_choice", r#"^\s*"[^"]*"\s*(if\s+.+)?:\s*$"#),
    ("scene", r"^\s*scene\s+\w+"),
    ("show", r"^\s*show\s+\w+"),
    ("hide", r"^\s*hide\s+\w+"),
    ("dialogue", r#"^\s*[A-Za-z_]\w*(\s+\w+)*\s+"[^"]*""#),
    ("narration", r#"^\s*"[^"]*"\s*$"#),
    ("translate", r"^\s*translate\s+\w+\s+\w+\s*:"),
    ("jump", r"^\s*jump\s+[\w.]+"),
    ("call", r"^\s*call\s+[\w.]+"),
    ("conditional", r"^\s*(if|elif)\s+.+:\s*$|^\s*else\s*:\s*$"),
    ("pause", r"^\s*(pause|\$\s*renpy\.pause)\b"),
    ("transition", r"^\s*with\s+\w+"),
    ("define", r"^\s*(define|default)\s+[\w.]+\s*="),
    ("python", r"^\s*(init\s+(-?\d+\s+)?)?python(\s+early)?\s*:|^\s*\$\s+\S"),
    ("audio", r"^\s*(play|stop|queue)\s+(music|sound|audio|voice)\b"),
    ("return", r"^\s*return\s*$"),
];

/// `identifier "text"` dialogue lines
pub static SPEAKER_DIALOGUE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*[A-Za-z_]\w*\s+"[^"]*""#).expect("Invalid speaker dialogue regex")
});

/// Any double-quoted string
pub static QUOTED_STRING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""[^"]*""#).expect("Invalid quoted string regex")
});

/// A compiled structural pattern
#[derive(Debug)]
pub struct RenpyPattern {
    pub name: &'static str,
    pub regex: Regex,
}

/// Compiled form of `RENPY_PATTERN_SOURCES`
pub static RENPY_PATTERNS: Lazy<Vec<RenpyPattern>> = Lazy::new(|| {
    RENPY_PATTERN_SOURCES
        .iter()
        .map(|&(name, source)| RenpyPattern {
            name,
            regex: Regex::new(source).expect("Invalid Ren'Py pattern"),
        })
        .collect()
});

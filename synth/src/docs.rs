//! Documentation block parsing.
//!
//! A callable's documentation block supplies the program description (its
//! first line) and per-parameter help through lines of the form
//!
//! ```text
//! name (typehint): description
//! ```
//!
//! Lines that do not match are ignored; there is no error path.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

static PARAM_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z_][a-zA-Z0-9_]*)\s*\(([^)]+)\)\s*:\s*(.*)$")
        .expect("static regex must compile")
});

/// Help entry for one documented parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocEntry {
    /// Text between the parentheses, e.g. `str, optional`.
    pub typehint: String,
    pub description: String,
}

/// Parsed documentation block.
///
/// # Examples
///
/// ```
/// use programmify_synth::docs::DocBlock;
///
/// let doc = DocBlock::parse("Build a program.\n\n    file (str, optional): The file to build.");
/// assert_eq!(doc.summary.as_deref(), Some("Build a program."));
/// assert_eq!(doc.description_for("file"), Some("The file to build."));
/// assert_eq!(doc.description_for("name"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocBlock {
    /// First line of the block, if it is not blank.
    pub summary: Option<String>,
    entries: HashMap<String, DocEntry>,
}

impl DocBlock {
    pub fn parse(doc: &str) -> Self {
        let doc = dedent(doc);
        let summary = doc
            .lines()
            .next()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from);

        let mut entries = HashMap::new();
        for line in doc.lines().map(str::trim) {
            let Some(caps) = PARAM_LINE_RE.captures(line) else {
                continue;
            };
            let name = caps[1].to_string();
            // First documented line for a name wins.
            entries.entry(name).or_insert_with(|| DocEntry {
                typehint: caps[2].trim().to_string(),
                description: caps[3].trim().to_string(),
            });
        }

        Self { summary, entries }
    }

    pub fn entry(&self, name: &str) -> Option<&DocEntry> {
        self.entries.get(name)
    }

    pub fn description_for(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|e| e.description.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Strips leading blank lines and the common indentation of the lines after
/// the first, the way documentation blocks are usually cleaned up.
fn dedent(doc: &str) -> String {
    let trimmed = doc.trim_start_matches(['\n', '\r']);
    let mut lines = trimmed.lines();
    let Some(first) = lines.next() else {
        return String::new();
    };
    let rest: Vec<&str> = lines.collect();
    let indent = rest
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut out = first.trim().to_string();
    for line in rest {
        out.push('\n');
        if line.len() >= indent && line.is_char_boundary(indent) {
            out.push_str(&line[indent..]);
        } else {
            out.push_str(line.trim_start());
        }
    }
    out.trim_end().to_string()
}

/// Fallback help text: the dashed name, title-cased word by word.
///
/// # Examples
///
/// ```
/// use programmify_synth::docs::title_case;
///
/// assert_eq!(title_case("show-cmd"), "Show-Cmd");
/// assert_eq!(title_case("dst"), "Dst");
/// assert_eq!(title_case("v2x"), "V2X");
/// ```
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_alpha = false;
    for ch in name.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUILD_DOC: &str = "Build a program from a python file.

    Args:
        file (str, optional): The file to build.
        name (str, optional): The name of the program.
        windowed (bool, optional): Whether to run in windowed mode. Defaults to True.
    ";

    #[test]
    fn test_parses_indented_args_section() {
        let doc = DocBlock::parse(BUILD_DOC);
        assert_eq!(doc.summary.as_deref(), Some("Build a program from a python file."));
        assert_eq!(doc.len(), 3);
        assert_eq!(
            doc.entry("windowed").map(|e| e.typehint.as_str()),
            Some("bool, optional")
        );
    }

    #[test]
    fn test_first_match_wins() {
        let doc = DocBlock::parse("x (int): first\nx (int): second");
        assert_eq!(doc.description_for("x"), Some("first"));
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let doc = DocBlock::parse("Summary\nnot a param line\n9bad (int): nope\nok (str) no colon\ngood(str):fine");
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.description_for("good"), Some("fine"));
    }

    #[test]
    fn test_blank_doc_has_no_summary() {
        let doc = DocBlock::parse("   \n");
        assert!(doc.summary.is_none());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_title_case_resets_after_separators() {
        assert_eq!(title_case("hidden-imports"), "Hidden-Imports");
        assert_eq!(title_case("ALL-CAPS"), "All-Caps");
    }
}

//! Markup stripping for spreadsheet cells and clipboard text.

use castscript_error::{ExportError, ExportErrorKind};
use regex::Regex;

/// Rewrite rules, applied in order on every pass.
const RULES: &[(&str, &str)] = &[
    // Heading markers
    (r"#{1,6}\s?", ""),
    // Bold and italic
    (r"[*_]{1,3}(.*?)[*_]{1,3}", "${1}"),
    // Links keep their text
    (r"\[(.*?)\]\(.*?\)", "${1}"),
    // List markers
    (r"[-*+]\s", ""),
    // Fenced code blocks
    (r"(?s)```.*?```", ""),
    // Inline code
    (r"`(.*?)`", "${1}"),
    // Blockquotes
    (r">\s", ""),
    // Horizontal rules
    (r"---", ""),
    // Blank lines
    (r"\n\s*\n", "\n"),
];

/// Compiled markup-stripping rules.
///
/// Build once and reuse across many cells.
///
/// # Examples
///
/// ```
/// use castscript_export::MarkdownStripper;
///
/// let stripper = MarkdownStripper::new().unwrap();
/// assert_eq!(stripper.strip("## **Act One**"), "Act One");
/// assert_eq!(stripper.strip("See [the film](https://example.com)"), "See the film");
/// ```
#[derive(Debug, Clone)]
pub struct MarkdownStripper {
    rules: Vec<(Regex, &'static str)>,
}

impl MarkdownStripper {
    /// Compile the rule set.
    pub fn new() -> Result<Self, ExportError> {
        let rules = RULES
            .iter()
            .map(|(pattern, replacement)| {
                Regex::new(pattern)
                    .map(|re| (re, *replacement))
                    .map_err(|e| ExportError::new(ExportErrorKind::Pattern(e.to_string())))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Strip markup from `text`.
    ///
    /// Passes repeat until the text stops changing, so stripping already
    /// stripped text is a no-op.
    pub fn strip(&self, text: &str) -> String {
        let mut current = self.pass(text);
        loop {
            let next = self.pass(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn pass(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (re, replacement) in &self.rules {
            out = re.replace_all(&out, *replacement).into_owned();
        }
        out.trim().to_string()
    }
}

/// Strip markup from a single piece of text.
///
/// Compiles the rules on every call; use [`MarkdownStripper`] for bulk work.
pub fn markdown_to_plain_text(text: &str) -> Result<String, ExportError> {
    Ok(MarkdownStripper::new()?.strip(text))
}

//! Lightweight markup parsing for document export.
//!
//! Generated scripts use a small subset of markdown. This module turns that
//! subset into [`Block`]s which the document renderer lays out; anything it
//! does not recognize becomes a plain paragraph.

use castscript_error::{ExportError, ExportErrorKind};
use regex::Regex;

/// A run of text with uniform emphasis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Text content, markers removed
    pub text: String,
    /// Rendered bold
    pub bold: bool,
    /// Rendered italic
    pub italic: bool,
}

impl Span {
    /// Unstyled text.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }

    /// Bold text.
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            bold: true,
            ..Self::plain(text)
        }
    }

    /// Italic text.
    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            italic: true,
            ..Self::plain(text)
        }
    }
}

/// One block-level element of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Heading, level 1 to 6
    Heading {
        /// Heading depth
        level: u8,
        /// Heading text
        spans: Vec<Span>,
    },
    /// Ordinary paragraph
    Paragraph(Vec<Span>),
    /// Unordered list entry
    Bullet(Vec<Span>),
    /// Ordered list entry with its written number
    Numbered {
        /// Number as written in the source
        number: u32,
        /// Entry text
        spans: Vec<Span>,
    },
    /// Quoted line
    Quote(Vec<Span>),
    /// Fenced code, one string per line
    Code(Vec<String>),
}

impl Block {
    /// Heading with a single unstyled span.
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Block::Heading {
            level,
            spans: vec![Span::plain(text)],
        }
    }

    /// Paragraph with a single unstyled span.
    pub fn text(text: impl Into<String>) -> Self {
        Block::Paragraph(vec![Span::plain(text)])
    }
}

const FENCE: &str = "```";

/// Parses the markup subset into blocks.
///
/// # Examples
///
/// ```
/// use castscript_export::{Block, MarkupParser, Span};
///
/// let parser = MarkupParser::new().unwrap();
/// let blocks = parser.parse("# Title\n\nSome **bold** words");
///
/// assert_eq!(blocks[0], Block::heading(1, "Title"));
/// assert_eq!(
///     blocks[1],
///     Block::Paragraph(vec![Span::plain("Some "), Span::bold("bold"), Span::plain(" words")])
/// );
/// ```
#[derive(Debug, Clone)]
pub struct MarkupParser {
    emphasis: Regex,
}

impl MarkupParser {
    /// Compile the inline emphasis pattern.
    pub fn new() -> Result<Self, ExportError> {
        let emphasis =
            Regex::new(r"\*\*\*(.+?)\*\*\*|\*\*(.+?)\*\*|__(.+?)__|\*(.+?)\*|\b_(.+?)_\b")
                .map_err(|e| ExportError::new(ExportErrorKind::Pattern(e.to_string())))?;
        Ok(Self { emphasis })
    }

    /// Split `text` into blocks. Blank lines separate blocks and are dropped.
    pub fn parse(&self, text: &str) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut code: Option<Vec<String>> = None;

        for line in text.lines() {
            if let Some(lines) = code.as_mut() {
                if line.trim_start().starts_with(FENCE) {
                    blocks.push(Block::Code(std::mem::take(lines)));
                    code = None;
                } else {
                    lines.push(line.to_string());
                }
                continue;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with(FENCE) {
                code = Some(Vec::new());
                continue;
            }
            blocks.push(self.parse_line(trimmed));
        }

        // Unterminated fence keeps what it collected
        if let Some(lines) = code {
            blocks.push(Block::Code(lines));
        }
        blocks
    }

    fn parse_line(&self, line: &str) -> Block {
        if let Some((level, rest)) = heading(line) {
            return Block::Heading {
                level,
                spans: self.spans(rest),
            };
        }
        if let Some(rest) = ["- ", "* ", "+ "]
            .iter()
            .find_map(|marker| line.strip_prefix(marker))
        {
            return Block::Bullet(self.spans(rest.trim_start()));
        }
        if let Some((number, rest)) = numbered(line) {
            return Block::Numbered {
                number,
                spans: self.spans(rest),
            };
        }
        if let Some(rest) = line.strip_prefix('>') {
            return Block::Quote(self.spans(rest.trim_start()));
        }
        Block::Paragraph(self.spans(line))
    }

    /// Split a line into emphasis spans.
    ///
    /// Single underscores only mark italics at word boundaries, so
    /// `snake_case_names` stay plain.
    pub fn spans(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();
        let mut last = 0;

        for cap in self.emphasis.captures_iter(text) {
            let Some(whole) = cap.get(0) else { continue };
            if whole.start() > last {
                spans.push(Span::plain(&text[last..whole.start()]));
            }

            let span = if let Some(m) = cap.get(1) {
                Span {
                    text: m.as_str().to_string(),
                    bold: true,
                    italic: true,
                }
            } else if let Some(m) = cap.get(2).or_else(|| cap.get(3)) {
                Span::bold(m.as_str())
            } else if let Some(m) = cap.get(4).or_else(|| cap.get(5)) {
                Span::italic(m.as_str())
            } else {
                Span::plain(whole.as_str())
            };
            spans.push(span);
            last = whole.end();
        }

        if last < text.len() {
            spans.push(Span::plain(&text[last..]));
        }
        spans
    }
}

/// `#` run of 1 to 6 followed by whitespace.
fn heading(line: &str) -> Option<(u8, &str)> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    let rest = &line[hashes..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    u8::try_from(hashes).ok().map(|level| (level, rest.trim()))
}

/// Digits, a dot, then whitespace.
fn numbered(line: &str) -> Option<(u32, &str)> {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let number = line[..digits].parse().ok()?;
    Some((number, rest.trim_start()))
}

/// Parse `text` with a freshly compiled [`MarkupParser`].
pub fn parse_markup(text: &str) -> Result<Vec<Block>, ExportError> {
    Ok(MarkupParser::new()?.parse(text))
}

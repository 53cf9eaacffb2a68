//! Partitioning generated text into first and last sections.

/// Separator between chunks of generated text.
pub const CHUNK_SEPARATOR: &str = "\n\n";

/// Result of splitting generated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSplit {
    /// Leading half of the chunks
    pub first: String,
    /// Trailing half of the chunks
    pub last: String,
    /// Number of chunks the text was divided into
    pub chunks: usize,
}

impl SectionSplit {
    /// Whether both halves carry text.
    pub fn is_complete(&self) -> bool {
        !self.first.trim().is_empty() && !self.last.trim().is_empty()
    }
}

/// Strategy for dividing a finished script into two sections.
pub trait SectionSplitter: Send + Sync {
    /// Split `text` into first and last sections.
    fn split(&self, text: &str) -> SectionSplit;
}

/// Positional split at the chunk midpoint.
///
/// The text is cut on blank lines into `N` chunks; the first section gets
/// `floor(N/2)` chunks and the last section the remaining `ceil(N/2)`, each
/// rejoined with blank lines. Chunk count is the only input, so halves can
/// differ widely in length.
#[derive(Debug, Clone, Copy, Default)]
pub struct MidpointSplitter;

impl SectionSplitter for MidpointSplitter {
    fn split(&self, text: &str) -> SectionSplit {
        let chunks: Vec<&str> = text.split(CHUNK_SEPARATOR).collect();
        let mid = chunks.len() / 2;

        SectionSplit {
            first: chunks[..mid].join(CHUNK_SEPARATOR),
            last: chunks[mid..].join(CHUNK_SEPARATOR),
            chunks: chunks.len(),
        }
    }
}

/// Split with [`MidpointSplitter`].
///
/// # Examples
///
/// ```
/// use castscript_narrative::split_sections;
///
/// let split = split_sections("a\n\nb\n\nc");
/// assert_eq!(split.first, "a");
/// assert_eq!(split.last, "b\n\nc");
/// assert_eq!(split.chunks, 3);
/// ```
pub fn split_sections(text: &str) -> SectionSplit {
    MidpointSplitter.split(text)
}

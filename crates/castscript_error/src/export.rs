//! Export encoding errors.

/// Failures while encoding results into downloadable formats.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ExportErrorKind {
    /// Spreadsheet writer rejected the data
    #[display("Failed to write spreadsheet: {}", _0)]
    Spreadsheet(String),
    /// Document packer failed
    #[display("Failed to create document: {}", _0)]
    Document(String),
    /// A text normalization pattern failed to compile
    #[display("Invalid text pattern: {}", _0)]
    Pattern(String),
    /// Writing the encoded file to disk failed
    #[display("Failed to write {}: {}", path, message)]
    FileWrite {
        /// Destination path
        path: String,
        /// I/O error message
        message: String,
    },
}

/// Export error with source location.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Export Error: {} at line {} in {}", kind, line, file)]
pub struct ExportError {
    /// The specific error condition
    pub kind: ExportErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ExportError {
    /// Create a new ExportError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ExportErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

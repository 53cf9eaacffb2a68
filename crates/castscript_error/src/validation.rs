//! User-facing validation errors.
//!
//! These are shown to the user as-is and never retried, so the display text
//! is the message the user reads.

/// Input problems the user has to fix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ValidationErrorKind {
    /// Generation request without a prompt
    #[display("Prompt is required")]
    MissingPrompt,
    /// Document request without data
    #[display("Data is required")]
    MissingData,
    /// Transcript text is blank
    #[display("Transcript is required")]
    MissingTranscript,
    /// Uploaded workbook has no rows
    #[display("No data found in the Excel file")]
    EmptyWorkbook,
    /// Uploaded workbook has no `transcript` header
    #[display("The Excel file must have a 'transcript' column")]
    MissingTranscriptColumn,
    /// Uploaded bytes are not a readable workbook
    #[display("Error reading Excel file: {}", _0)]
    UnreadableWorkbook(String),
    /// Export requested for an empty result set
    #[display("No results to export")]
    NothingToExport,
    /// Input file could not be read
    #[display("Could not read {}: {}", path, message)]
    UnreadableInput {
        /// Path as given, `-` for stdin
        path: String,
        /// Underlying I/O error
        message: String,
    },
}

/// Validation error with source location.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("{}", kind)]
pub struct ValidationError {
    /// The specific validation failure
    pub kind: ValidationErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new ValidationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

//! Script pipeline error types.

/// Specific error conditions raised while turning a transcript into a script.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PipelineErrorKind {
    /// The part-count step answered with something that is not a usable count
    #[display("Part count response '{}' is not a usable number of parts", _0)]
    UnusablePartCount(String),
    /// The model asked for more parts than the pipeline allows
    #[display("Part count {} exceeds the limit of {}", count, max)]
    TooManyParts {
        /// Parsed count
        count: u32,
        /// Configured maximum
        max: u32,
    },
    /// Generated text was too short to fill both halves of the script
    #[display("Generated content has {} chunk(s), too few to split into two sections", _0)]
    InsufficientContent(usize),
    /// Template referenced a placeholder that was not provided
    #[display("Template error: {}", _0)]
    TemplateError(String),
    /// Profile file could not be read
    #[display("Failed to read profile file: {}", _0)]
    ProfileRead(String),
    /// Profile TOML could not be parsed
    #[display("Failed to parse profile TOML: {}", _0)]
    ProfileParse(String),
    /// Profile parsed but is internally inconsistent
    #[display("Invalid profile '{}': {}", profile, reason)]
    InvalidProfile {
        /// Profile name
        profile: String,
        /// What is wrong with it
        reason: String,
    },
    /// No built-in profile with this name
    #[display("Unknown profile: {}", _0)]
    UnknownProfile(String),
}

/// Error type for pipeline operations.
///
/// # Examples
///
/// ```
/// use castscript_error::{PipelineError, PipelineErrorKind};
///
/// let err = PipelineError::new(PipelineErrorKind::UnusablePartCount("many".into()));
/// assert!(format!("{}", err).contains("many"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The specific error condition
    pub kind: PipelineErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new PipelineError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

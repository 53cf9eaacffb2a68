//! Builder-related errors.

/// Specific builder error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum BuilderErrorKind {
    /// A required field was never set
    #[display("Missing required field: {}", _0)]
    MissingField(String),

    /// The builder rejected the assembled value
    #[display("Validation failed: {}", _0)]
    ValidationFailed(String),
}

/// Builder error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Builder Error: {} at line {} in {}", kind, line, file)]
pub struct BuilderError {
    kind: BuilderErrorKind,
    line: u32,
    file: &'static str,
}

impl BuilderError {
    /// Create a new builder error with caller location tracking.
    #[track_caller]
    pub fn new(kind: BuilderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &BuilderErrorKind {
        &self.kind
    }
}

/// Convert from a `derive_builder` error message.
///
/// `derive_builder` reports unset fields as "`name` must be initialized".
impl From<String> for BuilderError {
    #[track_caller]
    fn from(msg: String) -> Self {
        if msg.ends_with("must be initialized") {
            let field = msg
                .trim_end_matches("must be initialized")
                .trim()
                .trim_matches('`')
                .to_string();
            Self::new(BuilderErrorKind::MissingField(field))
        } else {
            Self::new(BuilderErrorKind::ValidationFailed(msg))
        }
    }
}

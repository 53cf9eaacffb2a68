//! Top-level error wrapper types.

use crate::{
    BuilderError, ConfigError, ExportError, GeminiError, HttpError, JsonError, PipelineError,
    RetryableError, ServerError, ValidationError,
};

/// Every error area castscript can report.
///
/// # Examples
///
/// ```
/// use castscript_error::{CastscriptError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: CastscriptError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum CastscriptErrorKind {
    /// HTTP transport error
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
    /// Upstream generation error
    #[from(GeminiError)]
    Gemini(GeminiError),
    /// Pipeline error
    #[from(PipelineError)]
    Pipeline(PipelineError),
    /// User input validation error
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Export encoding error
    #[from(ExportError)]
    Export(ExportError),
    /// HTTP service error
    #[from(ServerError)]
    Server(ServerError),
}

/// castscript error with kind discrimination.
///
/// # Examples
///
/// ```
/// use castscript_error::{CastscriptResult, ConfigError};
///
/// fn might_fail() -> CastscriptResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Castscript Error: {}", _0)]
pub struct CastscriptError(Box<CastscriptErrorKind>);

impl CastscriptError {
    /// Create a new error from a kind.
    pub fn new(kind: CastscriptErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &CastscriptErrorKind {
        &self.0
    }

    /// Message suitable for showing to a user or recording on a batch item.
    ///
    /// Validation errors render as their bare message; everything else keeps
    /// the kind prefix but drops the source location.
    pub fn user_message(&self) -> String {
        match self.kind() {
            CastscriptErrorKind::Validation(e) => e.kind.to_string(),
            CastscriptErrorKind::Gemini(e) => e.kind.to_string(),
            CastscriptErrorKind::Pipeline(e) => e.kind.to_string(),
            CastscriptErrorKind::Export(e) => e.kind.to_string(),
            CastscriptErrorKind::Server(e) => e.kind.to_string(),
            CastscriptErrorKind::Http(e) => e.message.clone(),
            CastscriptErrorKind::Json(e) => e.message.clone(),
            CastscriptErrorKind::Config(e) => e.message.clone(),
            CastscriptErrorKind::Builder(e) => e.kind().to_string(),
        }
    }
}

// Generic From implementation for any type that converts to CastscriptErrorKind
impl<T> From<T> for CastscriptError
where
    T: Into<CastscriptErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

impl RetryableError for CastscriptError {
    fn is_retryable(&self) -> bool {
        match self.kind() {
            CastscriptErrorKind::Gemini(e) => e.is_retryable(),
            _ => false,
        }
    }
}

/// Result type for castscript operations.
pub type CastscriptResult<T> = std::result::Result<T, CastscriptError>;

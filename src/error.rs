//! Error types for TextIQ.

/// Top-level error type for the client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Remote(#[from] RemoteServiceError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error was raised locally, before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Input rejected before dispatch. `Display` is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a question")]
    EmptyQuestion,

    #[error("Please provide context text or select an uploaded file")]
    MissingContext,

    #[error("{0}")]
    EmptyText(EmptyTextKind),

    #[error("Please choose a file to upload")]
    MissingFile,

    #[error("Slide count must be between 1 and 20, got {count}")]
    SlideCountOutOfRange { count: u32 },

    #[error("Nothing to download yet")]
    NothingToDownload,

    #[error("No uploaded file with id {file_id}")]
    UnknownFile { file_id: String },
}

/// Which tool rejected empty input text; selects the message shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyTextKind {
    Transform,
    Presentation,
}

impl std::fmt::Display for EmptyTextKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Transform => "Please enter some text to transform",
            Self::Presentation => "Please enter content for the presentation",
        };
        write!(f, "{s}")
    }
}

/// Transport failure or non-2xx response from the backend.
///
/// `raw_status` is `None` when no HTTP response was received (timeout,
/// connection refused).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RemoteServiceError {
    pub message: String,
    pub raw_status: Option<u16>,
}

impl RemoteServiceError {
    pub fn new(message: impl Into<String>, raw_status: Option<u16>) -> Self {
        Self {
            message: message.into(),
            raw_status,
        }
    }

    /// Build from an HTTP status and the `detail` the server sent, if any.
    pub fn from_response(status: u16, detail: Option<String>, fallback: &str) -> Self {
        Self::new(detail.unwrap_or_else(|| fallback.to_string()), Some(status))
    }

    /// Build from a failure where no usable response exists.
    pub fn transport(fallback: &str) -> Self {
        Self::new(fallback, None)
    }
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for the client.
pub type Result<T> = std::result::Result<T, Error>;

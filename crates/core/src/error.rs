/// Domain error taxonomy shared by every crate in the workspace.
///
/// None of these are retried. Callers surface them and let the user
/// re-trigger the workflow.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Required configuration is missing or unusable. Fatal at startup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The AI response failed JSON parsing or schema expectations, or an
    /// image response carried no image data.
    #[error("Content error: {0}")]
    Content(String),

    /// A `data:` URL was malformed.
    #[error("Format error: {0}")]
    Format(String),

    /// Caller-supplied input was rejected before any network call.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Reading an uploaded anchor file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

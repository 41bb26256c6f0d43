/// Error types for the pose editor
///
/// The `Display` text of every variant is exactly what the error banner shows,
/// so callers can surface `err.to_string()` without further formatting.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    /// The document is not valid structured data
    #[error("Error: Pose file is not valid JSON")]
    Parse,

    /// A size, length or count ceiling was hit
    #[error("{0}")]
    Validation(String),

    /// The staged replacement image could not be read for upload
    #[error("Failed to process image for embedding")]
    ImageProcessing,

    /// Non-success response; message taken from the response body
    #[error("{0}")]
    Server(String),

    /// The request never produced a response
    #[error("Upload failed: {0}")]
    Transport(String),

    /// Local file access failed
    #[error("File error: {0}")]
    Io(String),
}

impl From<std::io::Error> for EditorError {
    fn from(error: std::io::Error) -> Self {
        EditorError::Io(error.to_string())
    }
}

impl From<reqwest::Error> for EditorError {
    fn from(error: reqwest::Error) -> Self {
        EditorError::Transport(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EditorError>;

//! Error types for the web_drive crate.

use thiserror::Error;

/// Errors that can occur when talking to the web drive front end.
#[derive(Error, Debug)]
pub enum DriveError {
    /// The listing endpoint answered 401; the session is gone.
    #[error("Session expired")]
    AuthExpired,

    #[error("Failed to fetch drive")]
    FetchFailed,

    /// Upload rejected; carries the server's response text verbatim.
    #[error("{0}")]
    Upload(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode response JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid file id: {0:?}")]
    InvalidId(String),

    #[error("Invalid origin URL: {0}")]
    InvalidOrigin(String),
}

/// Result type alias for DriveError.
pub type Result<T> = std::result::Result<T, DriveError>;

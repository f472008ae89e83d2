//! Defines the custom `Error` and `Result` types for the Yaaldug core.

use std::fmt;

/// The primary error type for the Yaaldug core.
///
/// This enum consolidates all possible failures that can occur within the
/// crate, allowing callers to programmatically handle different error
/// conditions. Most store actions are infallible by contract (unknown
/// identifiers degrade to no-ops); the variants below cover the genuinely
/// fallible seams: the generative backend and the file-backed preference
/// store.
#[derive(Debug)]
pub enum Error {
    /// An error that occurred while talking to the generative API over HTTP
    /// (e.g., connection refused, TLS failure). Wraps a `reqwest::Error`.
    Http(reqwest::Error),

    /// An error that occurred during JSON serialization or deserialization.
    /// This indicates a mismatch between the expected and received data
    /// structures, or a corrupt preference file.
    Serialization(serde_json::Error),

    /// An error that occurred while reading or writing the preference file.
    Io(std::io::Error),

    /// No API key was found in the environment when constructing the
    /// generative backend.
    MissingApiKey,

    /// The generative API accepted the request but answered with a non-success
    /// status. Carries the HTTP status and the provider's response body.
    Backend { status: u16, message: String },

    /// A general-purpose error for miscellaneous issues that don't fit into
    /// other categories.
    Other(String),
}

/// A specialized `Result` type for the Yaaldug core.
///
/// This type alias is used throughout the crate for functions that can return
/// one of the variants of the `Error` enum.
pub type Result<T> = std::result::Result<T, Error>;

// --- Error Trait Implementation ---

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Http(e) => write!(f, "HTTP error: {}", e),
            Error::Serialization(e) => write!(f, "Serialization error: {}", e),
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::MissingApiKey => {
                write!(f, "No API key found in GEMINI_API_KEY or API_KEY")
            }
            Error::Backend { status, message } => {
                write!(f, "Generative API error (status {}): {}", status, message)
            }
            Error::Other(msg) => write!(f, "An internal error occurred: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(e) => Some(e),
            Error::Serialization(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

// --- From Implementations for Error Conversion ---

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

//! Error types for the render front end

use http::StatusCode;
use thiserror::Error;

/// Result type alias for front-end operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while handling a render request.
///
/// Every variant is local to a single request; none is fatal to the process.
#[derive(Error, Debug)]
pub enum Error {
    /// The render backend address is not configured
    #[error("Server configuration error: {0}")]
    Config(String),

    /// A form field did not parse as a finite number
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Network failure, timeout, or non-success status from the backend
    #[error("Backend error: {0}")]
    Transport(String),

    /// The backend responded, but not with the expected image type
    #[error("Backend did not return image/png (got {0:?})")]
    BadContentType(String),

    /// No staged image exists for the requested identifier
    #[error("No image staged under identifier {0:?}")]
    NotFound(String),
}

impl Error {
    /// The HTTP status this error surfaces as.
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Transport(_) | Error::BadContentType(_) => StatusCode::BAD_GATEWAY,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

//! Error types for the AcademicWorld SDK

use thiserror::Error;

/// Errors that can occur when using the AcademicWorld SDK
#[derive(Error, Debug)]
pub enum SdkError {
    /// The server rejected the request or a store behind it was unavailable
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Connection error (remote mode)
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Base URL could not be combined with an endpoint path
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Favorites write failed (embedded mode)
    #[error("Favorites error: {0}")]
    FavoritesError(#[from] academicworld::FavoritesError),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type SdkResult<T> = Result<T, SdkError>;

/*!
 * Error types for the readaloud application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

use crate::playback::Command;

/// Errors that can occur while locating and loading a source document
#[derive(Error, Debug)]
pub enum SourceError {
    /// The source document is missing or unreadable
    #[error("Input not found: {0}")]
    InputNotFound(String),

    /// The source is neither an EPUB, an HTML file, nor a URL
    #[error("Unsupported source: {0}")]
    UnsupportedSource(String),

    /// Fetching a remote document failed
    #[error("Failed to fetch document: {0}")]
    FetchFailed(String),

    /// The EPUB container could not be read
    #[error("EPUB error: {0}")]
    Epub(String),

    /// The requested EPUB page does not exist
    #[error("Page {page} is out of range, the book has {pages} page(s)")]
    PageOutOfRange {
        /// Requested page index
        page: usize,
        /// Number of pages in the spine
        pages: usize,
    },
}

/// Errors that can occur when talking to the speech engine
#[derive(Error, Debug)]
pub enum SynthesisError {
    /// Error when sending a request to the speech service fails
    #[error("Speech request failed: {0}")]
    RequestFailed(String),

    /// Error returned by the speech service itself
    #[error("Speech service responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the service
        message: String,
    },

    /// Error opening the audio device or decoding the returned audio
    #[error("Audio output error: {0}")]
    AudioOutput(String),

    /// Missing or invalid speech configuration
    #[error("Speech configuration error: {0}")]
    Configuration(String),
}

/// Errors that end a playback run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// A command other than pause or quit arrived while paused
    #[error("Illegal command while paused: {0}")]
    IllegalCommandWhilePaused(Command),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from loading the source document
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Error from the speech engine
    #[error("Synthesis error: {0}")]
    Synthesis(#[from] SynthesisError),

    /// Error from the playback loop
    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

/*!
 * Error types for the reflexlate application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 *
 * The pipeline distinguishes three failure kinds:
 * - transport failures (`ProviderError`), surfaced verbatim
 * - empty model output for the draft stage (`PipelineError::EmptyResponse`)
 * - model output that cannot be parsed into the required shape
 *   (`PipelineError::MalformedFeedback`, `PipelineError::MalformedVerdict`)
 */

use thiserror::Error;

use crate::translation::Stage;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response body fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that abort a pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The remote call could not be completed
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The model returned no usable text
    #[error("Empty response from {stage} model")]
    EmptyResponse {
        /// Stage that received the empty response
        stage: Stage,
    },

    /// The feedback stage returned something that is not a valid feedback report
    #[error("Malformed feedback payload: {0}")]
    MalformedFeedback(String),

    /// The reviewer stage returned something that is not a valid verdict
    #[error("Malformed review verdict: {0}")]
    MalformedVerdict(String),
}

impl PipelineError {
    /// True when the remote service could not be reached or refused the call
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Provider(_))
    }

    /// True when the model answered but its output had the wrong shape
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedFeedback(_) | Self::MalformedVerdict(_))
    }
}

/// Input rejected before a pipeline run is started
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InputError {
    /// Nothing but whitespace was submitted
    #[error("Please enter some text to translate")]
    Empty,

    /// Input exceeds the configured character cap
    #[error("Please keep input under {max} characters (got {length})")]
    TooLong {
        /// Submitted length in characters
        length: usize,
        /// Configured maximum
        max: usize,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from a pipeline run
    #[error("Translation error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Rejected user input
    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

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
        Self::Unknown(error.to_string())
    }
}

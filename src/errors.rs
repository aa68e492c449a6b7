/*!
 * Error types for the subedit library.
 *
 * Every operation on a subtitle document fails with one of these types and
 * never leaves a half-built variant behind. They are defined with the
 * thiserror crate; the binary wraps them in anyhow at the edge.
 */

use thiserror::Error;

/// Errors that can occur when a translator provider is called
///
/// Only `ApiError` is raised inside this crate (by the mock translator); the
/// other variants are for `Translator` implementations living outside it.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Request could not be sent (external translators)
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Response body could not be decoded (external translators)
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

    /// Connection could not be established or was lost (external translators)
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Provider rejected the request for rate limiting (external translators)
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),
}

/// Errors raised while reading, parsing or transforming subtitles
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// Bytes could not be decoded, even with the detected encoding
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Malformed SubRip block, duplicate index or empty document
    #[error("Format error at line {line}: {message}")]
    Format {
        /// 1-based line number where the problem was found (0 when not tied to a line)
        line: usize,
        /// Description of the problem
        message: String,
    },

    /// Timestamp not matching `HH:MM:SS,mmm`
    #[error("Invalid timestamp '{0}': expected HH:MM:SS,mmm")]
    TimeFormat(String),

    /// Bad operation parameters
    #[error("Invalid value: {0}")]
    Value(String),

    /// File system error
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
}

impl SubtitleError {
    /// Shorthand for a format error tied to a line
    pub fn format(line: usize, message: impl Into<String>) -> Self {
        Self::Format { line, message: message.into() }
    }

    /// Shorthand for a parameter error
    pub fn value(message: impl Into<String>) -> Self {
        Self::Value(message.into())
    }
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Engine response did not split back into the lines that were sent
    #[error("Translation format error: expected {expected} lines, got {actual}")]
    Format {
        /// Number of lines sent in the chunk
        expected: usize,
        /// Number of lines found in the response
        actual: usize,
    },

    /// LLM response did not follow the `%N@ text` protocol
    #[error("Bad response format: {0}")]
    ResponseFormat(String),

    /// Provider did not answer within the response budget
    #[error("Translation request timed out after {0} seconds")]
    Timeout(u64),

    /// Provider failure
    #[error("Translation failure: {0}")]
    Failure(#[from] ProviderError),

    /// Cancellation was requested at a chunk boundary
    #[error("Translation cancelled after {completed} of {total} chunks")]
    Cancelled {
        /// Chunks that were answered before cancellation
        completed: usize,
        /// Chunks planned for the document
        total: usize,
    },

    /// Model missing from the capability tables
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    /// Engine missing from the capability tables
    #[error("Unknown engine: {0}")]
    UnknownEngine(String),

    /// Error with subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),
}

/*!
 * Error types for the tripdash application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when talking to the completion provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// No API key available in configuration or environment
    #[error("Missing provider API key: {0}")]
    MissingApiKey(String),

    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
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

    /// Provider returned a response with no usable text content
    #[error("Provider returned an empty response")]
    EmptyResponse,
}

/// Errors that can occur while translating a single record
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Source title is empty after trimming; no provider call is made
    #[error("Source title is empty")]
    EmptyTitle,

    /// Provider output could not be parsed as JSON, even after fence
    /// stripping and brace extraction
    #[error("Response is not valid JSON: {0}")]
    UnparsableResponse(String),

    /// Parsed JSON lacks the required target title key
    #[error("Response is missing required key '{0}'")]
    IncompleteResponse(String),

    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl TranslationError {
    /// Whether the error is recoverable within a batch run.
    ///
    /// Recoverable errors are recorded against the record id and the batch
    /// moves on; a missing API key aborts the batch before any record is
    /// processed.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Provider(ProviderError::MissingApiKey(_)))
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from configuration loading or validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from the record store
    #[error("Store error: {0}")]
    Store(String),

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

impl From<rusqlite::Error> for AppError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Store(error.to_string())
    }
}

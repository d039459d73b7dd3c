// ReadLog - Open Library Reading List Client
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Error types for ReadLog
//!
//! This module defines error types using thiserror for ergonomic error handling.
//! Errors fall into three groups:
//!
//! - **Transport**: network failures, HTTP status errors, malformed payloads
//! - **Operation**: a reading-log fetch or a title search failed (wraps a transport error)
//! - **Addressing**: a toggle pointed outside the list it named
//!
//! Fetch and search failures are caught by the store and never reach the user
//! as a crash. An out-of-range toggle is an integration defect: the store
//! reports it and changes nothing.

use crate::library::models::ListKind;
use thiserror::Error;

/// Result type alias using our ReadLogError type
pub type Result<T> = std::result::Result<T, ReadLogError>;

/// Main error type for ReadLog
#[derive(Error, Debug)]
pub enum ReadLogError {
    // ===== Transport Errors =====

    /// Network connectivity error (DNS, connect, timeout)
    #[error("Network error: {message}")]
    NetworkError {
        message: String,
        /// Whether this error might be transient
        is_transient: bool,
    },

    /// Catalog answered with a non-success status
    #[error("API request failed: {message}")]
    ApiRequestFailed {
        message: String,
        /// HTTP status code if available
        status_code: Option<u16>,
        /// API endpoint that failed
        endpoint: Option<String>,
    },

    /// Catalog returned a body that does not match the expected shape
    #[error("Invalid API response: {message}")]
    InvalidApiResponse {
        message: String,
        /// Response body snippet for debugging
        response_body: Option<String>,
    },

    // ===== Operation Errors =====

    /// Reading log retrieval failed
    #[error("Failed to fetch reading log for '{user_id}': {source}")]
    ReadingLogFetchFailed {
        user_id: String,
        #[source]
        source: Box<ReadLogError>,
    },

    /// Title search failed
    #[error("Search for '{query}' failed: {source}")]
    SearchFailed {
        query: String,
        #[source]
        source: Box<ReadLogError>,
    },

    // ===== Addressing Errors =====

    /// Toggle addressed a position outside the named list
    #[error("Index {index} out of range for {list} (len {len})")]
    IndexOutOfRange {
        list: ListKind,
        index: usize,
        len: usize,
    },

    /// No record carries the requested key
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    // ===== Configuration Errors =====

    /// Configuration is invalid or incomplete
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Generic input validation error
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error that should not normally occur
    #[error("Internal error: {0}")]
    InternalError(String),

    // ===== External Library Errors =====

    /// HTTP client error from reqwest
    #[error("HTTP client error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),
}

// Helper methods for creating common errors
impl ReadLogError {
    /// Create an InvalidInput error with a message
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        ReadLogError::InvalidInput(message.into())
    }

    /// Create an InternalError with a message
    pub fn internal<S: Into<String>>(message: S) -> Self {
        ReadLogError::InternalError(message.into())
    }

    /// Create an ApiRequestFailed error
    pub fn api_failed<S: Into<String>>(
        message: S,
        status_code: Option<u16>,
        endpoint: Option<String>,
    ) -> Self {
        ReadLogError::ApiRequestFailed {
            message: message.into(),
            status_code,
            endpoint,
        }
    }

    /// Create a NetworkError
    pub fn network_error<S: Into<String>>(message: S, is_transient: bool) -> Self {
        ReadLogError::NetworkError {
            message: message.into(),
            is_transient,
        }
    }

    /// Wrap a transport error as a reading log failure
    pub fn fetch_failed<S: Into<String>>(user_id: S, source: ReadLogError) -> Self {
        ReadLogError::ReadingLogFetchFailed {
            user_id: user_id.into(),
            source: Box::new(source),
        }
    }

    /// Wrap a transport error as a search failure
    pub fn search_failed<S: Into<String>>(query: S, source: ReadLogError) -> Self {
        ReadLogError::SearchFailed {
            query: query.into(),
            source: Box::new(source),
        }
    }

    /// Check if error is retryable (transient network errors, 5xx)
    ///
    /// Operation errors delegate to the transport error they wrap.
    pub fn is_retryable(&self) -> bool {
        match self {
            ReadLogError::NetworkError { is_transient, .. } => *is_transient,
            ReadLogError::ApiRequestFailed { status_code: Some(500..=599), .. } => true,
            ReadLogError::ReqwestError(e) => e.is_timeout() || e.is_connect(),
            ReadLogError::ReadingLogFetchFailed { source, .. }
            | ReadLogError::SearchFailed { source, .. } => source.is_retryable(),
            _ => false,
        }
    }

    /// Check if error comes from addressing a record that is not there
    pub fn is_index_error(&self) -> bool {
        matches!(
            self,
            ReadLogError::IndexOutOfRange { .. } | ReadLogError::RecordNotFound(_)
        )
    }

    /// Get user-friendly error message suitable for a non-blocking notice
    pub fn user_message(&self) -> String {
        match self {
            ReadLogError::ReadingLogFetchFailed { .. } => {
                "Couldn't load your reading list. Check your connection and try again.".to_string()
            }
            ReadLogError::SearchFailed { query, .. } => {
                format!("Search for \"{}\" didn't go through. Please try again.", query)
            }
            ReadLogError::NetworkError { .. } | ReadLogError::ReqwestError(_) => {
                "Network unavailable. Please try again.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

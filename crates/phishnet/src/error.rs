// SPDX-License-Identifier: GPL-3.0-or-later

use thiserror::Error;

use crate::models::ErrorResponse;
use crate::query::QueryEncodeError;

pub type Result<T> = std::result::Result<T, PhishNetError>;

/// Failures surfaced by [`PhishNetClient`](crate::PhishNetClient) calls.
///
/// Every dispatch failure carries the API path it was issued against. The API
/// key is never part of an error message.
#[derive(Debug, Error)]
pub enum PhishNetError {
    #[error("unable to encode query parameters for {target}: {source}")]
    Encoding {
        target: String,
        source: QueryEncodeError,
    },

    #[error("unable to build request URL for {target}: {source}")]
    RequestConstruction {
        target: String,
        source: url::ParseError,
    },

    #[error("HTTP request to {target} failed: {source}")]
    Network {
        target: String,
        source: reqwest::Error,
    },

    #[error("unable to read response body from {target}: {source}")]
    Io {
        target: String,
        source: reqwest::Error,
    },

    #[error("unable to decode response from {target}: {source}")]
    Decoding {
        target: String,
        source: serde_json::Error,
    },

    #[error("{target} returned HTTP {status}: {error}")]
    Api {
        target: String,
        status: u16,
        error: ErrorResponse,
    },

    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("unable to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl PhishNetError {
    /// The server's error envelope, if this is an API error.
    pub fn api_error(&self) -> Option<&ErrorResponse> {
        match self {
            PhishNetError::Api { error, .. } => Some(error),
            _ => None,
        }
    }

    /// API path the failed call targeted, when there was one.
    pub fn target(&self) -> Option<&str> {
        match self {
            PhishNetError::Encoding { target, .. }
            | PhishNetError::RequestConstruction { target, .. }
            | PhishNetError::Network { target, .. }
            | PhishNetError::Io { target, .. }
            | PhishNetError::Decoding { target, .. }
            | PhishNetError::Api { target, .. } => Some(target),
            PhishNetError::InvalidDate(_) | PhishNetError::Client(_) => None,
        }
    }
}
